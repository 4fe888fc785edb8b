//! Group balance service.
//!
//! [`BalanceService`] reads a group's records through a [`LedgerStore`],
//! computes balances and a settlement plan, and records settlements. It keeps
//! no balance state of its own: every call recomputes from the store. Callers
//! learn that a recomputation is due through [`BalanceService::subscribe`].

use sea_orm::DatabaseConnection;
use serde::Serialize;
use tokio::sync::watch;

use crate::{
    EngineError, ExpenseId, GroupId, IntegrityIssue, LedgerStore, MemberId, Money, NetBalance,
    NetBalances, ResultEngine, SeaOrmStore, SettlementRecord, Transfer, compute_net_balances,
    settlements::validate_settlement, simplify_debts,
};

/// Everything the balance view of a group needs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupBalances {
    pub balances: Vec<NetBalance>,
    pub transfers: Vec<Transfer>,
    /// Rows left out of the computation. Non-empty means the balances may be
    /// incomplete.
    pub issues: Vec<IntegrityIssue>,
}

impl GroupBalances {
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[derive(Debug)]
pub struct BalanceService<S> {
    store: S,
    refresh: watch::Sender<u64>,
}

impl BalanceService<SeaOrmStore> {
    /// Return a builder for a database backed `BalanceService`.
    pub fn builder() -> BalanceServiceBuilder {
        BalanceServiceBuilder::default()
    }
}

impl<S: LedgerStore> BalanceService<S> {
    pub fn new(store: S) -> Self {
        let (refresh, _) = watch::channel(0);
        Self { store, refresh }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receiver that changes whenever balances need recomputing.
    ///
    /// The value is a generation counter; only the change matters.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.refresh.subscribe()
    }

    pub fn generation(&self) -> u64 {
        *self.refresh.borrow()
    }

    /// Signals that something affecting balances changed (new expense,
    /// settlement, membership change).
    pub fn notify_changed(&self) {
        self.refresh
            .send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    /// Net balance of every member of `group_id`, in member order.
    pub async fn net_balances(&self, group_id: &GroupId) -> ResultEngine<NetBalances> {
        let members = self.store.fetch_members(group_id).await?;
        let expenses = self.store.fetch_expenses(group_id).await?;
        let expense_ids: Vec<ExpenseId> =
            expenses.records.iter().map(|e| e.id.clone()).collect();
        let splits = self.store.fetch_splits(&expense_ids).await?;
        let settlements = self.store.fetch_settlements(group_id).await?;

        let mut computed = compute_net_balances(
            &members.records,
            &expenses.records,
            &splits.records,
            &settlements.records,
        );

        let mut issues = Vec::with_capacity(
            members.issues.len()
                + expenses.issues.len()
                + splits.issues.len()
                + settlements.issues.len()
                + computed.issues.len(),
        );
        issues.extend(members.issues);
        issues.extend(expenses.issues);
        issues.extend(splits.issues);
        issues.extend(settlements.issues);
        issues.append(&mut computed.issues);
        computed.issues = issues;

        for issue in &computed.issues {
            tracing::warn!(
                group = %group_id,
                record = %issue.record(),
                "excluded from balances: {issue}"
            );
        }
        tracing::debug!(
            group = %group_id,
            members = computed.balances.len(),
            expenses = expenses.records.len(),
            splits = splits.records.len(),
            settlements = settlements.records.len(),
            total = %computed.total(),
            "recomputed balances"
        );

        Ok(computed)
    }

    /// Balances plus the simplified settlement plan for `group_id`.
    pub async fn group_balances(&self, group_id: &GroupId) -> ResultEngine<GroupBalances> {
        let NetBalances { balances, issues } = self.net_balances(group_id).await?;
        let transfers = simplify_debts(&balances);
        Ok(GroupBalances {
            balances,
            transfers,
            issues,
        })
    }

    /// Records that `from` paid `amount` to `to` and triggers a refresh.
    ///
    /// Both members must belong to the group. Nothing changes on failure.
    pub async fn record_settlement(
        &self,
        group_id: &GroupId,
        from: &MemberId,
        to: &MemberId,
        amount: Money,
    ) -> ResultEngine<SettlementRecord> {
        validate_settlement(from, to, amount)?;

        let members = self.store.fetch_members(group_id).await?;
        for member in [from, to] {
            if !members.records.iter().any(|m| &m.id == member) {
                return Err(EngineError::KeyNotFound(format!(
                    "member {member} in group {group_id}"
                )));
            }
        }

        let settlement = match self
            .store
            .insert_settlement(group_id, from, to, amount)
            .await
        {
            Ok(settlement) => settlement,
            Err(err) => {
                tracing::error!(
                    group = %group_id,
                    %from,
                    %to,
                    "failed to record settlement: {err}"
                );
                return Err(err);
            }
        };

        tracing::info!(
            group = %group_id,
            settlement = %settlement.id,
            %from,
            %to,
            amount = %amount,
            "recorded settlement"
        );
        self.notify_changed();
        Ok(settlement)
    }

    /// Same as [`record_settlement`](Self::record_settlement), on behalf of
    /// `acting`, who has to be the payer or the receiver.
    pub async fn settle_as(
        &self,
        group_id: &GroupId,
        acting: &MemberId,
        from: &MemberId,
        to: &MemberId,
        amount: Money,
    ) -> ResultEngine<SettlementRecord> {
        if acting != from && acting != to {
            return Err(EngineError::NotParticipant(acting.to_string()));
        }
        self.record_settlement(group_id, from, to, amount).await
    }

    /// Confirms a proposed transfer on behalf of `acting`.
    pub async fn settle_transfer(
        &self,
        group_id: &GroupId,
        acting: &MemberId,
        transfer: &Transfer,
    ) -> ResultEngine<SettlementRecord> {
        self.settle_as(group_id, acting, &transfer.from, &transfer.to, transfer.amount)
            .await
    }
}

/// The builder for a database backed `BalanceService`.
#[derive(Default)]
pub struct BalanceServiceBuilder {
    database: DatabaseConnection,
}

impl BalanceServiceBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> BalanceServiceBuilder {
        self.database = db;
        self
    }

    /// Construct `BalanceService`
    pub fn build(self) -> BalanceService<SeaOrmStore> {
        BalanceService::new(SeaOrmStore::new(self.database))
    }
}
