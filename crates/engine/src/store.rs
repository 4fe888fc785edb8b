//! Data-access port.
//!
//! The balance engine never talks to the database directly; it reads one
//! group's records through [`LedgerStore`] and writes settlements back
//! through it. [`SeaOrmStore`](crate::SeaOrmStore) is the production
//! implementation.
//!
//! The three record reads are independent queries. There is no snapshot
//! across them: a row inserted between two reads is picked up by the next
//! recomputation.

use std::future::Future;

use serde::Serialize;

use crate::{
    ExpenseId, ExpenseRecord, GroupId, IntegrityIssue, Member, MemberId, Money, ResultEngine,
    SettlementRecord, SplitRecord,
};

/// Rows read from the store, split into valid records and rejected rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub issues: Vec<IntegrityIssue>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl<T> Loaded<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            issues: Vec::new(),
        }
    }

    /// Converts raw rows, keeping the ones that validate.
    pub fn from_rows<M>(rows: impl IntoIterator<Item = M>) -> Self
    where
        T: TryFrom<M, Error = IntegrityIssue>,
    {
        rows.into_iter().map(T::try_from).collect()
    }
}

impl<T> FromIterator<Result<T, IntegrityIssue>> for Loaded<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, IntegrityIssue>>>(iter: I) -> Self {
        let mut loaded = Loaded::default();
        for row in iter {
            match row {
                Ok(record) => loaded.records.push(record),
                Err(issue) => loaded.issues.push(issue),
            }
        }
        loaded
    }
}

/// Read/insert operations the balance engine needs, keyed by group.
pub trait LedgerStore: Send + Sync {
    /// Members of `group_id` in display order.
    ///
    /// Fails with [`EngineError::KeyNotFound`](crate::EngineError::KeyNotFound)
    /// when the group does not exist.
    fn fetch_members(
        &self,
        group_id: &GroupId,
    ) -> impl Future<Output = ResultEngine<Loaded<Member>>> + Send;

    fn fetch_expenses(
        &self,
        group_id: &GroupId,
    ) -> impl Future<Output = ResultEngine<Loaded<ExpenseRecord>>> + Send;

    /// Splits of the given expenses. An empty slice yields no rows.
    fn fetch_splits(
        &self,
        expense_ids: &[ExpenseId],
    ) -> impl Future<Output = ResultEngine<Loaded<SplitRecord>>> + Send;

    fn fetch_settlements(
        &self,
        group_id: &GroupId,
    ) -> impl Future<Output = ResultEngine<Loaded<SettlementRecord>>> + Send;

    /// Persists a settlement of `amount` paid by `from` to `to`.
    fn insert_settlement(
        &self,
        group_id: &GroupId,
        from: &MemberId,
        to: &MemberId,
        amount: Money,
    ) -> impl Future<Output = ResultEngine<SettlementRecord>> + Send;
}
