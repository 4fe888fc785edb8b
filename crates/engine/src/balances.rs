//! Net balance per group member.
//!
//! Balances are derived on every request from the group's expenses, splits
//! and settlements; nothing here is cached or persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    EPSILON, ExpenseRecord, IntegrityIssue, Member, MemberId, Money, RecordRef, SettlementRecord,
    SplitRecord,
};

/// What a member's balance means for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// The group owes this member money.
    Owed,
    /// This member owes the group money.
    Owes,
    Settled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    pub member_id: MemberId,
    pub display_name: String,
    /// Positive: owed by the group. Negative: owes the group.
    pub amount: Money,
}

impl NetBalance {
    pub fn new(member: &Member, amount: Money) -> Self {
        Self {
            member_id: member.id.clone(),
            display_name: member.display_name.clone(),
            amount,
        }
    }

    /// Anything within [`EPSILON`] of zero counts as settled.
    pub fn status(&self) -> BalanceStatus {
        if self.amount > EPSILON {
            BalanceStatus::Owed
        } else if self.amount < -EPSILON {
            BalanceStatus::Owes
        } else {
            BalanceStatus::Settled
        }
    }
}

/// Balances in member order plus every record that could not be applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NetBalances {
    pub balances: Vec<NetBalance>,
    pub issues: Vec<IntegrityIssue>,
}

impl NetBalances {
    /// Sum over all members, saturating at the `i64` bounds. Zero for a
    /// consistent, closed ledger.
    pub fn total(&self) -> Money {
        self.balances
            .iter()
            .fold(Money::ZERO, |acc, b| acc.saturating_add(b.amount))
    }

    pub fn get(&self, member_id: &MemberId) -> Option<&NetBalance> {
        self.balances.iter().find(|b| &b.member_id == member_id)
    }

    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Running totals indexed by member, in `members` order.
struct Ledger<'a> {
    index: HashMap<&'a MemberId, usize>,
    amounts: Vec<Money>,
    issues: Vec<IntegrityIssue>,
}

impl<'a> Ledger<'a> {
    fn new(members: &'a [Member]) -> (Self, Vec<&'a Member>) {
        let mut index = HashMap::with_capacity(members.len());
        let mut unique = Vec::with_capacity(members.len());
        let mut issues = Vec::new();
        for member in members {
            if index.contains_key(&member.id) {
                issues.push(IntegrityIssue::InvalidRecord {
                    record: RecordRef::Member {
                        id: member.id.to_string(),
                    },
                    reason: "member listed more than once".to_string(),
                });
                continue;
            }
            index.insert(&member.id, unique.len());
            unique.push(member);
        }
        let ledger = Self {
            index,
            amounts: vec![Money::ZERO; unique.len()],
            issues,
        };
        (ledger, unique)
    }

    fn slot(&mut self, record: &RecordRef, member: &MemberId) -> Option<usize> {
        let slot = self.index.get(member).copied();
        if slot.is_none() {
            self.issues.push(IntegrityIssue::UnknownMember {
                record: record.clone(),
                member: member.clone(),
            });
        }
        slot
    }

    /// Applies signed `deltas` atomically: either every slot changes or none.
    fn apply(&mut self, record: RecordRef, deltas: &[(usize, Money)]) {
        let mut next = Vec::with_capacity(deltas.len());
        for &(slot, delta) in deltas {
            let current = next
                .iter()
                .rev()
                .find_map(|&(s, value)| (s == slot).then_some(value))
                .unwrap_or(self.amounts[slot]);
            match current.checked_add(delta) {
                Some(value) => next.push((slot, value)),
                None => {
                    self.issues.push(IntegrityIssue::Overflow { record });
                    return;
                }
            }
        }
        for (slot, value) in next {
            self.amounts[slot] = value;
        }
    }
}

/// Computes one [`NetBalance`] per member.
///
/// - balance starts at 0 for every member
/// - the payer of an expense gains its amount
/// - each split takes its amount from its member
/// - a settlement gives `from` its amount and takes it from `to`
///
/// Records naming someone outside `members` are skipped and reported; a
/// settlement is skipped as a whole if either side is unknown. Duplicate
/// members keep their first position.
pub fn compute_net_balances(
    members: &[Member],
    expenses: &[ExpenseRecord],
    splits: &[SplitRecord],
    settlements: &[SettlementRecord],
) -> NetBalances {
    let (mut ledger, members) = Ledger::new(members);

    for expense in expenses {
        let record = expense.record_ref();
        if let Some(payer) = ledger.slot(&record, &expense.paid_by) {
            ledger.apply(record, &[(payer, expense.amount)]);
        }
    }

    for split in splits {
        let record = split.record_ref();
        if let Some(member) = ledger.slot(&record, &split.member_id) {
            ledger.apply(record, &[(member, -split.amount)]);
        }
    }

    for settlement in settlements {
        let record = settlement.record_ref();
        let from = ledger.slot(&record, &settlement.from);
        let to = ledger.slot(&record, &settlement.to);
        if let (Some(from), Some(to)) = (from, to) {
            ledger.apply(
                record,
                &[(from, settlement.amount), (to, -settlement.amount)],
            );
        }
    }

    let balances = members
        .into_iter()
        .zip(ledger.amounts)
        .map(|(member, amount)| NetBalance::new(member, amount))
        .collect();

    NetBalances {
        balances,
        issues: ledger.issues,
    }
}
