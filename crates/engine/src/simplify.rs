//! Debt simplification.
//!
//! Turns a set of net balances into direct member-to-member transfers that
//! settle the group. Debtors and creditors are matched greedily with two
//! pointers in input order: each step moves the smaller of the two open
//! amounts, so at least one side is closed per transfer and the plan has at
//! most `debtors + creditors - 1` entries. Input order is kept as is; the
//! result is deterministic for a given member order and is not guaranteed to
//! use the fewest possible transfers.

use serde::{Deserialize, Serialize};

use crate::{EPSILON, MemberId, Money, NetBalance};

/// A proposed payment. Nothing is applied until a settlement is recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: MemberId,
    pub from_name: String,
    pub to: MemberId,
    pub to_name: String,
    /// Always > 0.
    pub amount: Money,
}

impl Transfer {
    pub fn involves(&self, member: &MemberId) -> bool {
        &self.from == member || &self.to == member
    }
}

struct Open<'a> {
    balance: &'a NetBalance,
    remaining: Money,
}

/// Computes a settlement plan for `balances`.
///
/// Only balances more than [`EPSILON`] away from zero take part. When the
/// balances do not sum to zero, whatever is left once either side runs out is
/// ignored.
pub fn simplify_debts(balances: &[NetBalance]) -> Vec<Transfer> {
    let mut debtors: Vec<Open<'_>> = balances
        .iter()
        .filter(|b| b.amount < -EPSILON)
        .map(|balance| Open {
            balance,
            remaining: balance.amount,
        })
        .collect();
    let mut creditors: Vec<Open<'_>> = balances
        .iter()
        .filter(|b| b.amount > EPSILON)
        .map(|balance| Open {
            balance,
            remaining: balance.amount,
        })
        .collect();

    let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];

        let amount = debtor.remaining.abs().min(creditor.remaining);
        transfers.push(Transfer {
            from: debtor.balance.member_id.clone(),
            from_name: debtor.balance.display_name.clone(),
            to: creditor.balance.member_id.clone(),
            to_name: creditor.balance.display_name.clone(),
            amount,
        });

        debtor.remaining += amount;
        creditor.remaining -= amount;

        if debtor.remaining.is_negligible() {
            i += 1;
        }
        if creditor.remaining.is_negligible() {
            j += 1;
        }
    }

    transfers
}

/// Applies `transfers` to `balances` the way recorded settlements would be
/// applied: the payer gains the amount, the receiver loses it.
///
/// Transfers naming a member that is not in `balances`, or that would
/// overflow either side, are ignored.
pub fn apply_transfers(balances: &[NetBalance], transfers: &[Transfer]) -> Vec<NetBalance> {
    let mut result = balances.to_vec();
    for transfer in transfers {
        let from = result.iter().position(|b| b.member_id == transfer.from);
        let to = result.iter().position(|b| b.member_id == transfer.to);
        let (Some(from), Some(to)) = (from, to) else {
            continue;
        };
        let paid = result[from].amount.checked_add(transfer.amount);
        let received = result[to].amount.checked_sub(transfer.amount);
        if let (Some(paid), Some(received)) = (paid, received) {
            result[from].amount = paid;
            result[to].amount = received;
        }
    }
    result
}
