//! Data-integrity findings.
//!
//! Produced in two places: by the store adapter while turning rows into
//! records (unparseable amounts, empty ids) and by
//! [`compute_net_balances`](crate::compute_net_balances) when a record points
//! at someone outside the member set. The offending record is left out of the
//! sums; everything else is still computed.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::MemberId;

/// Points at the row an issue was found in, by its raw stored identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordRef {
    Member { id: String },
    Expense { id: String },
    Split { expense_id: String, member_id: String },
    Settlement { id: String },
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member { id } => write!(f, "member {id}"),
            Self::Expense { id } => write!(f, "expense {id}"),
            Self::Split {
                expense_id,
                member_id,
            } => write!(f, "split {expense_id}/{member_id}"),
            Self::Settlement { id } => write!(f, "settlement {id}"),
        }
    }
}

/// A record excluded from the balance computation.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IntegrityIssue {
    #[error("{record} references unknown member {member}")]
    UnknownMember { record: RecordRef, member: MemberId },
    #[error("{record} has a non-numeric amount {raw:?}")]
    InvalidAmount { record: RecordRef, raw: String },
    #[error("{record} is invalid: {reason}")]
    InvalidRecord { record: RecordRef, reason: String },
    #[error("{record} overflows the balance")]
    Overflow { record: RecordRef },
}

impl IntegrityIssue {
    pub fn record(&self) -> &RecordRef {
        match self {
            Self::UnknownMember { record, .. }
            | Self::InvalidAmount { record, .. }
            | Self::InvalidRecord { record, .. }
            | Self::Overflow { record } => record,
        }
    }
}
