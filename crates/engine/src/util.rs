//! Internal helpers for row validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize the
//! row → record mapping so every table reports bad data the same way.

use crate::{IntegrityIssue, Money, RecordRef, ResultEngine};

/// Parse a stored decimal amount, reporting the raw text on failure.
pub(crate) fn stored_amount(record: &RecordRef, raw: &str) -> Result<Money, IntegrityIssue> {
    Money::parse_stored(raw).map_err(|_| IntegrityIssue::InvalidAmount {
        record: record.clone(),
        raw: raw.to_string(),
    })
}

/// Lift an id/validation failure into an [`IntegrityIssue`] for `record`.
pub(crate) fn valid<T>(record: &RecordRef, value: ResultEngine<T>) -> Result<T, IntegrityIssue> {
    value.map_err(|err| IntegrityIssue::InvalidRecord {
        record: record.clone(),
        reason: err.to_string(),
    })
}

/// Reject a record with a fixed reason.
pub(crate) fn reject(record: &RecordRef, reason: &str) -> IntegrityIssue {
    IntegrityIssue::InvalidRecord {
        record: record.clone(),
        reason: reason.to_string(),
    }
}
