use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Balances whose magnitude stays below this are treated as settled.
///
/// One minor unit (0.01 in the group currency).
pub const EPSILON: Money = Money::new(1);

/// Signed money amount represented as **integer minor units** (cents).
///
/// Every amount the engine touches (expenses, splits, settlements, balances,
/// transfers) uses this type, so sums are exact and the zero-sum invariant
/// of a closed group holds without floating-point drift.
///
/// The value is signed:
/// - positive = the group owes the member / money flowing in
/// - negative = the member owes the group / money flowing out
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing user input (accepts `.` or `,` as decimal separator; rejects more
/// than 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value (saturating at `i64::MAX`).
    #[must_use]
    pub const fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// Returns `true` when the magnitude is below [`EPSILON`].
    #[must_use]
    pub const fn is_negligible(self) -> bool {
        self.abs().0 < EPSILON.0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Formats the amount with an explicit `+` for positive values.
    #[must_use]
    pub fn signed(self) -> String {
        if self.is_positive() {
            format!("+{self}")
        } else {
            self.to_string()
        }
    }

    /// Parses a decimal amount as delivered by the store.
    ///
    /// Unlike [`FromStr`], any number of fraction digits is accepted and the
    /// value is rounded half away from zero to the minor unit: equal splits
    /// are persisted unrounded (`100 / 3` ends up as `33.333333333333336`).
    pub fn parse_stored(s: &str) -> Result<Self, EngineError> {
        let (sign, int_part, frac_part) = split_decimal(s)?;

        let mut frac_digits = frac_part.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let cents = parse_units(int_part)?
            .checked_mul(100)
            .and_then(|v| v.checked_add(tenths * 10 + hundredths))
            .and_then(|v| v.checked_add(i64::from(round_up)))
            .ok_or_else(overflow)?;

        apply_sign(sign, cents)
    }
}

fn invalid() -> EngineError {
    EngineError::InvalidAmount("invalid amount".to_string())
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}

/// Splits `[+-]digits[(.|,)digits]` into sign, integer and fraction parts,
/// validating that both parts are plain ASCII digits.
fn split_decimal(s: &str) -> Result<(i64, &str, &str), EngineError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount("empty amount".to_string()));
    }

    let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (-1i64, stripped.trim_start())
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (1i64, stripped.trim_start())
    } else {
        (1i64, trimmed)
    };
    if rest.is_empty() {
        return Err(EngineError::InvalidAmount("empty amount".to_string()));
    }

    let (int_part, frac_part) = match rest.find(['.', ',']) {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    Ok((sign, int_part, frac_part))
}

fn parse_units(int_part: &str) -> Result<i64, EngineError> {
    int_part.parse::<i64>().map_err(|_| overflow())
}

fn apply_sign(sign: i64, cents: i64) -> Result<Money, EngineError> {
    if sign < 0 {
        cents.checked_neg().map(Money).ok_or_else(overflow)
    } else {
        Ok(Money(cents))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string typed by a user into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, int_part, frac_part) = split_decimal(s)?;

        let frac = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<i64>().map_err(|_| invalid())? * 10,
            2 => frac_part.parse::<i64>().map_err(|_| invalid())?,
            _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
        };

        let cents = parse_units(int_part)?
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        apply_sign(sign, cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_minor_units() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn signed_marks_positive_amounts() {
        assert_eq!(Money::new(6000).signed(), "+60.00");
        assert_eq!(Money::new(-3000).signed(), "-30.00");
        assert_eq!(Money::ZERO.signed(), "0.00");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().cents(), 230);
        assert_eq!("7.".parse::<Money>().unwrap().cents(), 700);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["", "-", "abc", "1.2.3", ".50", "1e3", "12,3x", "NaN"] {
            assert!(raw.parse::<Money>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn parse_stored_rounds_to_minor_units() {
        assert_eq!(Money::parse_stored("33.333333333333336").unwrap().cents(), 3333);
        assert_eq!(Money::parse_stored("66.666666666666671").unwrap().cents(), 6667);
        assert_eq!(Money::parse_stored("0.005").unwrap().cents(), 1);
        assert_eq!(Money::parse_stored("-0.005").unwrap().cents(), -1);
        assert_eq!(Money::parse_stored("0.004").unwrap().cents(), 0);
        assert_eq!(Money::parse_stored("90").unwrap().cents(), 9000);
        assert_eq!(Money::parse_stored("120.00").unwrap().cents(), 12000);
    }

    #[test]
    fn parse_stored_rejects_non_numeric() {
        assert!(Money::parse_stored("twelve").is_err());
        assert!(Money::parse_stored("").is_err());
        assert!(Money::parse_stored("99999999999999999999").is_err());
    }

    #[test]
    fn sum_saturates() {
        let total: Money = [Money::new(i64::MAX), Money::new(1)].into_iter().sum();
        assert_eq!(total, Money::new(i64::MAX));
        assert_eq!(Money::new(i64::MIN).checked_sub(Money::new(1)), None);
    }

    #[test]
    fn negligible_is_below_one_minor_unit() {
        assert!(Money::ZERO.is_negligible());
        assert!(!Money::new(1).is_negligible());
        assert!(!Money::new(-1).is_negligible());
    }
}
