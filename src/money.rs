//! Fixed-point monetary type with 2 decimal places.
//!
//! Statement figures are printed with exactly two decimals, so every value is
//! rescaled to cents on construction and after each operation. Arithmetic goes
//! through `rust_decimal`, which keeps recomputed totals exact.

use regex::{Match, Regex};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Unsigned amount as it appears in a statement column: digit groups with
/// optional thousands separators and exactly two decimals.
///
/// The pattern has no boundaries of its own, so matches must be screened with
/// [`is_standalone_amount`] before they are trusted.
pub(crate) const AMOUNT_PATTERN: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}";

/// Returns `true` if the match `haystack[start..end]` is a whole amount token
/// rather than a piece of a longer numeric run such as `28.02.24`.
pub(crate) fn is_standalone_amount(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    if before.is_some_and(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return false;
    }

    let mut after = haystack[end..].chars();
    match after.next() {
        Some(c) if c.is_ascii_digit() => false,
        Some('.') => !after.next().is_some_and(|c| c.is_ascii_digit()),
        _ => true,
    }
}

/// Whole amount tokens found by `amount` in `haystack`, in reading order.
pub(crate) fn find_amounts<'h>(amount: &Regex, haystack: &'h str) -> Vec<Match<'h>> {
    amount
        .find_iter(haystack)
        .filter(|m| is_standalone_amount(haystack, m.start(), m.end()))
        .collect()
}

/// A monetary value that always carries exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use statement_engine::Money;
///
/// let amount = Money::from_str("$1,234.5").unwrap();
/// assert_eq!(amount.to_string(), "1234.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a new `Money` from a `Decimal`, normalizing to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Money(normalized)
    }

    /// Creates a value from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Parses a statement amount token such as `$1,234.56`, `- 15.00` or `2500.00`.
    ///
    /// Currency symbols, thousands separators and inner whitespace are dropped
    /// before parsing. Returns `None` for anything that is not a number.
    pub fn parse_token(token: &str) -> Option<Money> {
        let cleaned: String = token
            .chars()
            .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        Decimal::from_str(&cleaned).ok().map(Money::new)
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Absolute value.
    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Absolute difference between two values.
    pub fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().replace(['$', ','], "");
        let decimal = Decimal::from_str(&trimmed)?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
