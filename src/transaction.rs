//! Transaction model produced by the engine.

use crate::money::Money;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Direction of a transaction. The amount itself is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    /// Money into the account (CREDIT column).
    Income,

    /// Money out of the account (DEBIT column).
    Expense,
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Income => f.write_str("income"),
            TxType::Expense => f.write_str("expense"),
        }
    }
}

/// A transaction reconstructed from statement text.
///
/// # Invariants
///
/// - `amount` is strictly positive; direction is carried by `tx_type`
/// - `description` holds 1 to 200 characters with at least one letter
/// - `date` lies inside the accepted window at the time of parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTransaction {
    /// Posting date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,

    /// Cleaned description.
    pub description: String,

    /// Positive amount.
    pub amount: Money,

    /// Income or expense.
    #[serde(rename = "type")]
    pub tx_type: TxType,
}

impl ParsedTransaction {
    /// Canonical `YYYY-MM-DD` form of the date.
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Two records are duplicates when date, description and type match
    /// exactly and the amounts differ by less than one cent.
    pub fn is_duplicate_of(&self, other: &ParsedTransaction) -> bool {
        self.date == other.date
            && self.tx_type == other.tx_type
            && self.description == other.description
            && self.amount.abs_diff(other.amount) < Money::from_cents(1)
    }
}
