//! Cross-validation against the statement's declared totals.
//!
//! The result is advisory: a mismatch means some rows were probably misparsed
//! or missed, and callers surface it as a warning with the dollar deltas.

use crate::money::Money;
use crate::summary::StatementSummary;
use crate::transaction::{ParsedTransaction, TxType};
use serde::Serialize;

/// Absolute deltas between recomputed and declared figures. A delta is `None`
/// when the statement did not declare the figure it would be checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Differences {
    pub credits: Option<Money>,
    pub debits: Option<Money>,
    pub closing_balance: Option<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub calculated_credits: Money,
    pub calculated_debits: Money,
    /// `opening + credits - debits`, known only with a declared opening balance.
    pub calculated_closing_balance: Option<Money>,
    pub differences: Differences,
}

impl ValidationResult {
    /// Differences that exceed `tolerance`, labelled for reporting.
    pub fn failures(&self, tolerance: Money) -> Vec<(&'static str, Money)> {
        [
            ("credits", self.differences.credits),
            ("debits", self.differences.debits),
            ("closing balance", self.differences.closing_balance),
        ]
        .into_iter()
        .filter_map(|(label, diff)| diff.filter(|d| *d > tolerance).map(|d| (label, d)))
        .collect()
    }
}

/// Recomputes totals from `transactions` and diffs them against `summary`.
pub fn cross_validate(
    transactions: &[ParsedTransaction],
    summary: &StatementSummary,
    tolerance: Money,
) -> ValidationResult {
    let total_of = |tx_type: TxType| -> Money {
        transactions
            .iter()
            .filter(|t| t.tx_type == tx_type)
            .map(|t| t.amount)
            .sum()
    };

    let calculated_credits = total_of(TxType::Income);
    let calculated_debits = total_of(TxType::Expense);
    let calculated_closing_balance = summary
        .opening_balance
        .map(|opening| opening + calculated_credits - calculated_debits);

    let differences = Differences {
        credits: summary
            .total_credits
            .map(|declared| calculated_credits.abs_diff(declared)),
        debits: summary
            .total_debits
            .map(|declared| calculated_debits.abs_diff(declared)),
        closing_balance: summary
            .closing_balance
            .zip(calculated_closing_balance)
            .map(|(declared, calculated)| calculated.abs_diff(declared)),
    };

    let is_valid = [
        differences.credits,
        differences.debits,
        differences.closing_balance,
    ]
    .into_iter()
    .flatten()
    .all(|diff| diff <= tolerance);

    ValidationResult {
        is_valid,
        calculated_credits,
        calculated_debits,
        calculated_closing_balance,
        differences,
    }
}
