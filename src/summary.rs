//! Declared statement totals.
//!
//! Statements print their opening and closing balances and the credit and
//! debit totals on dedicated lines. Those figures are what the cross-validator
//! checks the reconstructed transactions against.

use crate::error::Result;
use crate::money::{is_standalone_amount, Money, AMOUNT_PATTERN};
use log::debug;
use regex::Regex;
use serde::Serialize;

/// Figures declared by the statement itself.
///
/// A field is `None` when no matching declaration line was found. That is not
/// the same as a declared zero and the validator treats the two differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    pub opening_balance: Option<Money>,
    pub closing_balance: Option<Money>,
    pub total_credits: Option<Money>,
    pub total_debits: Option<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    OpeningBalance,
    ClosingBalance,
    TotalCredits,
    TotalDebits,
}

impl Field {
    /// Balances can be overdrawn; totals are always reported unsigned.
    fn is_signed(self) -> bool {
        matches!(self, Field::OpeningBalance | Field::ClosingBalance)
    }

    fn slot(self, summary: &mut StatementSummary) -> &mut Option<Money> {
        match self {
            Field::OpeningBalance => &mut summary.opening_balance,
            Field::ClosingBalance => &mut summary.closing_balance,
            Field::TotalCredits => &mut summary.total_credits,
            Field::TotalDebits => &mut summary.total_debits,
        }
    }
}

/// Scans lines for the four declaration markers.
#[derive(Debug)]
pub struct SummaryExtractor {
    markers: Vec<(Field, Regex)>,
    amount: Regex,
}

impl SummaryExtractor {
    pub fn new() -> Result<Self> {
        let markers = vec![
            (Field::OpeningBalance, Regex::new(r"(?i)opening\s+balance")?),
            (Field::ClosingBalance, Regex::new(r"(?i)closing\s+balance")?),
            (Field::TotalCredits, Regex::new(r"(?i)total\s+credits")?),
            (Field::TotalDebits, Regex::new(r"(?i)total\s+debits")?),
        ];
        let amount = Regex::new(&format!(
            r"(?P<sign>[+-])?\s*\$?\s*(?P<minus>-)?\s*(?P<amount>{AMOUNT_PATTERN})"
        ))?;

        Ok(SummaryExtractor { markers, amount })
    }

    /// Extracts the declared figures. The first line carrying a figure wins
    /// for each marker; later repeats (e.g. on a second page) are ignored.
    pub fn extract(&self, lines: &[&str]) -> StatementSummary {
        let mut summary = StatementSummary::default();

        for (idx, line) in lines.iter().enumerate() {
            for (field, marker) in &self.markers {
                let slot = field.slot(&mut summary);
                if slot.is_some() || !marker.is_match(line) {
                    continue;
                }

                if let Some(value) = self.declared_amount(line) {
                    let value = if field.is_signed() { value } else { value.abs() };
                    debug!("Line {}: {:?} declared as {}", idx + 1, field, value);
                    *slot = Some(value);
                }
            }
        }

        summary
    }

    /// First monetary token on the line, negated when a minus leads it or the
    /// line itself.
    fn declared_amount(&self, line: &str) -> Option<Money> {
        let caps = self.amount.captures_iter(line).find(|caps| {
            caps.name("amount")
                .is_some_and(|m| is_standalone_amount(line, m.start(), m.end()))
        })?;
        let value = Money::parse_token(caps.name("amount")?.as_str())?;

        let negative = caps.name("sign").is_some_and(|m| m.as_str() == "-")
            || caps.name("minus").is_some()
            || line.starts_with('-');

        Some(if negative { -value } else { value })
    }
}
