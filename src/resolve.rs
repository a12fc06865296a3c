//! Column and type resolution.
//!
//! Statements lay out rows as `description | debit | credit | balance`, but the
//! text extractor either keeps the cell separators as pipes or flattens the row
//! into space-separated text. Both shapes are resolved here into an amount and
//! a direction by ordered rule lists; the first rule that fires wins.

use crate::config::{KeywordCue, ParserConfig};
use crate::error::Result;
use crate::money::{find_amounts, Money, AMOUNT_PATTERN};
use crate::segment::RawRecord;
use crate::transaction::TxType;
use log::{debug, warn};
use regex::Regex;

/// Amount, direction and raw description of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub description: String,
    pub amount: Money,
    pub tx_type: TxType,
}

/// Populated DEBIT and CREDIT cells of a pipe-delimited row. Empty, zero and
/// out-of-range cells are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Columns {
    pub debit: Option<Money>,
    pub credit: Option<Money>,
}

pub type PipeRule = fn(Columns) -> Option<(TxType, Money)>;

/// Pipe-row rules in priority order.
pub const PIPE_RULES: &[(&str, PipeRule)] = &[
    ("debit only", debit_only),
    ("credit only", credit_only),
    // Lossy: a row with both columns filled is booked as the debit.
    ("debit wins", debit_wins),
];

fn debit_only(columns: Columns) -> Option<(TxType, Money)> {
    match (columns.debit, columns.credit) {
        (Some(debit), None) => Some((TxType::Expense, debit)),
        _ => None,
    }
}

fn credit_only(columns: Columns) -> Option<(TxType, Money)> {
    match (columns.debit, columns.credit) {
        (None, Some(credit)) => Some((TxType::Income, credit)),
        _ => None,
    }
}

fn debit_wins(columns: Columns) -> Option<(TxType, Money)> {
    match (columns.debit, columns.credit) {
        (Some(debit), Some(_)) => Some((TxType::Expense, debit)),
        _ => None,
    }
}

/// A space-delimited row split at its first candidate amount.
#[derive(Debug, Clone)]
pub struct SpaceRow<'a> {
    /// Text before the first candidate amount.
    pub description: &'a str,
    /// Candidate amounts in reading order.
    pub amounts: Vec<Money>,
}

/// Outcome of a space-row rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tx_type: TxType,
    /// Byte length of a trailing column label to cut from the description.
    pub label_len: usize,
}

pub type SpaceRule = fn(&Resolver, &SpaceRow<'_>) -> Option<Classification>;

/// Space-row rules in priority order.
pub const SPACE_RULES: &[(&str, SpaceRule)] = &[
    ("keyword cue", Resolver::keyword_cue),
    ("labeled single amount", Resolver::labeled_single_amount),
];

#[derive(Debug)]
pub struct Resolver {
    amount: Regex,
    strict_amount: Regex,
    keyword_cues: Vec<KeywordCue>,
    debit_labels: Vec<String>,
    credit_labels: Vec<String>,
    min_amount: Money,
    max_amount: Money,
}

impl Resolver {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let upper = |labels: &[String]| -> Vec<String> {
            labels.iter().map(|l| l.to_uppercase()).collect()
        };

        Ok(Resolver {
            amount: Regex::new(AMOUNT_PATTERN)?,
            strict_amount: Regex::new(&format!(r"^\$?{AMOUNT_PATTERN}$"))?,
            keyword_cues: config.keyword_cues.clone(),
            debit_labels: upper(&config.debit_labels),
            credit_labels: upper(&config.credit_labels),
            min_amount: config.min_amount,
            max_amount: config.max_amount,
        })
    }

    /// Resolves a record into amount, type and raw description.
    ///
    /// Returns `None` (and logs why) when no amount or no direction can be
    /// inferred.
    pub fn resolve(&self, record: &RawRecord) -> Option<Resolution> {
        if record.body.contains('|') {
            self.resolve_pipe(record)
        } else {
            self.resolve_space(record)
        }
    }

    fn in_range(&self, amount: Money) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }

    /// A cell counts only if it is nothing but an in-range amount.
    fn cell_amount(&self, cell: &str) -> Option<Money> {
        if !self.strict_amount.is_match(cell) {
            return None;
        }
        Money::parse_token(cell).filter(|amount| self.in_range(*amount))
    }

    /// A cell that can only be description text.
    fn is_text_cell(&self, cell: &str) -> bool {
        !cell.is_empty() && !self.strict_amount.is_match(cell)
    }

    fn resolve_pipe(&self, record: &RawRecord) -> Option<Resolution> {
        let cells: Vec<&str> = record.body.split('|').map(str::trim).collect();

        let Some(first) = cells
            .iter()
            .position(|cell| self.is_text_cell(cell) && cell.chars().any(char::is_alphabetic))
        else {
            warn!("Line {}: Pipe row without a description cell, skipping", record.line);
            return None;
        };

        // A description wrapped onto an absorbed line leaves several text
        // cells in a row; the columns start after the last of them.
        let last = cells[first..]
            .iter()
            .take_while(|cell| self.is_text_cell(cell))
            .count()
            + first
            - 1;

        let column = |offset: usize| {
            cells
                .get(last + offset)
                .and_then(|cell| self.cell_amount(cell))
        };
        let columns = Columns {
            debit: column(1),
            credit: column(2),
        };

        let Some((rule, (tx_type, amount))) = PIPE_RULES
            .iter()
            .find_map(|(name, rule)| rule(columns).map(|hit| (*name, hit)))
        else {
            warn!(
                "Line {}: No populated DEBIT or CREDIT column, skipping",
                record.line
            );
            return None;
        };

        debug!("Line {}: Pipe rule '{}' -> {} {}", record.line, rule, tx_type, amount);
        Some(Resolution {
            description: cells[first..=last].join(" "),
            amount,
            tx_type,
        })
    }

    /// Splits a flattened row at its first in-range amount.
    pub fn space_row<'a>(&self, body: &'a str) -> Option<SpaceRow<'a>> {
        let mut first_start = None;
        let mut amounts = Vec::new();

        for m in find_amounts(&self.amount, body) {
            let Some(amount) = Money::parse_token(m.as_str()).filter(|a| self.in_range(*a)) else {
                continue;
            };
            first_start.get_or_insert(m.start());
            amounts.push(amount);
        }

        let description = body[..first_start?]
            .trim_end_matches(|c: char| matches!(c, '$' | '-' | '+') || c.is_whitespace());

        Some(SpaceRow {
            description,
            amounts,
        })
    }

    fn resolve_space(&self, record: &RawRecord) -> Option<Resolution> {
        let Some(row) = self.space_row(&record.body) else {
            debug!("Line {}: No amount found, skipping", record.line);
            return None;
        };

        let Some((rule, class)) = SPACE_RULES
            .iter()
            .find_map(|(name, rule)| rule(self, &row).map(|hit| (*name, hit)))
        else {
            warn!(
                "Line {}: Cannot infer transaction type for {:?}, skipping",
                record.line, row.description
            );
            return None;
        };

        let amount = select_amount(class.tx_type, &row.amounts)?;
        let description = row.description[..row.description.len() - class.label_len].trim_end();

        debug!(
            "Line {}: Space rule '{}' -> {} {}",
            record.line, rule, class.tx_type, amount
        );
        Some(Resolution {
            description: description.to_string(),
            amount,
            tx_type: class.tx_type,
        })
    }

    /// First configured phrase contained in the description decides the type.
    pub fn keyword_cue(&self, row: &SpaceRow<'_>) -> Option<Classification> {
        let lowered = row.description.to_lowercase();
        self.keyword_cues
            .iter()
            .find(|cue| lowered.contains(&cue.phrase))
            .map(|cue| Classification {
                tx_type: cue.tx_type,
                label_len: 0,
            })
    }

    /// A lone amount directly preceded by a DEBIT/CREDIT column label.
    pub fn labeled_single_amount(&self, row: &SpaceRow<'_>) -> Option<Classification> {
        if row.amounts.len() != 1 {
            return None;
        }

        let label = row.description.split_whitespace().next_back()?;
        let upper = label.to_uppercase();
        let tx_type = if self.debit_labels.contains(&upper) {
            TxType::Expense
        } else if self.credit_labels.contains(&upper) {
            TxType::Income
        } else {
            return None;
        };

        Some(Classification {
            tx_type,
            label_len: label.len(),
        })
    }
}

/// Income rows usually end in the running balance, so the credit is the
/// second-to-last amount; a debit is the first amount on the row.
pub fn select_amount(tx_type: TxType, amounts: &[Money]) -> Option<Money> {
    match tx_type {
        TxType::Income if amounts.len() >= 2 => amounts.get(amounts.len() - 2).copied(),
        TxType::Income | TxType::Expense => amounts.first().copied(),
    }
}
