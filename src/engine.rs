//! Statement parsing engine.
//!
//! Runs the whole pipeline over one statement's text: line normalization,
//! summary extraction, segmentation, column/type resolution, record
//! normalization, deduplication and cross-validation. Nothing in the text can
//! make the engine fail; unusable lines are logged and skipped.

use crate::config::ParserConfig;
use crate::dedup::dedup_and_sort;
use crate::error::{EngineError, Result};
use crate::money::Money;
use crate::noise::NoiseFilter;
use crate::normalize::RecordNormalizer;
use crate::resolve::Resolver;
use crate::segment::Segmenter;
use crate::summary::{StatementSummary, SummaryExtractor};
use crate::text::normalize_lines;
use crate::transaction::ParsedTransaction;
use crate::validate::{cross_validate, ValidationResult};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::io::Write;

/// Everything recovered from one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Transactions in ascending date order.
    pub transactions: Vec<ParsedTransaction>,

    /// Figures the statement declares about itself.
    pub summary: StatementSummary,

    /// Recomputed totals checked against `summary`.
    pub validation: ValidationResult,
}

impl ParseResult {
    /// Rejects a result with no transactions.
    ///
    /// The engine itself never treats an empty result as an error; embedding
    /// layers that want to refuse such statements call this.
    pub fn require_transactions(self) -> Result<Self> {
        if self.transactions.is_empty() {
            return Err(EngineError::NoTransactions);
        }
        Ok(self)
    }

    /// Writes transactions as CSV with the header `date,description,amount,type`.
    pub fn write_transactions<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if self.transactions.is_empty() {
            csv_writer.write_record(["date", "description", "amount", "type"])?;
        }
        for txn in &self.transactions {
            csv_writer.serialize(txn)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// The statement parsing engine.
///
/// Holds only compiled, immutable configuration, so one engine can parse any
/// number of statements, concurrently if needed.
#[derive(Debug)]
pub struct StatementEngine {
    config: ParserConfig,
    summary: SummaryExtractor,
    noise: NoiseFilter,
    segmenter: Segmenter,
    resolver: Resolver,
    normalizer: RecordNormalizer,
}

impl StatementEngine {
    /// Compiles the configuration's pattern tables.
    ///
    /// Fails only if a configured pattern is not a valid regular expression.
    pub fn new(config: ParserConfig) -> Result<Self> {
        Ok(StatementEngine {
            summary: SummaryExtractor::new()?,
            noise: NoiseFilter::new(&config)?,
            segmenter: Segmenter::new(&config)?,
            resolver: Resolver::new(&config)?,
            normalizer: RecordNormalizer::new(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses statement text, accepting dates up to the local date today.
    pub fn parse(&self, text: &str) -> ParseResult {
        self.parse_as_of(text, Local::now().date_naive())
    }

    /// Parses statement text with an explicit "today" for the date window.
    pub fn parse_as_of(&self, text: &str, today: NaiveDate) -> ParseResult {
        let lines = normalize_lines(text);
        let summary = self.summary.extract(&lines);

        let mut transactions = Vec::new();
        for record in self.segmenter.records(&lines, &self.noise) {
            let Some(resolution) = self.resolver.resolve(&record) else {
                continue;
            };
            if let Some(txn) = self.normalizer.normalize(&record, resolution, today) {
                debug!(
                    "Line {} ({} lines): Accepted {} {} {} {:?}",
                    record.line,
                    record.line_count,
                    txn.iso_date(),
                    txn.tx_type,
                    txn.amount,
                    txn.description
                );
                transactions.push(txn);
            }
        }

        let transactions = dedup_and_sort(transactions);
        let validation = cross_validate(&transactions, &summary, self.config.tolerance);

        self.report(&lines, &transactions, &summary, &validation);

        ParseResult {
            transactions,
            summary,
            validation,
        }
    }

    fn report(
        &self,
        lines: &[&str],
        transactions: &[ParsedTransaction],
        summary: &StatementSummary,
        validation: &ValidationResult,
    ) {
        info!(
            "Parsed {} transactions from {} lines",
            transactions.len(),
            lines.len()
        );
        if let (Some(first), Some(last)) = (transactions.first(), transactions.last()) {
            info!("Date range: {} to {}", first.iso_date(), last.iso_date());
        } else if !lines.is_empty() {
            warn!("No transactions found in non-empty statement text");
        }

        let declared = |value: Option<Money>| {
            value.map_or_else(|| "not found".to_string(), |v| format!("${v}"))
        };
        info!("Opening balance: {}", declared(summary.opening_balance));
        info!("Closing balance: {}", declared(summary.closing_balance));
        info!(
            "Total credits: declared {}, calculated ${}",
            declared(summary.total_credits),
            validation.calculated_credits
        );
        info!(
            "Total debits: declared {}, calculated ${}",
            declared(summary.total_debits),
            validation.calculated_debits
        );
        if let Some(closing) = validation.calculated_closing_balance {
            info!("Closing balance (calculated): ${}", closing);
        }

        if validation.is_valid {
            info!("Validation passed");
        } else {
            for (label, diff) in validation.failures(self.config.tolerance) {
                warn!("Validation failed: {} difference ${}", label, diff);
            }
        }
    }
}
