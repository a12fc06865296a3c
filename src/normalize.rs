//! Record normalization: canonical dates, cleaned descriptions and the
//! plausibility checks that decide whether a resolved record is kept.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::resolve::Resolution;
use crate::segment::RawRecord;
use crate::transaction::ParsedTransaction;
use chrono::{Months, NaiveDate};
use log::warn;
use regex::{Regex, RegexBuilder};

/// Expands a statement year to four digits.
///
/// Two-digit years above `pivot` belong to the 1900s, the rest to the 2000s.
/// Any other width is taken literally.
pub fn expand_year(text: &str, pivot: u32) -> Option<i32> {
    let value: u32 = text.parse().ok()?;
    let year = if text.len() == 2 {
        if value > pivot {
            1900 + value
        } else {
            2000 + value
        }
    } else {
        value
    };
    i32::try_from(year).ok()
}

/// Builds a calendar date, rejecting combinations such as 31/02 or 29/02 in a
/// non-leap year.
pub fn calendar_date(day: u32, month: u32, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn case_insensitive(patterns: &[String], wrap: impl Fn(&str) -> String) -> Result<Vec<Regex>> {
    let compiled = patterns
        .iter()
        .map(|p| RegexBuilder::new(&wrap(p)).case_insensitive(true).build())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(compiled)
}

#[derive(Debug)]
pub struct RecordNormalizer {
    leading_date: Regex,
    prefixes: Vec<Regex>,
    rejected: Vec<Regex>,
    max_description_len: usize,
    max_age_years: u32,
}

impl RecordNormalizer {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(RecordNormalizer {
            leading_date: Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}\s*")?,
            prefixes: case_insensitive(&config.type_prefixes, |p| format!(r"^(?:{p})\s+"))?,
            rejected: case_insensitive(&config.rejected_descriptions, str::to_string)?,
            max_description_len: config.max_description_len,
            max_age_years: config.max_age_years,
        })
    }

    /// Cleans a raw description: pipes and repeated whitespace go, as do a
    /// leading date and the first matching transaction-type prefix. The result
    /// is truncated to the configured length.
    pub fn clean_description(&self, raw: &str) -> String {
        let collapsed = collapse_whitespace(&raw.replace('|', " "));

        let mut text = self.leading_date.replace(&collapsed, "").into_owned();
        if let Some(end) = self
            .prefixes
            .iter()
            .find_map(|re| re.find(&text).map(|m| m.end()))
        {
            text.replace_range(..end, "");
        }

        let cleaned = collapse_whitespace(&text);
        if cleaned.chars().count() > self.max_description_len {
            cleaned
                .chars()
                .take(self.max_description_len)
                .collect::<String>()
                .trim_end()
                .to_string()
        } else {
            cleaned
        }
    }

    /// A description must contain a letter and must not be a statement
    /// heading or summary line in disguise.
    pub fn is_valid_description(&self, description: &str) -> bool {
        !description.is_empty()
            && description.chars().any(char::is_alphabetic)
            && !self.rejected.iter().any(|re| re.is_match(description))
    }

    /// Returns `true` if `date` lies in `[today - max_age_years, today]`.
    pub fn within_window(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let earliest = self
            .max_age_years
            .checked_mul(12)
            .and_then(|months| today.checked_sub_months(Months::new(months)))
            .unwrap_or(NaiveDate::MIN);
        date >= earliest && date <= today
    }

    /// Turns a resolved record into a transaction, or drops it with a warning.
    pub fn normalize(
        &self,
        record: &RawRecord,
        resolution: Resolution,
        today: NaiveDate,
    ) -> Option<ParsedTransaction> {
        let Some(date) = calendar_date(record.day, record.month, record.year) else {
            warn!(
                "Line {}: Invalid date {:02}/{:02}/{}, skipping",
                record.line, record.day, record.month, record.year
            );
            return None;
        };

        if !self.within_window(date, today) {
            warn!(
                "Line {}: Date out of range: {}, skipping transaction",
                record.line, date
            );
            return None;
        }

        let description = self.clean_description(&resolution.description);
        if !self.is_valid_description(&description) {
            warn!(
                "Line {}: Unusable description {:?}, skipping transaction",
                record.line, description
            );
            return None;
        }

        if !resolution.amount.is_positive() {
            warn!("Line {}: Non-positive amount, skipping", record.line);
            return None;
        }

        Some(ParsedTransaction {
            date,
            description,
            amount: resolution.amount,
            tx_type: resolution.tx_type,
        })
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
