//! Record segmentation.
//!
//! A transaction starts on a line beginning with a `d/m/y` date (the anchor)
//! and may wrap onto the following lines: first description continuations,
//! then the line carrying the amounts. The segmenter walks the lines with an
//! explicit cursor and folds each anchor and its continuations into one
//! [`RawRecord`].

use crate::config::ParserConfig;
use crate::error::Result;
use crate::money::{find_amounts, is_standalone_amount, AMOUNT_PATTERN};
use crate::noise::NoiseFilter;
use crate::normalize::expand_year;
use log::{debug, warn};
use regex::{Captures, Regex};

/// An anchor line plus the continuation lines absorbed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based index of the anchor line in the normalized text.
    pub line: usize,

    /// Number of lines the record spans, anchor included.
    pub line_count: usize,

    pub day: u32,
    pub month: u32,

    /// Four-digit year after two-digit expansion.
    pub year: i32,

    /// Anchor remainder and absorbed lines, joined by single spaces.
    pub body: String,
}

/// How a line following an anchor relates to the record being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Text without amounts; absorbed and accretion continues.
    Description,
    /// Carries an amount in column position; absorbed and accretion ends.
    Amount,
    /// Not part of this record.
    Stop,
}

#[derive(Debug)]
pub struct Segmenter {
    anchor: Regex,
    amount: Regex,
    amount_column: Regex,
    max_continuation_lines: usize,
    year_pivot: u32,
}

impl Segmenter {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let gap = config.column_gap.max(1);
        Ok(Segmenter {
            anchor: Regex::new(r"^(?P<day>\d{1,2})/(?P<month>\d{1,2})/(?P<year>\d{2,4})")?,
            amount: Regex::new(AMOUNT_PATTERN)?,
            amount_column: Regex::new(&format!(
                r"\|\s*\$?({AMOUNT_PATTERN})|\s{{{gap},}}\$?({AMOUNT_PATTERN})|({AMOUNT_PATTERN})\s*\|?$"
            ))?,
            max_continuation_lines: config.max_continuation_lines,
            year_pivot: config.year_pivot,
        })
    }

    /// Iterates over the records found in `lines`.
    pub fn records<'a>(&'a self, lines: &'a [&'a str], noise: &'a NoiseFilter) -> Records<'a> {
        Records {
            segmenter: self,
            noise,
            lines,
            cursor: 0,
        }
    }

    /// Returns `true` if the line starts with something shaped like a date,
    /// whether or not the date itself is valid.
    pub fn is_date_anchored(&self, line: &str) -> bool {
        self.anchor.is_match(line)
    }

    /// Decides whether `line` continues the record opened by the previous anchor.
    pub fn classify_continuation(&self, line: &str, noise: &NoiseFilter) -> Continuation {
        if noise.is_noise(line) || self.is_date_anchored(line) {
            return Continuation::Stop;
        }

        if self.has_column_amount(line) {
            return Continuation::Amount;
        }

        if line.chars().any(char::is_alphabetic) && find_amounts(&self.amount, line).is_empty() {
            return Continuation::Description;
        }

        Continuation::Stop
    }

    /// An amount sitting after a pipe, after a wide gap, or at the end of the line.
    fn has_column_amount(&self, line: &str) -> bool {
        self.amount_column.captures_iter(line).any(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .any(|m| is_standalone_amount(line, m.start(), m.end()))
        })
    }

    /// Validates the anchor date's components, expanding two-digit years.
    fn anchor_date(&self, caps: &Captures<'_>, line_no: usize) -> Option<(u32, u32, i32)> {
        let day: u32 = caps["day"].parse().ok()?;
        let month: u32 = caps["month"].parse().ok()?;
        let year_text = &caps["year"];

        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            warn!(
                "Line {}: Invalid date components {}/{}/{}, skipping",
                line_no, day, month, year_text
            );
            return None;
        }

        let year = expand_year(year_text, self.year_pivot)?;
        if !(2000..=2099).contains(&year) {
            warn!("Line {}: Year out of range: {}, skipping", line_no, year);
            return None;
        }

        Some((day, month, year))
    }
}

/// Cursor over normalized lines yielding one record per valid anchor.
///
/// Each anchor absorbs at most `max_continuation_lines` following lines, so
/// every call to `next` does bounded work per line it consumes.
pub struct Records<'a> {
    segmenter: &'a Segmenter,
    noise: &'a NoiseFilter,
    lines: &'a [&'a str],
    cursor: usize,
}

impl Iterator for Records<'_> {
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        while self.cursor < self.lines.len() {
            let idx = self.cursor;
            let line = self.lines[idx];
            self.cursor += 1;

            if let Some(kind) = self.noise.classify(line) {
                debug!("Line {}: Skipping {:?} line", idx + 1, kind);
                continue;
            }

            let Some(caps) = self.segmenter.anchor.captures(line) else {
                continue;
            };

            let Some((day, month, year)) = self.segmenter.anchor_date(&caps, idx + 1) else {
                continue;
            };

            let anchor_end = caps.get(0).map_or(0, |m| m.end());
            let mut body = line[anchor_end..].trim().to_string();
            let mut absorbed = 0;

            while absorbed < self.segmenter.max_continuation_lines && self.cursor < self.lines.len()
            {
                let next_line = self.lines[self.cursor];
                let continuation = self.segmenter.classify_continuation(next_line, self.noise);
                if continuation == Continuation::Stop {
                    break;
                }

                append(&mut body, next_line);
                self.cursor += 1;
                absorbed += 1;

                if continuation == Continuation::Amount {
                    break;
                }
            }

            return Some(RawRecord {
                line: idx + 1,
                line_count: absorbed + 1,
                day,
                month,
                year,
                body,
            });
        }

        None
    }
}

fn append(body: &mut String, line: &str) {
    if !body.is_empty() {
        body.push(' ');
    }
    body.push_str(line);
}
