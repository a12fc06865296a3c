//! Boilerplate detection.
//!
//! Extracted statement text is full of lines that look nothing like a
//! transaction: page headers, column titles, the bank's address block,
//! footers. Each of them is classified here so the segmenter can skip it.

use crate::config::ParserConfig;
use crate::error::Result;
use regex::{Regex, RegexBuilder};

/// Why a line was classified as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// Fewer than 3 characters.
    TooShort,
    /// Matched a configured header/footer/summary pattern.
    Boilerplate,
    /// Uppercase words followed by a number, with no date inside.
    Address,
    /// Only digits and punctuation, shorter than 20 characters.
    Numeric,
}

/// Lines at least this long are never discarded as purely numeric.
const NUMERIC_LINE_LIMIT: usize = 20;

#[derive(Debug)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
    address: Regex,
    date_fragment: Regex,
    numeric: Regex,
}

impl NoiseFilter {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let patterns = config
            .noise_patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(NoiseFilter {
            patterns,
            address: Regex::new(r"^[A-Z\s]{2,30}\s+\d+$")?,
            date_fragment: Regex::new(r"\d{1,2}[/-]\d{1,2}")?,
            numeric: Regex::new(r"^[\d\s.,$+-]+$")?,
        })
    }

    /// Classifies a trimmed line, returning `None` for lines worth parsing.
    pub fn classify(&self, line: &str) -> Option<NoiseKind> {
        if line.chars().count() < 3 {
            return Some(NoiseKind::TooShort);
        }

        if self.patterns.iter().any(|p| p.is_match(line)) {
            return Some(NoiseKind::Boilerplate);
        }

        if self.address.is_match(line) && !self.date_fragment.is_match(line) {
            return Some(NoiseKind::Address);
        }

        if line.len() < NUMERIC_LINE_LIMIT && self.numeric.is_match(line) {
            return Some(NoiseKind::Numeric);
        }

        None
    }

    pub fn is_noise(&self, line: &str) -> bool {
        self.classify(line).is_some()
    }
}
