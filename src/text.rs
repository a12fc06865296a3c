//! Line splitting for extracted statement text.

/// Splits text into trimmed, non-empty lines.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
