//! Error types for the statement engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while building the engine or handling its output.
///
/// Malformed statement text never produces an error; unusable lines are
/// skipped and logged instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input, or to write the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    /// A configured noise, prefix or description pattern is not a valid regex
    #[error("Invalid pattern in parser configuration: {0}")]
    Pattern(#[from] regex::Error),

    /// A command line flag has a value that could not be used
    #[error("Invalid value for {flag}: {message}")]
    InvalidArgument { flag: String, message: String },

    /// Non-empty statement text yielded no transactions at all
    #[error("No transactions found in statement text")]
    NoTransactions,

    /// Missing input file argument
    #[error("Missing input file argument. Usage: statement-engine <statement.txt|-> [--as-of YYYY-MM-DD] [--tolerance AMOUNT] [--max-continuation N]")]
    MissingArgument,
}
