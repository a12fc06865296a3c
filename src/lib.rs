//! # Statement Engine
//!
//! Reconstructs bank statement transactions from text already extracted from
//! the statement document, and checks them against the totals the statement
//! declares about itself.
//!
//! ## Design Principles
//!
//! - **Best effort, never failing**: malformed lines are logged and skipped
//! - **Exact arithmetic**: amounts are 2-decimal `rust_decimal` values
//! - **Configuration as data**: pattern and keyword tables live in
//!   [`ParserConfig`] and are compiled once per engine
//! - **Deterministic output**: transactions sorted by date, duplicates removed
//!
//! ## Example
//!
//! ```no_run
//! use statement_engine::{ParserConfig, StatementEngine};
//!
//! let text = "Opening Balance $1,000.00\n\
//!             01/03/24 WOOLWORTHS 123 DEBIT 45.67\n\
//!             Closing Balance $954.33";
//! let engine = StatementEngine::new(ParserConfig::default()).unwrap();
//! let result = engine.parse(text);
//! assert!(result.validation.is_valid);
//! result.write_transactions(std::io::stdout()).unwrap();
//! ```

pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod money;
pub mod noise;
pub mod normalize;
pub mod resolve;
pub mod segment;
pub mod summary;
pub mod text;
pub mod transaction;
pub mod validate;

pub use config::{KeywordCue, ParserConfig};
pub use engine::{ParseResult, StatementEngine};
pub use error::{EngineError, Result};
pub use money::Money;
pub use summary::StatementSummary;
pub use transaction::{ParsedTransaction, TxType};
pub use validate::{Differences, ValidationResult};
