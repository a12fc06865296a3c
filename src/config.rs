//! Parser configuration.
//!
//! All pattern and keyword tables live here as plain data. The engine
//! compiles them once in [`StatementEngine::new`](crate::StatementEngine::new)
//! and never mutates them afterwards.

use crate::money::Money;
use crate::transaction::TxType;

/// Lines matching any of these (case-insensitively) never become transactions.
const NOISE_PATTERNS: &[&str] = &[
    // statement and page headers
    r"^statement\s+no\.?\s*\d+\s+page\s+\d+",
    r"^page\s+\d+\s+of\s+\d+",
    // declared balances and totals, consumed by the summary extractor
    r"^opening\s+balance",
    r"^closing\s+balance",
    r"^statement\s+opening\s+balance",
    r"^statement\s+closing\s+balance",
    r"^total\s+(credits|debits|deposits|withdrawals)",
    r"^balance\s+brought\s+forward",
    r"^balance\s+carried\s+forward",
    // address fragments
    r"^\d+\s+NSW\s+\d+",
    r"^[A-Z]+\s+ST\s*$",
    r"^[A-Z]+\s+[A-Z]+\s+NSW",
    // account metadata
    r"^account\s+name",
    r"^account\s+number",
    r"^customer\s+id",
    r"^bsb",
    // column headers
    r"^transaction\s+history",
    r"^date\s+transaction\s+description",
    r"^date\s+description",
    r"^debit\s+credit\s+balance",
    r"^---+",
    // banners, disclaimers and footers
    r"^westpac\s+banking",
    r"^thank\s+you",
    r"^convenience",
    r"^more\s+information",
    r"^understanding",
    r"^complaints",
    r"^interest\s+rates",
    r"^tax\s+file",
    r"^please\s+check",
];

/// Transaction-type prefixes stripped from the front of a description.
/// Only the first matching prefix is removed, so longer phrases come first.
const TYPE_PREFIXES: &[&str] = &[
    r"deposit\s*-\s*osko\s+payment",
    r"deposit\s+online",
    r"debit\s+card\s+purchase",
    r"eftpos\s+debit",
    r"payment\s+by\s+authority",
    r"withdrawal",
    r"deposit",
];

/// Descriptions that are really statement headings or summary lines.
const REJECTED_DESCRIPTIONS: &[&str] = &[
    r"^statement\s+no",
    r"^page\s+\d+",
    r"^opening\s+balance",
    r"^closing\s+balance",
    r"^total\s+",
];

/// Keyword cues in priority order; the first phrase found wins.
const KEYWORD_CUES: &[(&str, TxType)] = &[
    ("debit card purchase", TxType::Expense),
    ("eftpos debit", TxType::Expense),
    ("payment by authority", TxType::Expense),
    ("withdrawal", TxType::Expense),
    ("osko payment", TxType::Income),
    ("deposit", TxType::Income),
    ("salary", TxType::Income),
    ("transfer", TxType::Income),
    ("tfr", TxType::Income),
    ("purchase", TxType::Expense),
    ("payment", TxType::Expense),
];

/// A lowercase phrase whose presence in a description decides its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCue {
    pub phrase: String,
    pub tx_type: TxType,
}

impl KeywordCue {
    pub fn new(phrase: impl Into<String>, tx_type: TxType) -> Self {
        KeywordCue {
            phrase: phrase.into().to_lowercase(),
            tx_type,
        }
    }
}

/// Tunable tables and thresholds for one engine instance.
///
/// Patterns are regular expressions matched case-insensitively.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Boilerplate line patterns (headers, footers, totals, addresses).
    pub noise_patterns: Vec<String>,

    /// Transaction-type prefixes stripped from descriptions.
    pub type_prefixes: Vec<String>,

    /// Cleaned descriptions matching these are rejected.
    pub rejected_descriptions: Vec<String>,

    /// Keyword cues for space-delimited rows, in priority order.
    pub keyword_cues: Vec<KeywordCue>,

    /// Column labels marking a lone amount as a debit.
    pub debit_labels: Vec<String>,

    /// Column labels marking a lone amount as a credit.
    pub credit_labels: Vec<String>,

    /// Maximum number of lines absorbed after an anchor line.
    pub max_continuation_lines: usize,

    /// Minimum run of spaces that separates a description from an amount column.
    pub column_gap: usize,

    /// Smallest amount accepted as a candidate.
    pub min_amount: Money,

    /// Largest amount accepted as a candidate; bigger numbers are account
    /// numbers or similar.
    pub max_amount: Money,

    /// Two-digit years above this are 19xx, the rest 20xx.
    pub year_pivot: u32,

    /// Transactions older than this many years are rejected.
    pub max_age_years: u32,

    /// Descriptions are truncated to this many characters.
    pub max_description_len: usize,

    /// Largest difference still treated as a match by the cross-validator.
    pub tolerance: Money,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            noise_patterns: to_strings(NOISE_PATTERNS),
            type_prefixes: to_strings(TYPE_PREFIXES),
            rejected_descriptions: to_strings(REJECTED_DESCRIPTIONS),
            keyword_cues: KEYWORD_CUES
                .iter()
                .map(|(phrase, tx_type)| KeywordCue::new(*phrase, *tx_type))
                .collect(),
            debit_labels: to_strings(&["DEBIT", "DR"]),
            credit_labels: to_strings(&["CREDIT", "CR"]),
            max_continuation_lines: 4,
            column_gap: 5,
            min_amount: Money::from_cents(1),
            max_amount: Money::from_cents(1_000_000_000),
            year_pivot: 50,
            max_age_years: 10,
            max_description_len: 200,
            tolerance: Money::from_cents(10),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
