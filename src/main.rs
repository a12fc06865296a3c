//! Statement Engine CLI
//!
//! Reads extracted statement text and writes the reconstructed transactions
//! as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- statement.txt > transactions.csv
//! pdftotext -layout statement.pdf - | cargo run -- - --as-of 2024-06-30
//! ```
//!
//! # Options
//!
//! - `--as-of YYYY-MM-DD`: date treated as today for the 10-year window
//! - `--tolerance AMOUNT`: largest accepted difference against declared totals
//! - `--max-continuation N`: lines absorbed after a dated line
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug`, `info` or `warn` to control logging verbosity

use chrono::NaiveDate;
use statement_engine::{EngineError, Money, ParserConfig, Result, StatementEngine};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;
use std::str::FromStr;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Parsed command line.
#[derive(Debug, Default)]
struct CliArgs {
    input: String,
    as_of: Option<NaiveDate>,
    tolerance: Option<Money>,
    max_continuation: Option<usize>,
}

fn invalid(flag: &str, message: impl ToString) -> EngineError {
    EngineError::InvalidArgument {
        flag: flag.to_string(),
        message: message.to_string(),
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut input = None;
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let flag = arg.as_str();
        match flag {
            "--as-of" | "--tolerance" | "--max-continuation" => {
                let value = iter.next().ok_or_else(|| invalid(flag, "missing value"))?;
                match flag {
                    "--as-of" => {
                        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                            .map_err(|e| invalid(flag, e))?;
                        cli.as_of = Some(date);
                    }
                    "--tolerance" => {
                        let tolerance = Money::from_str(value).map_err(|e| invalid(flag, e))?;
                        if tolerance < Money::ZERO {
                            return Err(invalid(flag, "must not be negative"));
                        }
                        cli.tolerance = Some(tolerance);
                    }
                    _ => {
                        let lines: usize = value.parse().map_err(|e| invalid(flag, e))?;
                        cli.max_continuation = Some(lines);
                    }
                }
            }
            _ if flag.starts_with("--") => return Err(invalid(flag, "unknown option")),
            _ => {
                if input.replace(arg.clone()).is_some() {
                    return Err(invalid(flag, "only one input file is accepted"));
                }
            }
        }
    }

    cli.input = input.ok_or(EngineError::MissingArgument)?;
    Ok(cli)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(fs::read_to_string(path)?)
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    let mut config = ParserConfig::default();
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(lines) = cli.max_continuation {
        config.max_continuation_lines = lines;
    }

    let text = read_input(&cli.input)?;
    let engine = StatementEngine::new(config)?;
    let result = match cli.as_of {
        Some(today) => engine.parse_as_of(&text, today),
        None => engine.parse(&text),
    };

    if !result.validation.is_valid {
        for (label, diff) in result.validation.failures(engine.config().tolerance) {
            eprintln!("Warning: {} difference against statement totals: ${}", label, diff);
        }
    }

    let result = result.require_transactions()?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    result.write_transactions(handle)?;

    Ok(())
}
