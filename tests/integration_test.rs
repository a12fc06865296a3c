//! Integration tests for the statement engine CLI.
//!
//! These tests run the actual binary against statement text fixtures and
//! compare its CSV output with expected files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Fixed "today" so the 10-year window does not move under the fixtures.
const AS_OF: &str = "2025-10-01";

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given input file and return stdout
fn run_engine(input_file: &str) -> String {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    let assert = cmd.arg(input_file).args(["--as-of", AS_OF]).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn lines(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[test]
fn test_westpac_statement_matches_expected_csv() {
    let output = run_engine(&test_data_path("westpac_statement.txt"));
    let expected = fs::read_to_string(test_data_path("expected_westpac.csv")).unwrap();

    assert_eq!(lines(&output), lines(&expected));
}

#[test]
fn test_balanced_statement_prints_no_warning() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.arg(test_data_path("westpac_statement.txt"))
        .args(["--as-of", AS_OF])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning").not());
}

#[test]
fn test_mismatched_totals_warn_but_succeed() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.arg(test_data_path("mismatch_statement.txt"))
        .args(["--as-of", AS_OF])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-08-14,ATM GEORGE ST,100.00,expense"))
        .stderr(predicate::str::contains(
            "Warning: debits difference against statement totals: $400.00",
        ))
        .stderr(predicate::str::contains(
            "Warning: closing balance difference against statement totals: $400.00",
        ));
}

#[test]
fn test_tolerance_flag_silences_warning() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.arg(test_data_path("mismatch_statement.txt"))
        .args(["--as-of", AS_OF, "--tolerance", "400.00"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning").not());
}

#[test]
fn test_no_transactions_is_rejected() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.arg(test_data_path("no_transactions.txt"))
        .args(["--as-of", AS_OF])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No transactions found"));
}

#[test]
fn test_reads_statement_from_stdin() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.args(["-", "--as-of", AS_OF])
        .write_stdin("01/03/24 WOOLWORTHS 123 DEBIT 45.67\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-01,WOOLWORTHS 123,45.67,expense"));
}

#[test]
fn test_reads_statement_from_temp_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "05/04/24 | Salary TFR | | 2500.00 | 5000.00").unwrap();
    writeln!(file, "05/04/24 | Salary TFR | | 2500.00 | 5000.00").unwrap();

    let output = run_engine(file.path().to_str().unwrap());

    assert_eq!(
        lines(&output),
        vec![
            "date,description,amount,type".to_string(),
            "2024-04-05,Salary TFR,2500.00,income".to_string(),
        ]
    );
}

#[test]
fn test_as_of_excludes_future_transactions() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.args(["-", "--as-of", "2024-02-29"])
        .write_stdin("01/03/24 WOOLWORTHS 123 DEBIT 45.67\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No transactions found"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.arg("nonexistent.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_invalid_as_of_error() {
    let mut cmd = Command::cargo_bin("statement-engine").unwrap();
    cmd.args([test_data_path("westpac_statement.txt").as_str(), "--as-of", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for --as-of"));
}

#[test]
fn test_output_has_correct_header() {
    let output = run_engine(&test_data_path("westpac_statement.txt"));
    assert!(output.starts_with("date,description,amount,type"));
}

#[test]
fn test_amounts_have_two_decimal_places() {
    let output = run_engine(&test_data_path("westpac_statement.txt"));

    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split(',').collect();
        let amount = parts[parts.len() - 2];
        let dot_pos = amount.find('.').expect("amount has a decimal point");
        assert_eq!(amount.len() - dot_pos - 1, 2, "Expected 2 decimal places in: {}", amount);
    }
}
