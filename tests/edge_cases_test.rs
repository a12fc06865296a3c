//! Edge case tests for statement parsing through the public API.
//!
//! Every test pins "today" so the 10-year date window is reproducible.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use statement_engine::{
    Money, ParseResult, ParsedTransaction, ParserConfig, StatementEngine, TxType,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn engine() -> StatementEngine {
    StatementEngine::new(ParserConfig::default()).unwrap()
}

fn parse(text: &str) -> ParseResult {
    engine().parse_as_of(text, today())
}

fn only(result: &ParseResult) -> &ParsedTransaction {
    assert_eq!(result.transactions.len(), 1, "{:?}", result.transactions);
    &result.transactions[0]
}

// ==================== SCENARIOS ====================

#[test]
fn test_labeled_debit_line() {
    let result = parse("01/03/24 WOOLWORTHS 123 DEBIT 45.67");
    let txn = only(&result);

    assert_eq!(txn.iso_date(), "2024-03-01");
    assert_eq!(txn.amount, Money::new(dec!(45.67)));
    assert_eq!(txn.tx_type, TxType::Expense);
    assert_eq!(txn.description, "WOOLWORTHS 123");
}

#[test]
fn test_balances_reconcile() {
    let text = "\
Opening Balance $1,000.00
10/03/24 EFTPOS DEBIT HARDWARE STORE 100.00
Closing Balance $900.00";

    let result = parse(text);

    assert_eq!(only(&result).amount, Money::new(dec!(100.00)));
    assert_eq!(result.validation.calculated_credits, Money::ZERO);
    assert_eq!(
        result.validation.calculated_closing_balance,
        Some(Money::new(dec!(900.00)))
    );
    assert_eq!(result.validation.differences.closing_balance, Some(Money::ZERO));
    assert!(result.validation.is_valid);
}

#[test]
fn test_pipe_row_credit_column() {
    let result = parse("05/04/24 | Salary TFR | | 2500.00 | 5000.00");
    let txn = only(&result);

    assert_eq!(txn.tx_type, TxType::Income);
    assert_eq!(txn.amount, Money::new(dec!(2500.00)));
    assert_eq!(txn.description, "Salary TFR");
}

#[test]
fn test_duplicated_line_yields_one_transaction() {
    let line = "05/04/24 | Salary TFR | | 2500.00 | 5000.00";
    let result = parse(&format!("{line}\n{line}"));

    assert_eq!(result.transactions.len(), 1);
    assert_eq!(result.validation.calculated_credits, Money::new(dec!(2500.00)));
}

#[test]
fn test_two_digit_years_pivot() {
    let result = parse("15/06/23 SALARY ACME 10.00 20.00\n15/06/97 SALARY ACME 10.00 20.00");

    // 1997 is expanded correctly but lies outside the accepted anchor years
    let txn = only(&result);
    assert_eq!(txn.iso_date(), "2023-06-15");
}

// ==================== DATE WINDOW ====================

#[test]
fn test_exactly_ten_years_old_is_kept() {
    let result = parse("16/10/2016 SALARY ACME 10.00 20.00");
    assert_eq!(only(&result).iso_date(), "2016-10-16");
}

#[test]
fn test_older_than_ten_years_is_excluded() {
    let result = parse("15/10/2016 SALARY ACME 10.00 20.00");
    assert!(result.transactions.is_empty());
}

#[test]
fn test_future_date_is_excluded() {
    let result = parse("17/10/2026 SALARY ACME 10.00 20.00\n16/10/2026 SALARY ACME 11.00 21.00");

    let txn = only(&result);
    assert_eq!(txn.iso_date(), "2026-10-16");
    assert_eq!(txn.amount, Money::new(dec!(11.00)));
}

#[test]
fn test_impossible_calendar_date_is_dropped() {
    let result = parse("31/02/24 SALARY ACME 10.00 20.00\n29/02/24 SALARY ACME 10.00 20.00");
    assert_eq!(only(&result).iso_date(), "2024-02-29");
}

#[test]
fn test_four_digit_year_anchor() {
    let result = parse("7/1/2025 Withdrawal ATM 60.00 940.00");
    let txn = only(&result);

    assert_eq!(txn.iso_date(), "2025-01-07");
    assert_eq!(txn.description, "ATM");
}

// ==================== ACCRETION ====================

#[test]
fn test_wrapped_description_and_amount_line() {
    let text = "\
03/09/25 Deposit - Osko Payment
From J Smith
Rent share                         350.00    1,517.55";

    let result = parse(text);
    let txn = only(&result);

    assert_eq!(txn.tx_type, TxType::Income);
    assert_eq!(txn.amount, Money::new(dec!(350.00)));
    assert_eq!(txn.description, "From J Smith Rent share");
}

#[test]
fn test_wrapped_pipe_row() {
    let result = parse("05/04/24 | Salary TFR |\nACME PTY LTD | | 2500.00 | 5000.00");
    let txn = only(&result);

    assert_eq!(txn.tx_type, TxType::Income);
    assert_eq!(txn.amount, Money::new(dec!(2500.00)));
    assert_eq!(txn.description, "Salary TFR ACME PTY LTD");
}

#[test]
fn test_dotted_value_date_is_not_an_amount() {
    let result = parse("01/03/24 EFTPOS DEBIT SHOP VALUE DATE 28.02.24 45.00 100.00");
    let txn = only(&result);

    assert_eq!(txn.tx_type, TxType::Expense);
    assert_eq!(txn.amount, Money::new(dec!(45.00)));
    assert_eq!(txn.description, "SHOP VALUE DATE 28.02.24");
}

#[test]
fn test_noise_between_records_is_ignored() {
    let text = "\
01/09/25 EFTPOS DEBIT BAKERY 7.20 100.00
Page 2 of 3
Date Description Debit Credit Balance
02/09/25 EFTPOS DEBIT BUTCHER 12.80 87.20";

    let result = parse(text);
    let descriptions: Vec<_> = result
        .transactions
        .iter()
        .map(|t| t.description.as_str())
        .collect();

    assert_eq!(descriptions, vec!["BAKERY", "BUTCHER"]);
}

#[test]
fn test_windows_line_endings() {
    let result = parse("01/03/24 WOOLWORTHS 123 DEBIT 45.67\r\n\r\n02/03/24 COLES DEBIT 5.00\r\n");
    assert_eq!(result.transactions.len(), 2);
}

// ==================== TYPE INFERENCE ====================

#[test]
fn test_unclassifiable_rows_are_dropped() {
    let result = parse("01/03/24 MYSTERY MERCHANT 12.00 140.00");
    assert!(result.transactions.is_empty());
}

#[test]
fn test_description_without_letters_is_dropped() {
    let result = parse("01/03/24 | 1234 | 5.00 | | 10.00");
    assert!(result.transactions.is_empty());
}

#[test]
fn test_custom_keyword_cue() {
    let mut config = ParserConfig::default();
    config
        .keyword_cues
        .insert(0, statement_engine::KeywordCue::new("refund", TxType::Income));
    let engine = StatementEngine::new(config).unwrap();

    let result = engine.parse_as_of("01/03/24 Refund JB HIFI 49.00 149.00", today());
    let txn = only(&result);

    assert_eq!(txn.tx_type, TxType::Income);
    assert_eq!(txn.amount, Money::new(dec!(49.00)));
}

// ==================== PROPERTIES ====================

const MIXED_STATEMENT: &str = "\
Opening Balance $1,000.00
Total Credits $2,500.00
Total Debits $150.00
Closing Balance $3,350.00
12/03/24 EFTPOS DEBIT CAFE 50.00 950.00
01/03/24 | Salary TFR | | 2500.00 | 3450.00
12/03/24 EFTPOS DEBIT CAFE 50.00 950.00
05/03/24 PAYMENT BY AUTHORITY GYM 100.00 3350.00
05/03/24 PAYMENT BY AUTHORITY GYM 100.00 3350.00";

#[test]
fn test_parsing_is_idempotent() {
    let engine = engine();
    assert_eq!(
        engine.parse_as_of(MIXED_STATEMENT, today()),
        engine.parse_as_of(MIXED_STATEMENT, today())
    );
}

#[test]
fn test_output_is_ordered_positive_and_unique() {
    let result = parse(MIXED_STATEMENT);
    let txns = &result.transactions;

    assert_eq!(txns.len(), 3);
    assert!(txns.windows(2).all(|w| w[0].date <= w[1].date));
    assert!(txns.iter().all(|t| t.amount.is_positive()));
    for (i, a) in txns.iter().enumerate() {
        for b in &txns[i + 1..] {
            assert!(!a.is_duplicate_of(b));
        }
    }
}

#[test]
fn test_mixed_statement_validates() {
    let result = parse(MIXED_STATEMENT);
    let validation = &result.validation;

    assert_eq!(validation.calculated_credits, Money::new(dec!(2500.00)));
    assert_eq!(validation.calculated_debits, Money::new(dec!(150.00)));
    assert_eq!(
        validation.calculated_closing_balance,
        Some(Money::new(dec!(1000.00)) + Money::new(dec!(2500.00)) - Money::new(dec!(150.00)))
    );
    assert!(validation.is_valid);
}

#[test]
fn test_missed_row_fails_validation() {
    let text = MIXED_STATEMENT.replace("05/03/24 PAYMENT BY AUTHORITY GYM", "05/03/24 GYM");
    let result = parse(&text);

    assert!(!result.validation.is_valid);
    assert_eq!(result.validation.differences.debits, Some(Money::new(dec!(100.00))));
    assert_eq!(
        result.validation.differences.closing_balance,
        Some(Money::new(dec!(100.00)))
    );
    assert_eq!(result.validation.differences.credits, Some(Money::ZERO));
}

#[test]
fn test_empty_text() {
    let result = parse("");

    assert!(result.transactions.is_empty());
    assert_eq!(result.summary, Default::default());
    assert!(result.validation.is_valid);
}

#[test]
fn test_concurrent_parsing_shares_one_engine() {
    let engine = engine();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.parse_as_of(MIXED_STATEMENT, today())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().transactions.len(), 3);
        }
    });
}
