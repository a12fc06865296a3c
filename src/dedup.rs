//! Duplicate suppression and date ordering.

use crate::transaction::{ParsedTransaction, TxType};
use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;

/// Drops duplicates (first occurrence in scan order wins) and sorts the rest
/// ascending by date. The sort is stable, so same-day transactions keep their
/// statement order.
///
/// Candidates are bucketed by date, type and description; within a bucket
/// [`ParsedTransaction::is_duplicate_of`] decides.
pub fn dedup_and_sort(transactions: Vec<ParsedTransaction>) -> Vec<ParsedTransaction> {
    let mut buckets: HashMap<(NaiveDate, TxType, String), Vec<usize>> = HashMap::new();
    let mut unique: Vec<ParsedTransaction> = Vec::with_capacity(transactions.len());

    for txn in transactions {
        let bucket = buckets
            .entry((txn.date, txn.tx_type, txn.description.clone()))
            .or_default();

        if bucket.iter().any(|&idx| unique[idx].is_duplicate_of(&txn)) {
            debug!(
                "Dropping duplicate {} {:?} {}",
                txn.iso_date(),
                txn.description,
                txn.amount
            );
            continue;
        }

        bucket.push(unique.len());
        unique.push(txn);
    }

    unique.sort_by_key(|t| t.date);
    unique
}
