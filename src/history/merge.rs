//! Deduplicating merge of the two collections' candidate records into one
//! timeline.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::models::Transaction;

/// Identity key deciding whether two records describe the same real-world
/// event.
///
/// A non-empty `tx_hash` is authoritative: two records referencing the same
/// external transaction are the same event no matter what else differs.
/// Without a hash, fall back to (description, amount, millisecond
/// timestamp). The fallback is a heuristic: distinct events sharing all
/// three fields within one millisecond collapse, and duplicates whose
/// stored timestamps drifted apart survive.
#[derive(Debug, PartialEq, Eq, Hash)]
enum IdentityKey {
    Hash(String),
    Heuristic {
        description: String,
        amount: Decimal,
        timestamp_ms: i64,
    },
}

impl IdentityKey {
    fn of(tx: &Transaction) -> Self {
        match tx.tx_hash.as_deref() {
            Some(hash) if !hash.is_empty() => Self::Hash(hash.to_string()),
            _ => Self::Heuristic {
                description: tx.description.clone(),
                amount: tx.amount,
                timestamp_ms: tx.timestamp.timestamp_millis(),
            },
        }
    }
}

/// Merge both collections' records into one de-duplicated, time-descending
/// timeline capped at `limit`.
///
/// First seen wins: when two records share an identity key, the one
/// earlier in the history-then-transactions concatenation is kept and the
/// other dropped silently. Truncation happens after the sort, so a
/// more-recent record is never dropped to keep an older one. Equal
/// timestamps have no guaranteed relative order.
pub fn merge_deduplicate(
    history: Vec<Transaction>,
    transactions: Vec<Transaction>,
    limit: usize,
) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Transaction> = Vec::with_capacity(history.len() + transactions.len());

    for tx in history.into_iter().chain(transactions) {
        if seen.insert(IdentityKey::of(&tx)) {
            merged.push(tx);
        }
    }

    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionDraft, TransactionKind};
    use crate::normalize;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn tx(description: &str, amount: i64, at: DateTime<Utc>) -> Transaction {
        normalize::from_draft(
            TransactionDraft::new(
                "u1",
                TransactionKind::Deposit,
                Decimal::from(amount),
                "INR",
                description,
            ),
            at,
        )
    }

    fn tx_with_hash(description: &str, amount: i64, hash: &str, at: DateTime<Utc>) -> Transaction {
        let mut tx = tx(description, amount, at);
        tx.tx_hash = Some(hash.to_string());
        tx
    }

    #[test]
    fn identical_hashes_collapse_to_first_seen() {
        let at = base_time();
        let from_history = tx_with_hash("deposit via app", 100, "0xabc", at);
        let from_transactions = tx_with_hash("completely different text", 999, "0xabc", at);

        let merged = merge_deduplicate(vec![from_history], vec![from_transactions], 10);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].description, "deposit via app");
        assert_eq!(merged[0].amount, Decimal::from(100));
    }

    #[test]
    fn distinct_hashes_both_survive() {
        let at = base_time();
        let merged = merge_deduplicate(
            vec![tx_with_hash("a", 1, "0xaaa", at)],
            vec![tx_with_hash("a", 1, "0xbbb", at)],
            10,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_hash_falls_back_to_heuristic_key() {
        let at = base_time();
        let mut a = tx("same", 5, at);
        a.tx_hash = Some(String::new());
        let b = tx("same", 5, at);

        let merged = merge_deduplicate(vec![a], vec![b], 10);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn heuristic_key_collapses_exact_matches_only() {
        let at = base_time();

        let merged = merge_deduplicate(vec![tx("same", 5, at)], vec![tx("same", 5, at)], 10);
        assert_eq!(merged.len(), 1, "identical triple should collapse");

        let merged = merge_deduplicate(
            vec![tx("same", 5, at)],
            vec![tx("same", 5, at + Duration::milliseconds(1))],
            10,
        );
        assert_eq!(merged.len(), 2, "1ms apart should keep both");

        let merged = merge_deduplicate(vec![tx("same", 5, at)], vec![tx("same", 6, at)], 10);
        assert_eq!(merged.len(), 2, "different amount should keep both");

        let merged = merge_deduplicate(vec![tx("same", 5, at)], vec![tx("other", 5, at)], 10);
        assert_eq!(merged.len(), 2, "different description should keep both");
    }

    #[test]
    fn output_is_time_descending() {
        let at = base_time();
        let history = vec![tx("h1", 1, at - Duration::hours(3)), tx("h2", 2, at)];
        let transactions = vec![
            tx("t1", 3, at - Duration::hours(1)),
            tx("t2", 4, at - Duration::hours(2)),
        ];

        let merged = merge_deduplicate(history, transactions, 10);
        assert_eq!(merged.len(), 4);
        assert!(merged
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn limit_keeps_the_most_recent_after_sorting() {
        let at = base_time();
        // History holds the older half, transactions the newer half; a
        // pre-sort truncation would wrongly keep old history entries.
        let history: Vec<_> = (0..5)
            .map(|i| tx(&format!("old {i}"), i, at - Duration::days(10 + i)))
            .collect();
        let transactions: Vec<_> = (0..5)
            .map(|i| tx(&format!("new {i}"), i, at - Duration::days(i)))
            .collect();

        let merged = merge_deduplicate(history, transactions, 3);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].description, "new 0");
        assert_eq!(merged[1].description, "new 1");
        assert_eq!(merged[2].description, "new 2");
    }

    #[test]
    fn record_present_in_only_one_store_is_returned_as_is() {
        let at = base_time();
        let merged = merge_deduplicate(vec![], vec![tx("only here", 42, at)], 10);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].description, "only here");
    }
}
