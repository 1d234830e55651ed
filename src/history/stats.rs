//! Aggregate statistics over a user's merged timeline.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionKind};

/// Summary counts and volume for one user's merged timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_transactions: usize,
    pub total_deposits: usize,
    pub total_withdrawals: usize,
    /// Send + receive + transfer, counted together.
    pub total_transfers: usize,
    /// Sum of absolute amounts across every record, regardless of kind.
    pub total_volume: Decimal,
    /// Records whose timestamp falls inside the recent window ending now.
    pub recent_transactions: usize,
}

/// Pure aggregation over an already-merged timeline; no I/O of its own.
pub fn aggregate(
    timeline: &[Transaction],
    now: DateTime<Utc>,
    recent_window: Duration,
) -> TransactionStats {
    let cutoff = now - chrono::Duration::seconds(recent_window.as_secs() as i64);

    let mut stats = TransactionStats {
        total_transactions: timeline.len(),
        total_deposits: 0,
        total_withdrawals: 0,
        total_transfers: 0,
        total_volume: Decimal::ZERO,
        recent_transactions: 0,
    };

    for tx in timeline {
        match tx.kind {
            TransactionKind::Deposit => stats.total_deposits += 1,
            TransactionKind::Withdrawal => stats.total_withdrawals += 1,
            kind if kind.is_transfer_like() => stats.total_transfers += 1,
            _ => {}
        }
        stats.total_volume += tx.amount.abs();
        if tx.timestamp >= cutoff {
            stats.recent_transactions += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionDraft;
    use crate::normalize;
    use chrono::TimeZone;

    fn tx(kind: TransactionKind, amount: i64, at: DateTime<Utc>) -> Transaction {
        normalize::from_draft(
            TransactionDraft::new("u1", kind, Decimal::from(amount), "INR", "stat row"),
            at,
        )
    }

    #[test]
    fn counts_and_volume_over_mixed_timeline() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let timeline = vec![
            tx(TransactionKind::Deposit, 10, now),
            tx(TransactionKind::Deposit, -5, now),
            tx(TransactionKind::Deposit, 20, now),
            tx(TransactionKind::Transfer, 7, now),
            tx(TransactionKind::Transfer, -3, now),
        ];

        let stats = aggregate(&timeline, now, Duration::from_secs(24 * 60 * 60));

        assert_eq!(stats.total_transactions, 5);
        assert_eq!(stats.total_deposits, 3);
        assert_eq!(stats.total_withdrawals, 0);
        assert_eq!(stats.total_transfers, 2);
        assert_eq!(stats.total_volume, Decimal::from(45));
    }

    #[test]
    fn send_receive_and_transfer_all_count_as_transfers() {
        let now = Utc::now();
        let timeline = vec![
            tx(TransactionKind::Send, 1, now),
            tx(TransactionKind::Receive, 1, now),
            tx(TransactionKind::Transfer, 1, now),
            tx(TransactionKind::Withdrawal, 1, now),
        ];

        let stats = aggregate(&timeline, now, Duration::from_secs(60));
        assert_eq!(stats.total_transfers, 3);
        assert_eq!(stats.total_withdrawals, 1);
    }

    #[test]
    fn recent_counts_only_inside_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let timeline = vec![
            tx(TransactionKind::Deposit, 1, now - chrono::Duration::hours(1)),
            tx(TransactionKind::Deposit, 1, now - chrono::Duration::hours(23)),
            tx(TransactionKind::Deposit, 1, now - chrono::Duration::hours(25)),
        ];

        let stats = aggregate(&timeline, now, Duration::from_secs(24 * 60 * 60));
        assert_eq!(stats.recent_transactions, 2);
        assert_eq!(stats.total_transactions, 3);
    }

    #[test]
    fn empty_timeline_is_all_zero() {
        let stats = aggregate(&[], Utc::now(), Duration::from_secs(60));
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.total_volume, Decimal::ZERO);
        assert_eq!(stats.recent_transactions, 0);
    }
}
