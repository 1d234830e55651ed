//! Record normalization: raw collection records and write-path drafts both
//! funnel into the canonical [`Transaction`] shape here.
//!
//! Normalization is total by design. Unrecognized type or status strings
//! never fail; they fall back to their defaults so the read path stays
//! resilient to schema drift between the two collections.

use chrono::{DateTime, Utc};

use crate::models::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};
use crate::storage::RawRecord;

/// Normalize a stored record from either backing collection.
///
/// The timestamp is taken from the record; a record stored without one is
/// backfilled with `now` rather than dropped, so nothing sorts as undated.
pub fn from_record(record: &RawRecord, now: DateTime<Utc>) -> Transaction {
    let kind = TransactionKind::parse(&record.kind);

    Transaction {
        id: record.id.clone().map(Into::into),
        user_id: record.user_id.clone(),
        kind,
        amount: record.amount,
        currency: record.currency.clone(),
        description: record.description.clone(),
        status: record
            .status
            .as_deref()
            .map(TransactionStatus::parse)
            .unwrap_or(TransactionStatus::Completed),
        timestamp: record.timestamp.unwrap_or(now),
        tx_hash: record.tx_hash.clone(),
        order_id: record.order_id.clone(),
        payment_id: record.payment_id.clone(),
        category: kind.category(),
        sub_type: kind.sub_type(),
    }
}

/// Normalize a write-path draft, stamping `now` as the event timestamp.
///
/// One timestamp per logical transaction: the dual-writer calls this once
/// and persists the result to both collections, so clock skew between the
/// two writes is never visible.
pub fn from_draft(draft: TransactionDraft, now: DateTime<Utc>) -> Transaction {
    Transaction {
        id: None,
        user_id: draft.user_id,
        kind: draft.kind,
        amount: draft.amount,
        currency: draft.currency,
        description: draft.description,
        status: draft.status.unwrap_or(TransactionStatus::Completed),
        timestamp: now,
        tx_hash: draft.tx_hash,
        order_id: draft.order_id,
        payment_id: draft.payment_id,
        category: draft.category.unwrap_or_else(|| draft.kind.category()),
        sub_type: draft.sub_type.unwrap_or_else(|| draft.kind.sub_type()),
    }
}

/// Project a canonical transaction back into the collections' raw shape,
/// using their legacy wire vocabulary (withdrawals stored as "withdraw").
pub fn to_record(tx: &Transaction) -> RawRecord {
    RawRecord {
        id: tx.id.as_ref().map(|id| id.as_str().to_string()),
        user_id: tx.user_id.clone(),
        kind: tx.kind.wire_str().to_string(),
        amount: tx.amount,
        currency: tx.currency.clone(),
        description: tx.description.clone(),
        status: Some(tx.status.as_str().to_string()),
        timestamp: Some(tx.timestamp),
        tx_hash: tx.tx_hash.clone(),
        order_id: tx.order_id.clone(),
        payment_id: tx.payment_id.clone(),
    }
}
