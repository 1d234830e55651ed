mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Id, TransactionKind};

/// A record as the backing collections actually hold it: string-typed
/// `type`/`status`, optional everything else. Both collections share this
/// shape; the normalizer turns it into a canonical [`Transaction`].
///
/// [`Transaction`]: crate::models::Transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

/// Equality filter for collection queries.
///
/// The kind is carried in the collections' wire vocabulary (so a filter for
/// [`TransactionKind::Withdrawal`] queries `"withdraw"`, matching what the
/// dual-writer stores).
#[derive(Debug, Clone)]
pub struct RecordFilter {
    pub user_id: String,
    pub kind: Option<String>,
}

impl RecordFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind.wire_str().to_string());
        self
    }
}

/// Storage trait over the two backing collections.
///
/// Implementations own the query semantics: `fetch` must filter by equality
/// on `user_id` (and `kind` when set), order by timestamp descending, and
/// truncate to `limit`. `insert` returns the store-assigned identifier.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch(
        &self,
        collection: &str,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<RawRecord>>;

    async fn insert(&self, collection: &str, record: &RawRecord) -> Result<Id>;
}
