//! The unified transaction history service.
//!
//! Reconciles one user's transaction records from the two backing
//! collections ("history" and "transactions") into a single de-duplicated,
//! newest-first view, and writes each logical transaction event into both
//! collections.

mod merge;
mod stats;

pub use merge::merge_deduplicate;
pub use stats::{aggregate, TransactionStats};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::config::HistoryConfig;
use crate::models::{Id, Transaction, TransactionDraft, TransactionKind};
use crate::normalize;
use crate::storage::{DocumentStore, RecordFilter};

/// Failures the caller must distinguish on the write path.
///
/// The read path has no error type: a source failing is recovered locally
/// (logged, treated as empty) per the degradation policy, and merging is
/// infallible.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("transaction rejected: {reason}")]
    InvalidTransaction { reason: String },

    /// The authoritative write failed; the logical transaction was not
    /// logged, whatever happened to the secondary copy.
    #[error("primary write to '{collection}' failed")]
    PrimaryWrite {
        collection: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Unified history over a document store holding both collections.
///
/// Stateless apart from its collaborators; construct one per process (or
/// per call) and share it freely.
pub struct HistoryService {
    store: Arc<dyn DocumentStore>,
    config: HistoryConfig,
    clock: Arc<dyn Clock>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config: HistoryConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_config(mut self, config: HistoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Log one logical transaction event into both collections.
    ///
    /// Both inserts are issued concurrently with a single shared timestamp.
    /// The "transactions" collection is authoritative: its failure fails
    /// the operation, while a "history" failure is logged and absorbed.
    /// Returns the primary collection's assigned identifier. The two
    /// collections may diverge after a partial failure; the read path's
    /// deduplication tolerates that.
    pub async fn log_transaction(&self, draft: TransactionDraft) -> Result<Id, HistoryError> {
        if draft.user_id.trim().is_empty() {
            return Err(HistoryError::InvalidTransaction {
                reason: "userId must be non-empty".to_string(),
            });
        }

        let tx = normalize::from_draft(draft, self.clock.now());
        let record = normalize::to_record(&tx);

        let (primary, secondary) = tokio::join!(
            self.store
                .insert(&self.config.transactions_collection, &record),
            self.store.insert(&self.config.history_collection, &record),
        );

        if let Err(err) = secondary {
            tracing::warn!(
                error = %err,
                collection = %self.config.history_collection,
                "secondary history write failed; transaction still logged"
            );
        }

        let id = primary.map_err(|source| HistoryError::PrimaryWrite {
            collection: self.config.transactions_collection.clone(),
            source,
        })?;

        tracing::debug!(id = %id, kind = %tx.kind.as_str(), "transaction logged");
        Ok(id)
    }

    /// The user's merged timeline: both collections fetched concurrently,
    /// normalized, de-duplicated, newest first, capped at `limit`.
    ///
    /// A source failing is not an error; its records are simply missing
    /// from the result. If both sources fail the result is empty.
    pub async fn user_transactions(
        &self,
        user_id: &str,
        kind: Option<TransactionKind>,
        limit: usize,
    ) -> Vec<Transaction> {
        let mut filter = RecordFilter::for_user(user_id);
        if let Some(kind) = kind {
            filter = filter.with_kind(kind);
        }

        let now = self.clock.now();
        let (history, transactions) = tokio::join!(
            self.fetch_source(&self.config.history_collection, &filter, limit, now),
            self.fetch_source(&self.config.transactions_collection, &filter, limit, now),
        );

        merge_deduplicate(history, transactions, limit)
    }

    /// Merged timeline restricted to one canonical kind.
    pub async fn transactions_by_type(
        &self,
        user_id: &str,
        kind: TransactionKind,
        limit: usize,
    ) -> Vec<Transaction> {
        self.user_transactions(user_id, Some(kind), limit).await
    }

    /// The merged timeline restricted to the recent window.
    ///
    /// Fetches with a doubled ceiling before windowing so a burst of old
    /// records doesn't crowd out recent ones.
    pub async fn recent_transactions(&self, user_id: &str, limit: usize) -> Vec<Transaction> {
        let cutoff = self.clock.now()
            - chrono::Duration::seconds(self.config.recent_window.as_secs() as i64);

        let mut recent: Vec<Transaction> = self
            .user_transactions(user_id, None, limit.saturating_mul(2))
            .await
            .into_iter()
            .filter(|tx| tx.timestamp >= cutoff)
            .collect();
        recent.truncate(limit);
        recent
    }

    /// Aggregate stats over the user's merged timeline (up to the
    /// configured stats ceiling).
    pub async fn transaction_stats(&self, user_id: &str) -> TransactionStats {
        let timeline = self
            .user_transactions(user_id, None, self.config.stats_limit)
            .await;
        aggregate(&timeline, self.clock.now(), self.config.recent_window)
    }

    /// Locate a transaction in the merged view by its external hash.
    pub async fn find_by_hash(&self, user_id: &str, tx_hash: &str) -> Option<Transaction> {
        self.user_transactions(user_id, None, self.config.stats_limit)
            .await
            .into_iter()
            .find(|tx| tx.tx_hash.as_deref() == Some(tx_hash))
    }

    async fn fetch_source(
        &self,
        collection: &str,
        filter: &RecordFilter,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<Transaction> {
        match self.store.fetch(collection, filter, limit).await {
            Ok(records) => records
                .iter()
                .map(|record| normalize::from_record(record, now))
                .collect(),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    collection,
                    "source unavailable; treating as empty"
                );
                Vec::new()
            }
        }
    }
}
