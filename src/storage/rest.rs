//! REST-backed document store.
//!
//! The backing collections are reached through an HTTP JSON API that exposes
//! one route per collection: `GET /{collection}?userId=&type=&limit=` for
//! reads (already filtered, newest-first, truncated server-side) and
//! `POST /{collection}` for writes.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::models::Id;

use super::{DocumentStore, RawRecord, RecordFilter};

/// Document store client for the collections API.
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    client: Client,
}

/// Insert acknowledgement. The collections name their id field
/// inconsistently ("transactionId" from one route, "historyId" from the
/// other, bare "_id" from older deployments); accept any of them.
#[derive(Debug, Deserialize)]
struct InsertResponse {
    #[serde(default, rename = "transactionId")]
    transaction_id: Option<String>,
    #[serde(default, rename = "historyId")]
    history_id: Option<String>,
    #[serde(default, rename = "_id")]
    id: Option<String>,
}

impl InsertResponse {
    fn assigned_id(self) -> Option<Id> {
        [self.transaction_id, self.history_id, self.id]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
            .map(Id::from_string)
    }
}

impl RestStore {
    /// Creates a client for the API rooted at `base_url` (e.g.
    /// `https://example.app/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }
}

#[async_trait::async_trait]
impl DocumentStore for RestStore {
    async fn fetch(
        &self,
        collection: &str,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<RawRecord>> {
        let url = self.collection_url(collection);

        let mut query: Vec<(&str, String)> = vec![
            ("userId", filter.user_id.clone()),
            ("limit", limit.to_string()),
        ];
        if let Some(kind) = &filter.kind {
            query.push(("type", kind.clone()));
        }

        let records = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()?
            .json::<Vec<RawRecord>>()
            .await
            .with_context(|| format!("Failed to parse records from {url}"))?;

        Ok(records)
    }

    async fn insert(&self, collection: &str, record: &RawRecord) -> Result<Id> {
        let url = self.collection_url(collection);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?
            .error_for_status()?
            .json::<InsertResponse>()
            .await
            .with_context(|| format!("Failed to parse insert response from {url}"))?;

        response
            .assigned_id()
            .ok_or_else(|| anyhow!("insert into '{collection}' returned no identifier"))
    }
}
