use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::deserialize_duration;

/// Primary collection name fixed by convention.
fn default_transactions_collection() -> String {
    "transactions".to_string()
}

/// Secondary collection name fixed by convention.
fn default_history_collection() -> String {
    "history".to_string()
}

fn default_limit() -> usize {
    100
}

/// Ceiling for the stats/lookup reads, which scan the whole merged view.
fn default_stats_limit() -> usize {
    1000
}

/// Default recent-transaction window (24 hours).
fn default_recent_window() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

/// Unified-history configuration.
///
/// Every field has a default, so an empty TOML file (or no file at all)
/// yields the conventional setup: a primary "transactions" collection and
/// a secondary "history" collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Primary collection. Authoritative for the dual-write path.
    pub transactions_collection: String,

    /// Secondary collection. Best-effort on the dual-write path.
    pub history_collection: String,

    /// Result ceiling applied when the caller does not pass one.
    pub default_limit: usize,

    /// Result ceiling for stats aggregation and hash lookup.
    pub stats_limit: usize,

    /// How far back a transaction counts as "recent".
    #[serde(
        default = "default_recent_window",
        deserialize_with = "deserialize_duration"
    )]
    pub recent_window: Duration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            transactions_collection: default_transactions_collection(),
            history_collection: default_history_collection(),
            default_limit: default_limit(),
            stats_limit: default_stats_limit(),
            recent_window: default_recent_window(),
        }
    }
}

impl HistoryConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: HistoryConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
