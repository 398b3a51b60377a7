//! Delivery record data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted fact that a video URL was delivered.
///
/// Created only after a confirmed send; once `delivered` is true the record
/// is never mutated or deleted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryRecord {
    /// Source site the entry was discovered on
    pub source: String,

    /// Entry title at delivery time
    pub title: String,

    /// Absolute entry URL, also the ledger key
    pub url: String,

    /// When the entry was first recorded
    pub added_at: DateTime<Utc>,

    /// When the notification send was confirmed
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,

    /// Whether the notification send was confirmed
    #[serde(default)]
    pub delivered: bool,
}

impl DeliveryRecord {
    /// Build a record for an entry whose send was just confirmed.
    pub fn delivered(source: &str, title: &str, url: &str, at: DateTime<Utc>) -> Self {
        Self {
            source: source.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            added_at: at,
            delivered_at: Some(at),
            delivered: true,
        }
    }
}
