//! Run report data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Number of configured sources the run attempted
    pub sources_attempted: usize,

    /// Number of sources that contributed zero candidates due to a fetch
    /// or extraction failure
    pub sources_failed: usize,

    /// Total new candidates after ledger filtering
    pub candidates_found: usize,

    /// Deliveries confirmed by the message sender
    pub delivered: usize,
}

impl RunReport {
    /// Wall-clock duration of the run in seconds.
    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
