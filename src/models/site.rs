// src/models/site.rs

//! Site descriptor data structure.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static description of how to locate video entries on one monitored site.
///
/// Loaded once at startup as part of [`Config`](crate::models::Config); the
/// set of sites is fixed for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDescriptor {
    /// Unique source name (e.g. "DailyClips")
    pub name: String,

    /// URL of the listing page to fetch
    pub url: String,

    /// CSS selector matching one video entry node
    pub video_selector: String,

    /// CSS selector for the title element within an entry
    pub title_selector: String,

    /// CSS selector for the link element within an entry
    pub link_selector: String,

    /// Base URL prepended to root-relative links
    pub base_url: String,

    /// Extra request headers for this site
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}
