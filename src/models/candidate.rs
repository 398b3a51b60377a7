//! Candidate entry data structure.

use serde::{Deserialize, Serialize};

/// A prospective new video entry discovered during one run.
///
/// Not persisted; lives only until the run's dispatch phase. The `url` is
/// always fully qualified before a candidate is compared against the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    /// Name of the source site that listed this entry
    pub source: String,

    /// Entry title, trimmed and whitespace-normalized
    pub title: String,

    /// Absolute URL of the entry
    pub url: String,
}

impl Candidate {
    /// Format the candidate for delivery using a template.
    ///
    /// Supported placeholders: `{source}`, `{title}`, `{url}`.
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{source}", &self.source)
            .replace("{title}", &self.title)
            .replace("{url}", &self.url)
    }
}
