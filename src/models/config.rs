//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SiteDescriptor;

/// Root application configuration.
///
/// Constructed once at startup and passed into the pipeline; never read from
/// ambient state afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and scraping behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Notification delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Ledger persistence settings
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Monitored site definitions
    #[serde(default)]
    pub sites: Vec<SiteDescriptor>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::config("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::config("scraper.timeout_secs must be > 0"));
        }
        if self.scraper.max_per_source == 0 {
            return Err(AppError::config("scraper.max_per_source must be > 0"));
        }
        if self.delivery.template.trim().is_empty() {
            return Err(AppError::config("delivery.template is empty"));
        }
        if self.ledger.path.as_os_str().is_empty() {
            return Err(AppError::config("ledger.path is empty"));
        }
        if self.sites.is_empty() {
            return Err(AppError::config("No sites defined"));
        }

        let mut names = std::collections::HashSet::new();
        for site in &self.sites {
            if site.name.trim().is_empty() {
                return Err(AppError::config("Site with empty name"));
            }
            if !names.insert(site.name.as_str()) {
                return Err(AppError::config(format!(
                    "Duplicate site name: {}",
                    site.name
                )));
            }

            url::Url::parse(&site.url)
                .map_err(|e| AppError::config(format!("{}: invalid url: {}", site.name, e)))?;
            url::Url::parse(&site.base_url)
                .map_err(|e| AppError::config(format!("{}: invalid base_url: {}", site.name, e)))?;

            for (field, selector) in [
                ("video_selector", &site.video_selector),
                ("title_selector", &site.title_selector),
                ("link_selector", &site.link_selector),
            ] {
                check_selector(&site.name, field, selector)?;
            }
        }

        Ok(())
    }
}

fn check_selector(site: &str, field: &str, selector: &str) -> Result<()> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| AppError::selector(format!("{site}.{field} = {selector}"), format!("{e:?}")))
}

/// HTTP client and scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum entries processed per source per run
    #[serde(default = "defaults::max_per_source")]
    pub max_per_source: usize,

    /// Pause between consecutive sources in milliseconds
    #[serde(default = "defaults::source_delay")]
    pub source_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_per_source: defaults::max_per_source(),
            source_delay_ms: defaults::source_delay(),
        }
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Minimum delay between consecutive send attempts in milliseconds
    #[serde(default = "defaults::message_delay")]
    pub message_delay_ms: u64,

    /// Message template with `{source}`, `{title}`, `{url}` placeholders
    #[serde(default = "defaults::template")]
    pub template: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            message_delay_ms: defaults::message_delay(),
            template: defaults::template(),
        }
    }
}

/// Ledger persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Path of the JSON ledger file
    #[serde(default = "defaults::ledger_path")]
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: defaults::ledger_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; reelwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_per_source() -> usize {
        10
    }
    pub fn source_delay() -> u64 {
        2000
    }
    pub fn message_delay() -> u64 {
        1000
    }
    pub fn template() -> String {
        "🎬 New video!\n🌐 Source: {source}\n📌 Title: {title}\n🔗 Watch: {url}".into()
    }
    pub fn ledger_path() -> PathBuf {
        "videos.json".into()
    }
}
