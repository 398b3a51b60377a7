// src/pipeline/run.rs

//! Run orchestration.
//!
//! One run: load the ledger, probe the sender, then for each configured
//! site fetch → extract → filter, dispatch the accumulated candidates, and
//! flush the ledger. A broken source never blocks the others; only an
//! unreachable sender aborts the whole run, before any fetching.

use std::time::Duration;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Candidate, Config, RunReport, SiteDescriptor};
use crate::pipeline::Dispatcher;
use crate::services::{MessageSender, PageFetcher, extract};
use crate::storage::LedgerStore;

/// Execute one scrape → dedup → deliver run.
pub async fn run_pipeline(
    config: &Config,
    fetcher: &dyn PageFetcher,
    sender: &dyn MessageSender,
) -> Result<RunReport> {
    let started_at = Utc::now();

    let store = LedgerStore::new(&config.ledger.path);
    let _lock = store.lock()?;

    let mut ledger = store.load().await;
    log::info!("Ledger loaded: {} delivered URLs", ledger.len());

    // An unreachable sender aborts before any fetching
    sender.probe().await?;
    log::debug!("Message sender reachable");

    let source_delay = Duration::from_millis(config.scraper.source_delay_ms);
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut sources_failed = 0;

    for (i, site) in config.sites.iter().enumerate() {
        if i > 0 && !source_delay.is_zero() {
            tokio::time::sleep(source_delay).await;
        }

        log::info!("Checking {} ({})", site.name, site.url);
        let found = match check_site(fetcher, site, config.scraper.max_per_source).await {
            Ok(found) => found,
            Err(e) => {
                sources_failed += 1;
                log::warn!("Skipping {}: {}", site.name, e);
                continue;
            }
        };

        let before = candidates.len();
        for candidate in found {
            if ledger.contains(&candidate.url) {
                continue;
            }
            candidates.push(candidate);
        }
        log::info!("{}: {} new candidates", site.name, candidates.len() - before);
    }

    let dispatcher = Dispatcher::new(&config.delivery);
    let delivered = dispatcher
        .dispatch(&candidates, sender, &mut ledger, &store)
        .await;

    // Each confirmed delivery is already on disk at this point
    if let Err(e) = store.persist(&ledger).await {
        log::error!("Final ledger flush failed: {}", e);
    }

    let report = RunReport {
        started_at,
        finished_at: Utc::now(),
        sources_attempted: config.sites.len(),
        sources_failed,
        candidates_found: candidates.len(),
        delivered,
    };

    log::info!(
        "Run complete in {}s: {} sources attempted ({} failed), {} candidates, {} delivered",
        report.duration_secs(),
        report.sources_attempted,
        report.sources_failed,
        report.candidates_found,
        report.delivered
    );

    Ok(report)
}

/// Fetch and extract candidates for a single site.
async fn check_site(
    fetcher: &dyn PageFetcher,
    site: &SiteDescriptor,
    cap: usize,
) -> Result<Vec<Candidate>> {
    let page = fetcher.fetch(site).await?;
    if !page.is_success() {
        return Err(AppError::fetch(&site.name, format!("HTTP status {}", page.status)));
    }

    extract(&page.body, site, cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryConfig, LedgerConfig, ScraperConfig};
    use crate::services::{FetchedPage, MessageSender, PageFetcher};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Fetcher serving canned pages keyed by site name.
    struct StaticFetcher {
        pages: HashMap<String, String>,
        broken: Vec<String>,
    }

    impl StaticFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                broken: Vec::new(),
            }
        }

        fn with_page(mut self, site: &str, html: &str) -> Self {
            self.pages.insert(site.to_string(), html.to_string());
            self
        }

        fn with_broken(mut self, site: &str) -> Self {
            self.broken.push(site.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, site: &SiteDescriptor) -> Result<FetchedPage> {
            if self.broken.contains(&site.name) {
                return Err(AppError::fetch(&site.name, "connection refused"));
            }
            let body = self
                .pages
                .get(&site.name)
                .cloned()
                .unwrap_or_else(|| "<html></html>".to_string());
            Ok(FetchedPage { status: 200, body })
        }
    }

    struct RecordingSender {
        sent: Mutex<Vec<String>>,
        probe_ok: bool,
        fail_when_contains: Option<String>,
    }

    impl RecordingSender {
        fn ok() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                probe_ok: true,
                fail_when_contains: None,
            }
        }

        fn unreachable() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                probe_ok: false,
                fail_when_contains: None,
            }
        }

        fn failing_on(marker: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                probe_ok: true,
                fail_when_contains: Some(marker.to_string()),
            }
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn probe(&self) -> Result<()> {
            if self.probe_ok {
                Ok(())
            } else {
                Err(AppError::sender_unreachable("probe refused"))
            }
        }

        async fn send(&self, text: &str) -> Result<()> {
            if let Some(marker) = &self.fail_when_contains {
                if text.contains(marker) {
                    return Err(AppError::send("synthetic failure"));
                }
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn site(name: &str, base: &str) -> SiteDescriptor {
        SiteDescriptor {
            name: name.to_string(),
            url: format!("{base}/"),
            video_selector: ".video-item".to_string(),
            title_selector: ".video-title".to_string(),
            link_selector: "a".to_string(),
            base_url: base.to_string(),
            headers: Default::default(),
        }
    }

    fn config(tmp: &TempDir, sites: Vec<SiteDescriptor>) -> Config {
        Config {
            scraper: ScraperConfig {
                source_delay_ms: 0,
                ..ScraperConfig::default()
            },
            delivery: DeliveryConfig {
                message_delay_ms: 0,
                template: "{source}: {title} {url}".to_string(),
            },
            ledger: LedgerConfig {
                path: tmp.path().join("videos.json"),
            },
            sites,
        }
    }

    const ALPHA_HTML: &str = r#"
        <div class="video-item"><a class="video-title" href="/a">A</a></div>
        <div class="video-item"><a class="video-title" href="https://other.test/b">B</a></div>
    "#;

    #[tokio::test]
    async fn test_two_entries_both_delivered() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, vec![site("Alpha", "https://alpha.test")]);
        let fetcher = StaticFetcher::new().with_page("Alpha", ALPHA_HTML);
        let sender = RecordingSender::ok();

        let report = run_pipeline(&config, &fetcher, &sender).await.unwrap();

        assert_eq!(report.sources_attempted, 1);
        assert_eq!(report.sources_failed, 0);
        assert_eq!(report.candidates_found, 2);
        assert_eq!(report.delivered, 2);

        let ledger = LedgerStore::new(&config.ledger.path).load().await;
        assert!(ledger.contains("https://alpha.test/a"));
        assert!(ledger.contains("https://other.test/b"));
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, vec![site("Alpha", "https://alpha.test")]);
        let fetcher = StaticFetcher::new().with_page("Alpha", ALPHA_HTML);

        let sender = RecordingSender::ok();
        run_pipeline(&config, &fetcher, &sender).await.unwrap();

        // Same listing, populated ledger: nothing new
        let sender = RecordingSender::ok();
        let report = run_pipeline(&config, &fetcher, &sender).await.unwrap();

        assert_eq!(report.candidates_found, 0);
        assert_eq!(report.delivered, 0);
        assert_eq!(sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_send_is_retried_next_run() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, vec![site("Alpha", "https://alpha.test")]);
        let fetcher = StaticFetcher::new().with_page("Alpha", ALPHA_HTML);

        let sender = RecordingSender::failing_on("https://alpha.test/a");
        let report = run_pipeline(&config, &fetcher, &sender).await.unwrap();
        assert_eq!(report.candidates_found, 2);
        assert_eq!(report.delivered, 1);

        let ledger = LedgerStore::new(&config.ledger.path).load().await;
        assert!(!ledger.contains("https://alpha.test/a"));
        assert!(ledger.contains("https://other.test/b"));

        // Unchanged listing: only the failed entry comes back
        let sender = RecordingSender::ok();
        let report = run_pipeline(&config, &fetcher, &sender).await.unwrap();
        assert_eq!(report.candidates_found, 1);
        assert_eq!(report.delivered, 1);

        let ledger = LedgerStore::new(&config.ledger.path).load().await;
        assert!(ledger.contains("https://alpha.test/a"));
    }

    #[tokio::test]
    async fn test_broken_source_does_not_block_others() {
        let tmp = TempDir::new().unwrap();
        let config = config(
            &tmp,
            vec![
                site("Broken", "https://broken.test"),
                site("Alpha", "https://alpha.test"),
            ],
        );
        let fetcher = StaticFetcher::new()
            .with_broken("Broken")
            .with_page("Alpha", ALPHA_HTML);
        let sender = RecordingSender::ok();

        let report = run_pipeline(&config, &fetcher, &sender).await.unwrap();

        assert_eq!(report.sources_attempted, 2);
        assert_eq!(report.sources_failed, 1);
        assert_eq!(report.candidates_found, 2);
        assert_eq!(report.delivered, 2);
    }

    #[tokio::test]
    async fn test_unreachable_sender_aborts_before_fetching() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, vec![site("Alpha", "https://alpha.test")]);
        let fetcher = StaticFetcher::new().with_page("Alpha", ALPHA_HTML);
        let sender = RecordingSender::unreachable();

        let result = run_pipeline(&config, &fetcher, &sender).await;
        assert!(matches!(result, Err(AppError::SenderUnreachable(_))));

        // No partial ledger mutation
        assert!(!config.ledger.path.exists());
    }

    #[tokio::test]
    async fn test_non_success_status_counts_as_source_failure() {
        struct ErrorPageFetcher;

        #[async_trait]
        impl PageFetcher for ErrorPageFetcher {
            async fn fetch(&self, _site: &SiteDescriptor) -> Result<FetchedPage> {
                Ok(FetchedPage {
                    status: 503,
                    body: "service unavailable".to_string(),
                })
            }
        }

        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, vec![site("Alpha", "https://alpha.test")]);
        let sender = RecordingSender::ok();

        let report = run_pipeline(&config, &ErrorPageFetcher, &sender).await.unwrap();
        assert_eq!(report.sources_failed, 1);
        assert_eq!(report.candidates_found, 0);
    }

    #[tokio::test]
    async fn test_lock_released_after_run() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, vec![site("Alpha", "https://alpha.test")]);
        let fetcher = StaticFetcher::new().with_page("Alpha", ALPHA_HTML);

        run_pipeline(&config, &fetcher, &RecordingSender::ok())
            .await
            .unwrap();

        // A second run can take the lock again
        let store = LedgerStore::new(&config.ledger.path);
        assert!(store.lock().is_ok());
    }
}
