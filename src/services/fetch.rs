// src/services/fetch.rs

//! Page fetching service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{ScraperConfig, SiteDescriptor};

/// Raw outcome of fetching one listing page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Response body as text
    pub body: String,
}

impl FetchedPage {
    /// Whether the status code indicates success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability of turning a site descriptor into page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the listing page for one site.
    async fn fetch(&self, site: &SiteDescriptor) -> Result<FetchedPage>;
}

/// Production fetcher backed by a plain HTTP client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured user agent and timeout.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, site: &SiteDescriptor) -> Result<FetchedPage> {
        let mut request = self.client.get(&site.url);
        for (name, value) in &site.headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchedPage { status, body })
    }
}
