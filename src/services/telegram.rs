// src/services/telegram.rs

//! Telegram message sending service.
//!
//! Delivers notifications to a single chat through the Bot API. The chat id
//! is owned by the sender; callers only supply the composed message text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};

/// Default Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Capability of delivering one notification to the configured destination.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Lightweight reachability check, invoked once before a run.
    async fn probe(&self) -> Result<()>;

    /// Attempt one notification send.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Production sender backed by the Telegram Bot API.
pub struct TelegramSender {
    client: Client,
    token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramSender {
    /// Create a sender for the given bot token and chat id.
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
        })
    }

    /// Override the API base URL (self-hosted Bot API server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn probe(&self) -> Result<()> {
        let response = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(AppError::sender_unreachable)?;

        response
            .error_for_status()
            .map_err(AppError::sender_unreachable)?;

        Ok(())
    }

    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(AppError::send)?;

        response.error_for_status().map_err(AppError::send)?;

        Ok(())
    }
}
