// src/error.rs

//! Unified error handling for the watcher application.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ledger storage error
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Fetching a source listing failed
    #[error("Fetch error for {src}: {message}")]
    Fetch { src: String, message: String },

    /// Sending a notification failed
    #[error("Send error: {0}")]
    Send(String),

    /// Message sender did not answer the startup probe
    #[error("Message sender unreachable: {0}")]
    SenderUnreachable(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a ledger error.
    pub fn ledger(message: impl Into<String>) -> Self {
        Self::Ledger(message.into())
    }

    /// Create a fetch error with the source name as context.
    pub fn fetch(source: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            src: source.into(),
            message: message.to_string(),
        }
    }

    /// Create a send error.
    pub fn send(message: impl fmt::Display) -> Self {
        Self::Send(message.to_string())
    }

    /// Create a sender-unreachable error.
    pub fn sender_unreachable(message: impl fmt::Display) -> Self {
        Self::SenderUnreachable(message.to_string())
    }
}
