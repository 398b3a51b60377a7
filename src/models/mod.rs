// src/models/mod.rs

//! Domain models for the watcher application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod candidate;
mod config;
mod record;
mod report;
mod site;

// Re-export all public types
pub use candidate::Candidate;
pub use config::{Config, DeliveryConfig, LedgerConfig, ScraperConfig};
pub use record::DeliveryRecord;
pub use report::RunReport;
pub use site::SiteDescriptor;
