// src/pipeline/dispatch.rs

//! Delivery dispatch loop.
//!
//! Sends candidates strictly in extraction order. An entry is recorded in
//! the ledger only after the sender confirms the send, so a failed send
//! stays eligible for retry on the next run.

use std::time::Duration;

use chrono::Utc;

use crate::models::{Candidate, DeliveryConfig};
use crate::services::MessageSender;
use crate::storage::{Ledger, LedgerStore};

/// Sends candidates and records confirmed deliveries.
pub struct Dispatcher {
    message_delay: Duration,
    template: String,
}

impl Dispatcher {
    /// Create a dispatcher with the configured pacing and message template.
    pub fn new(config: &DeliveryConfig) -> Self {
        Self {
            message_delay: Duration::from_millis(config.message_delay_ms),
            template: config.template.clone(),
        }
    }

    /// Dispatch all candidates, returning the number of confirmed deliveries.
    ///
    /// The ledger is persisted after every confirmed send; a crash mid-run
    /// then never re-delivers what was already sent. A failed mid-run
    /// persist is logged and the queue continues.
    pub async fn dispatch(
        &self,
        candidates: &[Candidate],
        sender: &dyn MessageSender,
        ledger: &mut Ledger,
        store: &LedgerStore,
    ) -> usize {
        let mut delivered = 0;

        for (i, candidate) in candidates.iter().enumerate() {
            if i > 0 && !self.message_delay.is_zero() {
                tokio::time::sleep(self.message_delay).await;
            }

            let text = candidate.format(&self.template);
            match sender.send(&text).await {
                Ok(()) => {
                    ledger.record(&candidate.source, &candidate.title, &candidate.url, Utc::now());
                    delivered += 1;
                    log::info!("Delivered: {} ({})", candidate.title, candidate.url);

                    if let Err(e) = store.persist(ledger).await {
                        log::warn!(
                            "Ledger persist failed after delivering {}: {}",
                            candidate.url,
                            e
                        );
                    }
                }
                Err(e) => {
                    log::warn!(
                        "Send failed for {} ({}): {}",
                        candidate.title,
                        candidate.url,
                        e
                    );
                }
            }
        }

        delivered
    }
}
