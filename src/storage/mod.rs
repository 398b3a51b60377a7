//! Durable delivery ledger.
//!
//! The ledger is the single source of truth for "already delivered" across
//! runs. It is loaded fully at run start and flushed after each confirmed
//! delivery and once at run end.

pub mod ledger;

pub use ledger::{Ledger, LedgerLock, LedgerStore};
