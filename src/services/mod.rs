//! Collaborator services: page fetching, entry extraction, message sending.

pub mod extract;
pub mod fetch;
pub mod telegram;

pub use extract::{EntrySkip, extract};
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use telegram::{MessageSender, TelegramSender};
