//! Pipeline entry points for watcher operations.
//!
//! One run walks every configured site, filters out already-delivered URLs,
//! and dispatches the survivors as notifications.

pub mod dispatch;
pub mod run;

pub use dispatch::Dispatcher;
pub use run::run_pipeline;
