//! ReelWatch CLI
//!
//! Local execution entry point. Telegram credentials come from the
//! `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` environment variables.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reelwatch::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::{HttpFetcher, TelegramSender},
    storage::LedgerStore,
};

/// ReelWatch - Video Listing Watcher
#[derive(Parser, Debug)]
#[command(
    name = "reelwatch",
    version,
    about = "Watches video listing pages and notifies a Telegram chat"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one scrape → dedup → deliver cycle
    Run {
        /// Override the ledger path from the config
        #[arg(long)]
        ledger: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// Show ledger summary
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Read a required credential from the environment.
fn env_credential(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("{name} is not set")))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run { ledger } => {
            if let Some(path) = ledger {
                config.ledger.path = path;
            }
            config.validate()?;

            let token = env_credential("TELEGRAM_BOT_TOKEN")?;
            let chat_id = env_credential("TELEGRAM_CHAT_ID")?;

            let fetcher = HttpFetcher::new(&config.scraper)?;
            let sender = TelegramSender::new(token, chat_id)?;

            let report = pipeline::run_pipeline(&config, &fetcher, &sender).await?;

            log::info!(
                "Summary: {} sources, {} candidates, {} delivered",
                report.sources_attempted,
                report.candidates_found,
                report.delivered
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} sites)", config.sites.len());
        }

        Command::Info => {
            let store = LedgerStore::new(&config.ledger.path);
            log::info!("Ledger: {}", store.path().display());

            let ledger = store.load().await;
            log::info!("Delivered URLs: {}", ledger.len());

            let mut recent: Vec<_> = ledger.records().collect();
            recent.sort_by(|a, b| b.delivered_at.cmp(&a.delivered_at));
            for record in recent.iter().take(5) {
                log::info!(
                    "  [{}] {} ({})",
                    record.source,
                    record.title,
                    record.url
                );
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
