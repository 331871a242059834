//! Flamingo swap bot entry point.
//!
//! Loads configuration from the environment, initialises structured
//! logging, and runs the two-channel paper-trading loop until Ctrl+C.
//! Nothing is persisted: every start begins from the initial balances.

use anyhow::{Context, Result};
use tracing::info;

use flamingo_bot::config::AppConfig;
use flamingo_bot::engine::poller::Poller;
use flamingo_bot::feed::flamingo::FlamingoFeed;
use flamingo_bot::feed::PriceSource;
use flamingo_bot::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    logging::init("flamingo_bot=info");

    let cfg = AppConfig::from_env().context("Invalid configuration")?;
    info!(
        api_url = %cfg.feed.api_url,
        rpc_urls = ?cfg.feed.rpc_urls,
        entry_lower = %cfg.strategy.entry_lower,
        entry_upper = %cfg.strategy.entry_upper,
        neo_entry_size = %cfg.strategy.neo_entry_size,
        gas_entry_size = %cfg.strategy.gas_entry_size,
        exit_threshold = %cfg.strategy.exit_threshold,
        "Configuration loaded"
    );

    let feed = FlamingoFeed::new(cfg.feed.api_url.clone()).context("Failed to create price feed")?;
    info!(source = feed.name(), url = feed.url(), "Price feed ready");

    let mut poller = Poller::new(feed, &cfg);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received.");
    };

    info!("Entering main loop. Press Ctrl+C to stop.");
    let summary = poller.run(shutdown).await;

    info!(
        neo = %format!("{:.2}", summary.neo),
        gas = %format!("{:.2}", summary.gas),
        ticks = summary.ticks,
        "Flamingo swap bot shut down cleanly."
    );
    Ok(())
}
