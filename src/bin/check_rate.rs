//! One-shot feed check: fetch the Flamingo prices once and log the rate.
//!
//! Uses the same environment configuration as the bot. Raw responses are
//! logged at debug level, which is this binary's default.

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};

use flamingo_bot::config::AppConfig;
use flamingo_bot::feed::flamingo::FlamingoFeed;
use flamingo_bot::feed::PriceSource;
use flamingo_bot::logging;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenv::dotenv();
    logging::init("flamingo_bot=debug,check_rate=debug");

    let cfg = AppConfig::from_env().context("Invalid configuration")?;
    let feed = FlamingoFeed::new(cfg.feed.api_url.clone()).context("Failed to create price feed")?;
    info!(url = feed.url(), "Using API URL: {}", feed.url());

    match feed.fetch_rate().await {
        Ok(rate) => {
            info!(rate = %rate, "Extracted rate (GAS/NEO): {rate}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Failed to extract rate.");
            Ok(ExitCode::FAILURE)
        }
    }
}
