//! Flamingo Finance live price feed.
//!
//! The endpoint returns a JSON array of token price records. Only the
//! `NEO` and `GAS` records are consulted; the rate is
//! `usd_price(GAS) / usd_price(NEO)`.
//!
//! Default URL: `https://flamingo-us-1.b-cdn.net/flamingo/live-data/prices/latest`
//! Auth: None required.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::PriceSource;
use crate::types::{Asset, BotError};

const SOURCE_NAME: &str = "flamingo";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// One entry of the price array. Records carry many more fields; we only
/// deserialize the two we need, and tolerate either being absent.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    usd_price: Option<f64>,
}

/// Extract the GAS/NEO rate from a raw feed body.
///
/// When a symbol appears more than once the last record wins, including
/// one without a price.
pub fn parse_rate(body: &str) -> Result<Decimal, BotError> {
    let records: Vec<PriceRecord> = serde_json::from_str(body)
        .map_err(|e| BotError::feed(format!("malformed price payload: {e}")))?;

    let mut neo: Option<Option<f64>> = None;
    let mut gas: Option<Option<f64>> = None;
    for record in records {
        match record.symbol.as_deref() {
            Some("NEO") => neo = Some(record.usd_price),
            Some("GAS") => gas = Some(record.usd_price),
            _ => {}
        }
    }

    let neo = usd_price(Asset::Neo, neo)?;
    let gas = usd_price(Asset::Gas, gas)?;
    gas.checked_div(neo)
        .ok_or_else(|| BotError::feed(format!("GAS/NEO rate overflowed: {gas} / {neo}")))
}

fn usd_price(asset: Asset, found: Option<Option<f64>>) -> Result<Decimal, BotError> {
    let raw = found
        .flatten()
        .ok_or_else(|| BotError::feed(format!("{asset} price not found in the API response")))?;
    let price = Decimal::try_from(raw)
        .map_err(|e| BotError::feed(format!("{asset} price {raw} is not representable: {e}")))?;
    if price <= Decimal::ZERO {
        return Err(BotError::feed(format!("{asset} price {price} is not positive")));
    }
    Ok(price)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Flamingo live-price endpoint.
pub struct FlamingoFeed {
    http: Client,
    url: String,
}

impl FlamingoFeed {
    pub fn new(url: impl Into<String>) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("flamingo-bot/0.1.0")
            .build()
            .map_err(|e| BotError::Config(format!("failed to build feed HTTP client: {e}")))?;
        Ok(Self { http, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PriceSource for FlamingoFeed {
    async fn fetch_rate(&self) -> Result<Decimal, BotError> {
        debug!(url = %self.url, "Fetching Flamingo prices");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| BotError::feed(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(BotError::feed(format!("API error {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| BotError::feed(format!("failed to read response body: {e}")))?;
        debug!(body = %body, "Raw API response");

        parse_rate(&body)
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
