//! Scripted price source for integration testing.
//!
//! Replays a fixed sequence of fetch results, then signals `exhausted`
//! so the test can shut the loop down. All state is in-memory.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use flamingo_bot::feed::flamingo::parse_rate;
use flamingo_bot::feed::PriceSource;
use flamingo_bot::types::BotError;

pub struct ScriptedFeed {
    script: Mutex<VecDeque<Result<Decimal, BotError>>>,
    calls: Arc<AtomicUsize>,
    exhausted: Arc<Notify>,
}

impl ScriptedFeed {
    pub fn new(script: Vec<Result<Decimal, BotError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            exhausted: Arc::new(Notify::new()),
        }
    }

    /// Script built from raw feed bodies, parsed the way the live feed does.
    pub fn from_bodies(bodies: &[&str]) -> Self {
        Self::new(bodies.iter().map(|b| parse_rate(b)).collect())
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn exhausted(&self) -> Arc<Notify> {
        Arc::clone(&self.exhausted)
    }
}

#[async_trait]
impl PriceSource for ScriptedFeed {
    async fn fetch_rate(&self) -> Result<Decimal, BotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => {
                self.exhausted.notify_one();
                Err(BotError::feed("script exhausted"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Build a Flamingo-shaped price body with the given USD prices.
pub fn body(neo_usd: &str, gas_usd: &str) -> String {
    format!(
        r#"[{{"symbol":"FLM","usd_price":0.05}},{{"symbol":"NEO","usd_price":{neo_usd}}},{{"symbol":"GAS","usd_price":{gas_usd}}}]"#
    )
}
