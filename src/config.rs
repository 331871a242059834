//! Configuration loading from environment variables.
//!
//! Every setting has a default matching the live bot. Values are read
//! through a key→value lookup so the process environment (populated from
//! `.env` by `dotenv` in `main`) and test fixtures share one code path.
//! Decimal settings are parsed from their string form, never via `f64`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::time::Duration;

use crate::types::BotError;

pub const DEFAULT_API_URL: &str =
    "https://flamingo-us-1.b-cdn.net/flamingo/live-data/prices/latest";

pub const DEFAULT_RPC_URLS: &[&str] = &[
    "https://mainnet1.neo.coz.io:443",
    "https://mainnet2.neo.coz.io:443",
    "https://mainnet3.neo.coz.io:443",
    "https://mainnet4.neo.coz.io:443",
];

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub strategy: StrategyConfig,
    pub portfolio: PortfolioConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub api_url: String,
    /// NEO RPC endpoints, reserved for on-chain execution. Not used by the
    /// paper-trading engine.
    pub rpc_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub entry_lower: Decimal,
    pub entry_upper: Decimal,
    /// NEO spent by the NEO→GAS channel on entry.
    pub neo_entry_size: Decimal,
    /// GAS spent by the GAS→NEO channel on entry.
    pub gas_entry_size: Decimal,
    pub exit_threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    pub initial_neo: Decimal,
    pub initial_gas: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    pub tick_interval_secs: u64,
    pub retry_delay_secs: u64,
}

impl ScheduleConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig {
                api_url: DEFAULT_API_URL.to_string(),
                rpc_urls: DEFAULT_RPC_URLS.iter().map(|s| s.to_string()).collect(),
            },
            strategy: StrategyConfig {
                entry_lower: dec!(0.2995),
                entry_upper: dec!(0.3005),
                neo_entry_size: dec!(3000),
                gas_entry_size: dec!(10000),
                exit_threshold: dec!(0.001),
            },
            portfolio: PortfolioConfig {
                initial_neo: dec!(10000),
                initial_gas: dec!(100000),
            },
            schedule: ScheduleConfig {
                tick_interval_secs: 10,
                retry_delay_secs: 10,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to
    /// defaults for absent keys. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(url) = get("FLAMINGO_API_URL") {
            cfg.feed.api_url = url;
        }
        if let Some(rpc) = get("NEO_RPC_URL") {
            cfg.feed.rpc_urls = vec![rpc];
        }

        let s = &mut cfg.strategy;
        override_decimal(&get, "FLAMINGO_ENTRY_LOWER", &mut s.entry_lower)?;
        override_decimal(&get, "FLAMINGO_ENTRY_UPPER", &mut s.entry_upper)?;
        override_decimal(&get, "FLAMINGO_NEO_ENTRY_SIZE", &mut s.neo_entry_size)?;
        override_decimal(&get, "FLAMINGO_GAS_ENTRY_SIZE", &mut s.gas_entry_size)?;
        override_decimal(&get, "FLAMINGO_EXIT_THRESHOLD", &mut s.exit_threshold)?;

        let p = &mut cfg.portfolio;
        override_decimal(&get, "FLAMINGO_INITIAL_NEO", &mut p.initial_neo)?;
        override_decimal(&get, "FLAMINGO_INITIAL_GAS", &mut p.initial_gas)?;

        let sch = &mut cfg.schedule;
        override_secs(&get, "FLAMINGO_TICK_SECS", &mut sch.tick_interval_secs)?;
        override_secs(&get, "FLAMINGO_RETRY_SECS", &mut sch.retry_delay_secs)?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), BotError> {
        let s = &self.strategy;
        if self.feed.api_url.is_empty() {
            return Err(BotError::Config("feed URL is empty".into()));
        }
        if s.entry_lower > s.entry_upper {
            return Err(BotError::Config(format!(
                "entry band is inverted: lower {} > upper {}",
                s.entry_lower, s.entry_upper
            )));
        }
        if s.entry_lower <= Decimal::ZERO {
            return Err(BotError::Config(format!(
                "entry band lower bound must be positive, got {}",
                s.entry_lower
            )));
        }
        if s.neo_entry_size <= Decimal::ZERO || s.gas_entry_size <= Decimal::ZERO {
            return Err(BotError::Config("entry sizes must be positive".into()));
        }
        if s.exit_threshold < Decimal::ZERO {
            return Err(BotError::Config(format!(
                "exit threshold must not be negative, got {}",
                s.exit_threshold
            )));
        }
        let p = &self.portfolio;
        if p.initial_neo < Decimal::ZERO || p.initial_gas < Decimal::ZERO {
            return Err(BotError::Config("initial balances must not be negative".into()));
        }
        if self.schedule.tick_interval_secs == 0 || self.schedule.retry_delay_secs == 0 {
            return Err(BotError::Config("tick and retry intervals must be at least 1s".into()));
        }
        Ok(())
    }
}

fn override_decimal<G>(get: &G, key: &str, slot: &mut Decimal) -> Result<(), BotError>
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        *slot = Decimal::from_str(&raw)
            .map_err(|e| BotError::Config(format!("{key}={raw:?} is not a decimal: {e}")))?;
    }
    Ok(())
}

fn override_secs<G>(get: &G, key: &str, slot: &mut u64) -> Result<(), BotError>
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        *slot = raw
            .parse()
            .map_err(|e| BotError::Config(format!("{key}={raw:?} is not a whole number of seconds: {e}")))?;
    }
    Ok(())
}
