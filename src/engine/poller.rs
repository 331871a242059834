//! Polling loop: fetch a rate, run both channels, report, wait.
//!
//! `tick` is a single step and is what tests drive. `run` schedules ticks
//! from a timer until the shutdown future resolves. All ledger and
//! position mutation happens synchronously after the fetch resolves, so a
//! shutdown can never interrupt a trade mid-way.

use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;
use tracing::info;

use super::channel::TradeChannel;
use super::ledger::PortfolioLedger;
use super::reporter::{Reporter, RunSummary, TickReport};
use crate::config::AppConfig;
use crate::feed::PriceSource;
use crate::types::{BotError, Direction};

pub struct Poller<S: PriceSource> {
    source: S,
    ledger: PortfolioLedger,
    /// Evaluated in order: NEO→GAS, then GAS→NEO.
    channels: [TradeChannel; 2],
    reporter: Reporter,
    tick_interval: Duration,
    retry_delay: Duration,
    summary: RunSummary,
}

impl<S: PriceSource> Poller<S> {
    pub fn new(source: S, cfg: &AppConfig) -> Self {
        let ledger = PortfolioLedger::new(cfg.portfolio.initial_neo, cfg.portfolio.initial_gas);
        let channels = std::array::from_fn(|i| {
            TradeChannel::from_config(Direction::ALL[i], &cfg.strategy)
        });
        Self::with_parts(source, ledger, channels)
            .with_schedule(cfg.schedule.tick_interval(), cfg.schedule.retry_delay())
    }

    /// Assemble a poller from prebuilt parts, with the default 10s delays.
    pub fn with_parts(source: S, ledger: PortfolioLedger, channels: [TradeChannel; 2]) -> Self {
        let summary = RunSummary {
            neo: ledger.neo(),
            gas: ledger.gas(),
            ..RunSummary::default()
        };
        Self {
            source,
            ledger,
            channels,
            reporter: Reporter,
            tick_interval: Duration::from_secs(10),
            retry_delay: Duration::from_secs(10),
            summary,
        }
    }

    pub fn with_schedule(mut self, tick_interval: Duration, retry_delay: Duration) -> Self {
        self.tick_interval = tick_interval;
        self.retry_delay = retry_delay;
        self
    }

    pub fn ledger(&self) -> &PortfolioLedger {
        &self.ledger
    }

    pub fn channel(&self, direction: Direction) -> &TradeChannel {
        match direction {
            Direction::NeoToGas => &self.channels[0],
            Direction::GasToNeo => &self.channels[1],
        }
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Run one tick. A feed failure returns before anything is mutated and
    /// does not advance the tick counter.
    pub async fn tick(&mut self) -> Result<TickReport, BotError> {
        let rate = match self.source.fetch_rate().await {
            Ok(rate) if rate > Decimal::ZERO => rate,
            Ok(rate) => {
                self.summary.feed_failures += 1;
                return Err(BotError::feed(format!("non-positive rate {rate}")));
            }
            Err(err) => {
                self.summary.feed_failures += 1;
                return Err(err);
            }
        };

        self.summary.ticks += 1;
        let tick = self.summary.ticks;
        self.reporter.rate(tick, rate);
        let mut report = TickReport::new(tick, rate, &self.ledger);

        for channel in self.channels.iter_mut() {
            match channel.evaluate_entry(rate, &mut self.ledger) {
                Ok(Some(event)) => {
                    self.reporter.trade(&event);
                    report.events.push(event);
                }
                Ok(None) => {}
                Err(err @ BotError::InsufficientFunds { .. }) => {
                    self.reporter.insufficient_funds(channel.direction(), &err);
                    report.unfunded.push(channel.direction());
                }
                Err(err) => {
                    self.reporter.overflow(channel.direction(), &err);
                    report.overflowed.push(channel.direction());
                }
            }
            match channel.evaluate_exit(rate, &mut self.ledger) {
                Ok(Some(event)) => {
                    self.reporter.trade(&event);
                    report.events.push(event);
                }
                Ok(None) => {}
                Err(err) => {
                    self.reporter.overflow(channel.direction(), &err);
                    report.overflowed.push(channel.direction());
                }
            }
        }

        report.settle(&self.ledger);
        self.summary.entries += report.entries() as u64;
        self.summary.exits += report.exits() as u64;
        self.summary.neo = report.neo;
        self.summary.gas = report.gas;
        Ok(report)
    }

    /// Poll until `shutdown` resolves, then return the run totals.
    ///
    /// After a successful tick the loop waits the tick interval; after a
    /// feed failure it waits the retry delay and repeats the same tick.
    pub async fn run<F>(&mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            tick_secs = self.tick_interval.as_secs(),
            neo = %self.ledger.neo(),
            gas = %self.ledger.gas(),
            "Starting Flamingo Swap Bot (independent channels)..."
        );

        loop {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                outcome = self.tick() => outcome,
            };

            let delay = match outcome {
                Ok(report) => {
                    self.reporter.tick(&report);
                    self.tick_interval
                }
                Err(err) => {
                    self.reporter.feed_unavailable(&err, self.retry_delay);
                    self.retry_delay
                }
            };

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.reporter.summary(&self.summary);
        self.summary.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
