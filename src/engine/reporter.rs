//! Human-readable status lines for every tick.
//!
//! Has no effect on trading; everything here goes to `tracing`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{info, warn};

use super::ledger::PortfolioLedger;
use crate::types::{Asset, BotError, Direction, TradeEvent};

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Outcome of one successful poll tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub rate: Decimal,
    /// Trade transitions in evaluation order (NEO→GAS before GAS→NEO).
    pub events: Vec<TradeEvent>,
    /// Channels whose entry condition held but could not be funded.
    pub unfunded: Vec<Direction>,
    /// Channels whose entry or exit was skipped because an amount overflowed.
    pub overflowed: Vec<Direction>,
    pub neo: Decimal,
    pub gas: Decimal,
    pub neo_drift: Decimal,
    pub gas_drift: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl TickReport {
    pub fn new(tick: u64, rate: Decimal, ledger: &PortfolioLedger) -> Self {
        Self {
            tick,
            rate,
            events: Vec::new(),
            unfunded: Vec::new(),
            overflowed: Vec::new(),
            neo: ledger.neo(),
            gas: ledger.gas(),
            neo_drift: ledger.drift(Asset::Neo),
            gas_drift: ledger.drift(Asset::Gas),
            timestamp: Utc::now(),
        }
    }

    /// Refresh the balance fields after the channels have run.
    pub fn settle(&mut self, ledger: &PortfolioLedger) {
        self.neo = ledger.neo();
        self.gas = ledger.gas();
        self.neo_drift = ledger.drift(Asset::Neo);
        self.gas_drift = ledger.drift(Asset::Gas);
    }

    pub fn entries(&self) -> usize {
        self.events.iter().filter(|e| e.is_entry()).count()
    }

    pub fn exits(&self) -> usize {
        self.events.len() - self.entries()
    }
}

/// Totals over a whole run, logged at shutdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub feed_failures: u64,
    pub entries: u64,
    pub exits: u64,
    pub neo: Decimal,
    pub gas: Decimal,
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter;

impl Reporter {
    pub fn rate(&self, tick: u64, rate: Decimal) {
        info!(tick, rate = %format!("{rate:.4}"), "Current market rate (GAS/NEO)");
    }

    pub fn trade(&self, event: &TradeEvent) {
        info!(
            trade_id = %event.trade_id(),
            channel = %event.direction(),
            "{event}"
        );
    }

    pub fn insufficient_funds(&self, direction: Direction, err: &BotError) {
        info!(channel = %direction, reason = %err, "Insufficient funds to enter {direction} trade");
    }

    pub fn overflow(&self, direction: Direction, err: &BotError) {
        warn!(channel = %direction, error = %err, "Skipping {direction} trade: amount out of range");
    }

    pub fn feed_unavailable(&self, err: &BotError, retry_in: Duration) {
        warn!(
            error = %err,
            retry_secs = retry_in.as_secs(),
            "Rate unavailable. Retrying in {} seconds...",
            retry_in.as_secs()
        );
    }

    pub fn tick(&self, report: &TickReport) {
        info!(
            tick = report.tick,
            entries = report.entries(),
            exits = report.exits(),
            neo_drift = %format!("{:.2}", report.neo_drift),
            gas_drift = %format!("{:.2}", report.gas_drift),
            timestamp = %report.timestamp.to_rfc3339(),
            "Balances: {:.2} NEO, {:.2} GAS",
            report.neo,
            report.gas,
        );
    }

    pub fn summary(&self, summary: &RunSummary) {
        info!(
            ticks = summary.ticks,
            feed_failures = summary.feed_failures,
            entries = summary.entries,
            exits = summary.exits,
            neo = %format!("{:.2}", summary.neo),
            gas = %format!("{:.2}", summary.gas),
            "Flamingo swap bot stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_tick_report_counts() {
        let ledger = PortfolioLedger::new(dec!(10000), dec!(100000));
        let mut report = TickReport::new(1, dec!(0.3), &ledger);
        report.events.push(TradeEvent::Entered {
            trade_id: Uuid::new_v4(),
            direction: Direction::NeoToGas,
            rate: dec!(0.3),
            spent: dec!(3000),
            received: dec!(10000),
            neo_after: dec!(7000),
            gas_after: dec!(110000),
        });
        assert_eq!(report.entries(), 1);
        assert_eq!(report.exits(), 0);
    }

    #[test]
    fn test_settle_refreshes_balances() {
        let mut ledger = PortfolioLedger::new(dec!(10000), dec!(100000));
        let mut report = TickReport::new(1, dec!(0.3), &ledger);
        ledger.exchange(Asset::Neo, dec!(3000), dec!(10000)).unwrap();
        report.settle(&ledger);
        assert_eq!(report.neo, dec!(7000));
        assert_eq!(report.gas, dec!(110000));
        assert_eq!(report.neo_drift, dec!(-3000));
        assert_eq!(report.gas_drift, dec!(10000));
    }
}
