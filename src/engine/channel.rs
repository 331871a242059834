//! A trade channel: one independent direction of the strategy.
//!
//! A channel is `Idle` or holds exactly one open position. It enters when
//! the rate sits inside the entry band (inclusive on both ends) and exits
//! once the rate has moved at least `exit_threshold` in its favour:
//! up for NEO→GAS, down for GAS→NEO. Entry sizes are fixed notional,
//! independent of the current balance.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::ledger::PortfolioLedger;
use crate::config::StrategyConfig;
use crate::types::{BotError, ChannelState, Direction, Position, TradeEvent};

/// Inclusive rate interval in which new positions may be opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryBand {
    pub lower: Decimal,
    pub upper: Decimal,
}

impl EntryBand {
    pub fn new(lower: Decimal, upper: Decimal) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, rate: Decimal) -> bool {
        self.lower <= rate && rate <= self.upper
    }
}

#[derive(Debug, Clone)]
pub struct TradeChannel {
    direction: Direction,
    entry_size: Decimal,
    exit_threshold: Decimal,
    band: EntryBand,
    state: ChannelState,
}

impl TradeChannel {
    pub fn new(
        direction: Direction,
        entry_size: Decimal,
        exit_threshold: Decimal,
        band: EntryBand,
    ) -> Self {
        Self {
            direction,
            entry_size,
            exit_threshold,
            band,
            state: ChannelState::Idle,
        }
    }

    /// Build the channel for `direction` from strategy settings.
    pub fn from_config(direction: Direction, cfg: &StrategyConfig) -> Self {
        let entry_size = match direction {
            Direction::NeoToGas => cfg.neo_entry_size,
            Direction::GasToNeo => cfg.gas_entry_size,
        };
        Self::new(
            direction,
            entry_size,
            cfg.exit_threshold,
            EntryBand::new(cfg.entry_lower, cfg.entry_upper),
        )
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn entry_size(&self) -> Decimal {
        self.entry_size
    }

    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    pub fn position(&self) -> Option<&Position> {
        self.state.position()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Whether the entry condition holds: idle and `rate` inside the band.
    pub fn should_enter(&self, rate: Decimal) -> bool {
        matches!(self.state, ChannelState::Idle) && self.band.contains(rate)
    }

    /// Whether the open position has reached its exit trigger at `rate`.
    pub fn should_exit(&self, rate: Decimal) -> bool {
        match &self.state {
            ChannelState::Idle => false,
            ChannelState::Open(p) => match self.direction {
                Direction::NeoToGas => p
                    .entry_rate
                    .checked_add(self.exit_threshold)
                    .is_some_and(|trigger| rate >= trigger),
                Direction::GasToNeo => p
                    .entry_rate
                    .checked_sub(self.exit_threshold)
                    .is_some_and(|trigger| rate <= trigger),
            },
        }
    }

    /// Open a position if the entry condition holds.
    ///
    /// Returns `Ok(None)` when the condition does not hold (including when a
    /// position is already open) and `Err(InsufficientFunds)` when it holds
    /// but the ledger cannot cover the entry size. `Err(Overflow)` when the
    /// converted amount does not fit a `Decimal`. No error touches state.
    pub fn evaluate_entry(
        &mut self,
        rate: Decimal,
        ledger: &mut PortfolioLedger,
    ) -> Result<Option<TradeEvent>, BotError> {
        if !self.should_enter(rate) {
            return Ok(None);
        }

        let spend = self.direction.spent();
        let received = self
            .direction
            .convert_forward(self.entry_size, rate)
            .ok_or_else(|| {
                BotError::overflow(format!(
                    "{} entry of {} at rate {rate}",
                    self.direction, self.entry_size
                ))
            })?;
        ledger.try_exchange(spend, self.entry_size, received)?;

        let position = Position {
            trade_id: Uuid::new_v4(),
            direction: self.direction,
            entry_rate: rate,
            spent_amount: self.entry_size,
            held_amount: received,
            opened_at: Utc::now(),
        };
        info!(
            trade_id = %position.trade_id,
            channel = %self.direction,
            rate = %rate,
            spent = %self.entry_size,
            received = %received,
            "Position opened"
        );

        let event = TradeEvent::Entered {
            trade_id: position.trade_id,
            direction: self.direction,
            rate,
            spent: self.entry_size,
            received,
            neo_after: ledger.neo(),
            gas_after: ledger.gas(),
        };
        self.state = ChannelState::Open(position);
        Ok(Some(event))
    }

    /// Close the open position in full if its exit condition holds.
    ///
    /// On `Err(Overflow)` the position stays open and the ledger is
    /// unchanged; the exit is retried on the next tick.
    pub fn evaluate_exit(
        &mut self,
        rate: Decimal,
        ledger: &mut PortfolioLedger,
    ) -> Result<Option<TradeEvent>, BotError> {
        if !self.should_exit(rate) {
            return Ok(None);
        }
        let Some(held) = self.state.position().map(|p| p.held_amount) else {
            return Ok(None);
        };

        let received = self.direction.convert_back(held, rate).ok_or_else(|| {
            BotError::overflow(format!("{} exit of {held} at rate {rate}", self.direction))
        })?;
        ledger.exchange(self.direction.acquired(), held, received)?;

        let ChannelState::Open(position) = std::mem::take(&mut self.state) else {
            return Ok(None);
        };
        let gain = received - position.spent_amount;

        info!(
            trade_id = %position.trade_id,
            channel = %self.direction,
            rate = %rate,
            entry_rate = %position.entry_rate,
            returned = %position.held_amount,
            received = %received,
            gain = %gain,
            "Position closed"
        );

        Ok(Some(TradeEvent::Exited {
            trade_id: position.trade_id,
            direction: self.direction,
            rate,
            entry_rate: position.entry_rate,
            returned: position.held_amount,
            received,
            gain,
            neo_after: ledger.neo(),
            gas_after: ledger.gas(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
