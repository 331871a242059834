//! Shared types for the Flamingo swap bot.
//!
//! Assets, trade directions, positions, channel states, trade events and
//! the error taxonomy used by the feed, the engine and the binary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Assets and directions
// ---------------------------------------------------------------------------

/// One of the two tracked assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Neo,
    Gas,
}

impl Asset {
    /// Ticker symbol as it appears in the Flamingo price feed.
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Neo => "NEO",
            Asset::Gas => "GAS",
        }
    }

    /// The other asset of the pair.
    pub fn other(&self) -> Self {
        match self {
            Asset::Neo => Asset::Gas,
            Asset::Gas => Asset::Neo,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Trading direction of a channel.
///
/// `NeoToGas` spends NEO on entry and holds GAS until exit;
/// `GasToNeo` is the mirror image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NeoToGas,
    GasToNeo,
}

impl Direction {
    /// Both directions in evaluation order.
    pub const ALL: &'static [Direction] = &[Direction::NeoToGas, Direction::GasToNeo];

    /// Asset debited on entry (and credited back on exit).
    pub fn spent(&self) -> Asset {
        match self {
            Direction::NeoToGas => Asset::Neo,
            Direction::GasToNeo => Asset::Gas,
        }
    }

    /// Asset credited on entry and held while the position is open.
    pub fn acquired(&self) -> Asset {
        self.spent().other()
    }

    /// Convert `amount` of the spent asset into the acquired asset at `rate`
    /// (rate = NEO per GAS). `None` if the result does not fit a `Decimal`.
    pub fn convert_forward(&self, amount: Decimal, rate: Decimal) -> Option<Decimal> {
        match self {
            Direction::NeoToGas => amount.checked_div(rate),
            Direction::GasToNeo => amount.checked_mul(rate),
        }
    }

    /// Convert `amount` of the acquired asset back into the spent asset.
    /// Unbounded as the rate approaches zero for GAS→NEO; `None` on overflow.
    pub fn convert_back(&self, amount: Decimal, rate: Decimal) -> Option<Decimal> {
        match self {
            Direction::NeoToGas => amount.checked_mul(rate),
            Direction::GasToNeo => amount.checked_div(rate),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::NeoToGas => write!(f, "NEO→GAS"),
            Direction::GasToNeo => write!(f, "GAS→NEO"),
        }
    }
}

// ---------------------------------------------------------------------------
// Positions and channel state
// ---------------------------------------------------------------------------

/// An open, unconverted holding acquired by a channel's entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub trade_id: Uuid,
    pub direction: Direction,
    /// Rate (NEO per GAS) at the moment of entry.
    pub entry_rate: Decimal,
    /// Amount of `direction.spent()` given up on entry.
    pub spent_amount: Decimal,
    /// Amount of `direction.acquired()` obtained on entry.
    pub held_amount: Decimal,
    pub opened_at: DateTime<Utc>,
}

/// The two states of a trade channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChannelState {
    #[default]
    Idle,
    Open(Position),
}

impl ChannelState {
    pub fn position(&self) -> Option<&Position> {
        match self {
            ChannelState::Idle => None,
            ChannelState::Open(p) => Some(p),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ChannelState::Open(_))
    }
}

// ---------------------------------------------------------------------------
// Trade events
// ---------------------------------------------------------------------------

/// A state transition produced by a channel, with the balances it left behind.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Entered {
        trade_id: Uuid,
        direction: Direction,
        rate: Decimal,
        spent: Decimal,
        received: Decimal,
        neo_after: Decimal,
        gas_after: Decimal,
    },
    Exited {
        trade_id: Uuid,
        direction: Direction,
        rate: Decimal,
        entry_rate: Decimal,
        /// Held amount of the acquired asset converted back.
        returned: Decimal,
        /// Amount of the spent asset credited on exit.
        received: Decimal,
        /// `received` minus the amount spent on entry, in the spent asset.
        gain: Decimal,
        neo_after: Decimal,
        gas_after: Decimal,
    },
}

impl TradeEvent {
    pub fn direction(&self) -> Direction {
        match self {
            TradeEvent::Entered { direction, .. } | TradeEvent::Exited { direction, .. } => {
                *direction
            }
        }
    }

    pub fn trade_id(&self) -> Uuid {
        match self {
            TradeEvent::Entered { trade_id, .. } | TradeEvent::Exited { trade_id, .. } => *trade_id,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, TradeEvent::Entered { .. })
    }
}

impl fmt::Display for TradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeEvent::Entered {
                direction, rate, spent, received, neo_after, gas_after, ..
            } => write!(
                f,
                "Entered {direction} trade at rate {rate:.4}: -{spent:.2} {}, +{received:.2} {}. \
                 Balances: {neo_after:.2} NEO, {gas_after:.2} GAS.",
                direction.spent(),
                direction.acquired(),
            ),
            TradeEvent::Exited {
                direction, rate, entry_rate, returned, received, neo_after, gas_after, ..
            } => write!(
                f,
                "Exited {direction} trade at rate {rate:.4} (entry was {entry_rate:.4}): \
                 converted {returned:.2} {} for {received:.2} {}. \
                 Balances: {neo_after:.2} NEO, {gas_after:.2} GAS.",
                direction.acquired(),
                direction.spent(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Every failure the bot knows about. Only `Config` is fatal, and only at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BotError {
    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Insufficient {asset}: need {needed:.2}, have {available:.2}")]
    InsufficientFunds {
        asset: Asset,
        needed: Decimal,
        available: Decimal,
    },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BotError {
    pub fn feed(reason: impl Into<String>) -> Self {
        BotError::FeedUnavailable(reason.into())
    }

    pub fn overflow(what: impl Into<String>) -> Self {
        BotError::Overflow(what.into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
