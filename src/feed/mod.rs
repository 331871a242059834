//! Price feeds.
//!
//! Defines the `PriceSource` trait the engine polls and the Flamingo
//! live-price implementation.

pub mod flamingo;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::types::BotError;

/// Abstraction over anything that can quote the GAS/NEO rate.
///
/// Implementors perform at most one fetch per call and never retry;
/// retry policy belongs to the polling loop.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current price of one GAS in NEO. Always positive on success;
    /// every failure is `BotError::FeedUnavailable`.
    async fn fetch_rate(&self) -> Result<Decimal, BotError>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}
