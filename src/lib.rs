//! Flamingo swap bot: NEO/GAS paper trading around a fixed rate band.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binaries (the bot and the `check_rate` diagnostic).

pub mod config;
pub mod types;
pub mod feed;
pub mod engine;
pub mod logging;
