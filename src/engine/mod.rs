//! Core engine: the poll → evaluate → report loop.

pub mod ledger;
pub mod channel;
pub mod reporter;
pub mod poller;
