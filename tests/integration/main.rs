//! Integration tests: drive the full polling loop against an in-memory feed.

mod scripted_feed;
mod simulation;
