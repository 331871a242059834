//! Full-loop simulation: scripted rates through `Poller::run`.

use rust_decimal_macros::dec;
use std::sync::atomic::Ordering;
use std::time::Duration;

use flamingo_bot::config::AppConfig;
use flamingo_bot::engine::poller::Poller;
use flamingo_bot::types::{BotError, Direction};

use crate::scripted_feed::{body, ScriptedFeed};

fn fast_poller(feed: ScriptedFeed) -> Poller<ScriptedFeed> {
    Poller::new(feed, &AppConfig::default())
        .with_schedule(Duration::from_millis(1), Duration::from_millis(1))
}

#[tokio::test]
async fn test_run_replays_scenario_until_shutdown() {
    let feed = ScriptedFeed::new(vec![Ok(dec!(0.3000)), Ok(dec!(0.3012)), Ok(dec!(0.2990))]);
    let exhausted = feed.exhausted();
    let calls = feed.calls();
    let mut poller = fast_poller(feed);

    let summary = poller.run(async move { exhausted.notified().await }).await;

    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.exits, 2);
    assert_eq!(summary.feed_failures, 1);
    assert_eq!(summary.neo, dec!(10012));
    assert_eq!(summary.gas.round_dp(2), dec!(100033.44));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert!(!poller.channel(Direction::NeoToGas).is_open());
    assert!(!poller.channel(Direction::GasToNeo).is_open());
}

#[tokio::test]
async fn test_run_retries_after_feed_failure() {
    let missing_gas = r#"[{"symbol":"NEO","usd_price":10.0}]"#;
    let ok = body("10.0", "3.0");
    let feed = ScriptedFeed::from_bodies(&[missing_gas, "<html>502</html>", ok.as_str()]);
    let exhausted = feed.exhausted();
    let mut poller = fast_poller(feed);

    let summary = poller.run(async move { exhausted.notified().await }).await;

    // Two scripted failures plus the exhaustion marker; one real tick.
    assert_eq!(summary.feed_failures, 3);
    assert_eq!(summary.ticks, 1);
    assert_eq!(summary.entries, 2);
    assert!(poller.channel(Direction::NeoToGas).is_open());
    assert!(poller.channel(Direction::GasToNeo).is_open());
}

#[tokio::test]
async fn test_failed_feed_leaves_state_untouched() {
    let feed = ScriptedFeed::new(vec![Err(BotError::feed("transport error"))]);
    let exhausted = feed.exhausted();
    let mut poller = fast_poller(feed);

    let summary = poller.run(async move { exhausted.notified().await }).await;

    assert_eq!(summary.ticks, 0);
    assert_eq!(summary.neo, dec!(10000));
    assert_eq!(summary.gas, dec!(100000));
    assert!(poller.channel(Direction::NeoToGas).position().is_none());
    assert!(poller.channel(Direction::GasToNeo).position().is_none());
}

#[tokio::test]
async fn test_unfunded_channels_keep_running() {
    let mut cfg = AppConfig::default();
    cfg.portfolio.initial_neo = dec!(100);
    cfg.portfolio.initial_gas = dec!(5000);
    let feed = ScriptedFeed::new(vec![Ok(dec!(0.3)), Ok(dec!(0.3))]);
    let exhausted = feed.exhausted();
    let mut poller = Poller::new(feed, &cfg)
        .with_schedule(Duration::from_millis(1), Duration::from_millis(1));

    let summary = poller.run(async move { exhausted.notified().await }).await;

    // Neither channel can fund its entry size; both ticks still complete.
    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.entries, 0);
    assert!(!poller.channel(Direction::NeoToGas).is_open());
    assert!(!poller.channel(Direction::GasToNeo).is_open());
    assert_eq!(poller.ledger().neo(), dec!(100));
    assert_eq!(poller.ledger().gas(), dec!(5000));
}
