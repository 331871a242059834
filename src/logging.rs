//! `tracing` subscriber setup shared by the bot and its diagnostic binary.
//!
//! `RUST_LOG` overrides the filter. `FLAMINGO_LOG_JSON` switches to JSON
//! lines unless it is empty, `0` or `false`.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `default_directive` applies when
/// `RUST_LOG` is unset or unparsable.
pub fn init(default_directive: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if json_requested(std::env::var("FLAMINGO_LOG_JSON").ok().as_deref()) {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}

fn json_requested(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}
