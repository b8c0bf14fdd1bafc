//! Diagnostic logging setup
//!
//! Logs go to stderr so the report printed on stdout stays readable.
//! `RUST_LOG` overrides the default `info` filter.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, as JSON lines when `json` is set
///
/// Does nothing if a subscriber is already installed.
pub fn init(json: bool) {
    let (text, json) = if json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(text)
        .with(json)
        .try_init();
}
