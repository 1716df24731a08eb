//! Subscriber setup for the cullfx binaries and tests.
//!
//! Library crates only emit `tracing` events; installing a subscriber is left
//! to whoever owns the process.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter applied when `RUST_LOG` is unset: cullfx crates at `debug`,
/// everything else at `info`.
pub const DEFAULT_FILTER: &str = "info,cullfx=debug";

/// Install the global subscriber used by `cullfx-demo`.
///
/// Events carry their target and thread id. Graph edits, device connection
/// changes and per-pass summaries log at `debug` or above; the per-node lines
/// emitted while culling (effect application, skipped disconnected trackers)
/// are `trace` only, so `RUST_LOG=cullfx=trace` is needed to see them.
///
/// Calling this more than once keeps the first subscriber, so test binaries
/// may call it freely.
///
/// # Example
/// ```no_run
/// cullfx_core::init_logging();
/// tracing::debug!("Cull pass starting");
/// ```
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
