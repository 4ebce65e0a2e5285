//! `env_logger` backend for lifecycle events in tests
//!
//! Lifecycle and import events are `tracing` events. Built with the `log`
//! feature, they are forwarded to `log` when no `tracing` subscriber is set,
//! so installing `env_logger` is enough to see them in test output.
//!
//! Without `RUST_LOG`, lifecycle status lines (`info`) are shown and the raw
//! `mongod` output is not. Raw output lives under the `mongod` target:
//!
//! ```text
//! RUST_LOG=embedded_mongodb_test=debug,mongod=trace cargo test
//! ```

use std::sync::Once;

use env_logger::Env;

/// Filter applied when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "embedded_mongodb_test=info,embedded_mongodb_seeding=info";

static LOGGER: Once = Once::new();

/// Install the test logger for the whole test binary
///
/// Every call after the first is a no-op, and a logger installed by someone
/// else is left alone.
///
/// ```
/// use embedded_mongodb_test::logging::init_test_logging;
///
/// init_test_logging();
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	LOGGER.call_once(|| {
		let _ = env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
			.is_test(true)
			.try_init();
	});
}
