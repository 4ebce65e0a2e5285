//! rstest fixtures
//!
//! ```rust,no_run
//! use embedded_mongodb_test::config::RunConfig;
//! use embedded_mongodb_test::fixtures::embedded_mongodb;
//! use embedded_mongodb_test::lifecycle::EmbeddedMongoDb;
//! use rstest::*;
//!
//! #[rstest]
//! #[tokio::test]
//! async fn test_with_mongodb(mut embedded_mongodb: EmbeddedMongoDb) {
//!     let config = RunConfig::parse(&["port=27018"]).unwrap();
//!     embedded_mongodb.on_test_start(&config).await.unwrap();
//!     // Test body...
//!     embedded_mongodb.on_test_end().await;
//! }
//! ```

use rstest::fixture;

use crate::lifecycle::EmbeddedMongoDb;
use crate::logging::init_test_logging;
use crate::settings::MongodSettings;

/// Settings read from `EMBEDDED_MONGODB_*` environment variables
///
/// Also installs the test logger.
///
/// # Panics
///
/// If an environment variable holds an invalid value.
#[fixture]
pub fn mongod_settings() -> MongodSettings {
	init_test_logging();
	MongodSettings::from_env().expect("Invalid EMBEDDED_MONGODB_* environment")
}

/// An idle [`EmbeddedMongoDb`] built from [`mongod_settings`]
///
/// Nothing is launched until the test calls
/// [`on_test_start`](EmbeddedMongoDb::on_test_start).
#[fixture]
pub fn embedded_mongodb(mongod_settings: MongodSettings) -> EmbeddedMongoDb {
	EmbeddedMongoDb::new(mongod_settings)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lifecycle::LifecycleState;
	use rstest::rstest;

	#[rstest]
	fn test_embedded_mongodb_starts_idle(embedded_mongodb: EmbeddedMongoDb) {
		assert_eq!(embedded_mongodb.state(), LifecycleState::Idle);
		assert!(!embedded_mongodb.is_running());
		assert_eq!(embedded_mongodb.endpoint(), None);
	}
}
