//! # embedded-mongodb
//!
//! Start a real `mongod` around individual test cases and seed it from JSON
//! fixture files.
//!
//! ## Feature Flags
//!
//! - `seeding` - Fixture importer only, for a MongoDB you run yourself
//! - `lifecycle` - Process lifecycle, per-test markers, rstest fixtures
//! - `full` (default) - Everything
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use embedded_mongodb::prelude::*;
//!
//! #[tokio::test]
//! async fn test_users_are_seeded() {
//!     let config = RunConfig::parse(&["importFrom=users.json, arrayMode=true"]).unwrap();
//!
//!     let count = with_embedded_mongodb(MongodSettings::from_env().unwrap(), &config, |ctx| async move {
//!         ctx.imported_documents()
//!     })
//!     .await
//!     .unwrap();
//!
//!     assert_eq!(count, Some(3));
//! }
//! ```
//!
//! Fixture files are resolved against `tests/fixtures` unless
//! `EMBEDDED_MONGODB_FIXTURES_DIR` says otherwise. Line mode (the default)
//! reads one JSON document per line; `arrayMode=true` reads a single JSON
//! array.

#[cfg(feature = "seeding")]
pub use embedded_mongodb_seeding as seeding;

#[cfg(feature = "lifecycle")]
pub use embedded_mongodb_test as lifecycle;

#[cfg(feature = "seeding")]
pub use embedded_mongodb_seeding::{
	FixtureImporter, FixtureParser, FixtureTarget, ImportMode, SeedingError, SeedingResult,
};

#[cfg(feature = "lifecycle")]
pub use embedded_mongodb_test::{
	ConfigurationError, EmbeddedMongoDb, LifecycleError, LifecycleResult, LifecycleState, Marker,
	MongodContext, MongodEndpoint, MongodSettings, RunConfig, init_test_logging,
	with_embedded_mongodb,
};

/// Common imports
///
/// ```rust
/// use embedded_mongodb::prelude::*;
/// ```
pub mod prelude {
	#[cfg(feature = "seeding")]
	pub use embedded_mongodb_seeding::prelude::*;

	#[cfg(feature = "lifecycle")]
	pub use embedded_mongodb_test::prelude::*;
}
