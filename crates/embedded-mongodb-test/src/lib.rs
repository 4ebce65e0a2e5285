//! # Embedded MongoDB Test
//!
//! Runs a real `mongod` around individual test cases.
//!
//! ## Overview
//!
//! Each test declares what it needs with textual markers: skip startup, bind
//! another port, or import a JSON fixture once the server is up. The start
//! hook launches `mongod` on a throwaway data directory and waits until it
//! accepts connections; the end hook tears it down again.
//!
//! ## Features
//!
//! - **[`RunConfig`]**: per-test configuration resolved from markers
//! - **[`EmbeddedMongoDb`]**: start/end hooks around one test
//! - **[`with_embedded_mongodb`]**: scoped start, body, end
//! - **[`MongodSettings`]**: binary, bind address, fixtures root and timeouts,
//!   from the environment or built in code
//! - **rstest fixtures**: [`mongod_settings`](fixtures::mongod_settings) and
//!   [`embedded_mongodb`](fixtures::embedded_mongodb)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use embedded_mongodb_test::prelude::*;
//!
//! #[tokio::test]
//! async fn test_users() {
//!     init_test_logging();
//!     let config = RunConfig::parse(&["importFrom=users.json, arrayMode=true"]).unwrap();
//!     let mut mongo = EmbeddedMongoDb::from_env().unwrap();
//!
//!     let started = mongo.on_test_start(&config).await;
//!     assert_eq!(mongo.imported_documents(), Some(3));
//!
//!     mongo.on_test_end().await;
//!     started.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: markers and [`RunConfig`]
//! - [`lifecycle`]: [`EmbeddedMongoDb`] and its hooks
//! - [`process`]: the `mongod` child process
//! - [`resource`]: scoped runs
//! - [`settings`]: environment-wide settings
//! - [`fixtures`]: rstest fixtures
//! - [`logging`]: test logger

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fixtures;
pub mod lifecycle;
pub mod logging;
pub mod process;
pub mod resource;
pub mod settings;

pub use config::{ConfigurationError, ImportMarker, Marker, RunConfig};
pub use error::{LifecycleError, LifecycleResult};
pub use lifecycle::{EmbeddedMongoDb, LifecycleState, MongoConnector, TargetConnector};
pub use logging::init_test_logging;
pub use process::{MongodEndpoint, MongodProcess};
pub use resource::{MongodContext, run_scoped, with_embedded_mongodb};
pub use settings::MongodSettings;

/// Convenience re-exports
pub mod prelude {
	pub use crate::config::{ConfigurationError, Marker, RunConfig};
	pub use crate::error::{LifecycleError, LifecycleResult};
	pub use crate::lifecycle::{EmbeddedMongoDb, LifecycleState};
	pub use crate::logging::init_test_logging;
	pub use crate::resource::{MongodContext, with_embedded_mongodb};
	pub use crate::settings::MongodSettings;
}
