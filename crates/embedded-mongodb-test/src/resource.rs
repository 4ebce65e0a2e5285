//! Scoped embedded MongoDB around a block of test code
//!
//! [`with_embedded_mongodb`] runs the start hook, the body, and the end hook in
//! that order. The end hook runs whether or not the start hook succeeded, so a
//! failed fixture import still leaves no `mongod` behind.
//!
//! ```rust,no_run
//! use embedded_mongodb_test::config::RunConfig;
//! use embedded_mongodb_test::resource::with_embedded_mongodb;
//! use embedded_mongodb_test::settings::MongodSettings;
//!
//! #[tokio::test]
//! async fn test_users_are_seeded() {
//!     let config = RunConfig::parse(&["port=27018", "importFrom=users.json"]).unwrap();
//!
//!     let imported = with_embedded_mongodb(MongodSettings::new(), &config, |ctx| async move {
//!         // ctx.connection_string() points at the running instance
//!         ctx.imported_documents()
//!     })
//!     .await
//!     .unwrap();
//!
//!     assert_eq!(imported, Some(3));
//! }
//! ```

use std::future::Future;

use crate::config::RunConfig;
use crate::error::LifecycleResult;
use crate::lifecycle::{EmbeddedMongoDb, TargetConnector};
use crate::process::MongodEndpoint;
use crate::settings::MongodSettings;

/// What the body of a scoped run sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongodContext {
	endpoint: Option<MongodEndpoint>,
	database: String,
	collection: String,
	imported: Option<usize>,
}

impl MongodContext {
	/// Endpoint of the running instance, `None` for a skipped run
	pub fn endpoint(&self) -> Option<&MongodEndpoint> {
		self.endpoint.as_ref()
	}

	/// `mongodb://` URL of the running instance
	pub fn connection_string(&self) -> Option<String> {
		self.endpoint.as_ref().map(MongodEndpoint::connection_string)
	}

	/// Database fixtures were imported into
	pub fn database(&self) -> &str {
		&self.database
	}

	/// Collection fixtures were imported into
	pub fn collection(&self) -> &str {
		&self.collection
	}

	/// Number of fixture documents imported, if a fixture was configured
	pub fn imported_documents(&self) -> Option<usize> {
		self.imported
	}
}

/// Run `f` against an embedded MongoDB started from `settings` and `config`
///
/// # Errors
///
/// Any start hook error. `f` does not run in that case, but the end hook
/// still does.
pub async fn with_embedded_mongodb<F, Fut, T>(
	settings: MongodSettings,
	config: &RunConfig,
	f: F,
) -> LifecycleResult<T>
where
	F: FnOnce(MongodContext) -> Fut,
	Fut: Future<Output = T>,
{
	let mut mongo = EmbeddedMongoDb::new(settings);
	run_scoped(&mut mongo, config, f).await
}

/// Like [`with_embedded_mongodb`], driving an existing instance
pub async fn run_scoped<C, F, Fut, T>(
	mongo: &mut EmbeddedMongoDb<C>,
	config: &RunConfig,
	f: F,
) -> LifecycleResult<T>
where
	C: TargetConnector,
	F: FnOnce(MongodContext) -> Fut,
	Fut: Future<Output = T>,
{
	if let Err(e) = mongo.on_test_start(config).await {
		mongo.on_test_end().await;
		return Err(e);
	}

	let context = MongodContext {
		endpoint: mongo.endpoint().cloned(),
		database: config.database.clone(),
		collection: config.collection.clone(),
		imported: mongo.imported_documents(),
	};
	let output = f(context).await;

	mongo.on_test_end().await;
	Ok(output)
}
