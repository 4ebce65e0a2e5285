//! Embedded MongoDB lifecycle around a single test
//!
//! [`EmbeddedMongoDb`] is driven by two hooks:
//!
//! - [`on_test_start`](EmbeddedMongoDb::on_test_start) launches `mongod`
//!   unless the run is skipped, waits for readiness, then imports the
//!   configured fixture
//! - [`on_test_end`](EmbeddedMongoDb::on_test_end) stops whatever was
//!   started; it never fails and may be called any number of times
//!
//! ```text
//! Idle -> Starting -> Ready -> Importing -> Ready
//!            |                    |
//!            +------> Failed <----+
//!
//! any state but Idle -> Stopped   (on_test_end)
//! ```
//!
//! Errors from `on_test_start` propagate to the caller. The process handle
//! is kept either way, so the end hook releases it even after a failed start.
//!
//! ```rust,no_run
//! use embedded_mongodb_test::config::RunConfig;
//! use embedded_mongodb_test::lifecycle::EmbeddedMongoDb;
//!
//! #[tokio::test]
//! async fn test_with_users() {
//!     let config = RunConfig::parse(&["importFrom=users.json, arrayMode=true"]).unwrap();
//!     let mut mongo = EmbeddedMongoDb::from_env().unwrap();
//!
//!     let started = mongo.on_test_start(&config).await;
//!     // Test body...
//!     mongo.on_test_end().await;
//!     started.unwrap();
//! }
//! ```

use async_trait::async_trait;
use embedded_mongodb_seeding::{FixtureImporter, FixtureTarget};
use mongodb::bson::Document;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::{LifecycleError, LifecycleResult};
use crate::process::{MongodEndpoint, MongodProcess};
use crate::settings::MongodSettings;

/// Where an [`EmbeddedMongoDb`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
	/// Nothing started (also the state of a skipped run)
	Idle,
	/// `mongod` launched, waiting for readiness
	Starting,
	/// `mongod` accepts connections
	Ready,
	/// Fixture import in progress
	Importing,
	/// Startup or import failed
	Failed,
	/// Torn down by the end hook
	Stopped,
}

/// Opens the collection fixtures are imported into
#[async_trait]
pub trait TargetConnector: Send + Sync {
	/// Collection handle handed to the fixture importer
	type Target: FixtureTarget;

	/// Connect to `database.collection` on a running instance
	async fn connect(
		&self,
		endpoint: &MongodEndpoint,
		database: &str,
		collection: &str,
	) -> LifecycleResult<Self::Target>;
}

/// Connects with the MongoDB driver
#[derive(Debug, Clone, Default)]
pub struct MongoConnector {
	settings: MongodSettings,
}

impl MongoConnector {
	/// Connector bounding server selection by the settings' connect timeout
	pub fn new(settings: MongodSettings) -> Self {
		Self { settings }
	}
}

#[async_trait]
impl TargetConnector for MongoConnector {
	type Target = Collection<Document>;

	async fn connect(
		&self,
		endpoint: &MongodEndpoint,
		database: &str,
		collection: &str,
	) -> LifecycleResult<Self::Target> {
		let mut options = ClientOptions::parse(endpoint.connection_string())
			.await
			.map_err(|e| LifecycleError::Connection(e.to_string()))?;
		options.server_selection_timeout = Some(self.settings.connect_timeout());
		options.connect_timeout = Some(self.settings.connect_timeout());
		options.app_name = Some("embedded-mongodb".to_string());

		let client =
			Client::with_options(options).map_err(|e| LifecycleError::Connection(e.to_string()))?;
		Ok(client.database(database).collection::<Document>(collection))
	}
}

/// Embedded MongoDB instance bound to one test
pub struct EmbeddedMongoDb<C: TargetConnector = MongoConnector> {
	settings: MongodSettings,
	connector: C,
	process: Option<MongodProcess>,
	state: LifecycleState,
	imported: Option<usize>,
}

impl EmbeddedMongoDb<MongoConnector> {
	/// Instance using `settings` and the MongoDB driver
	pub fn new(settings: MongodSettings) -> Self {
		let connector = MongoConnector::new(settings.clone());
		Self::with_connector(settings, connector)
	}

	/// Instance configured from `EMBEDDED_MONGODB_*` environment variables
	pub fn from_env() -> LifecycleResult<Self> {
		Ok(Self::new(MongodSettings::from_env()?))
	}
}

impl<C: TargetConnector> EmbeddedMongoDb<C> {
	/// Instance importing fixtures through `connector`
	pub fn with_connector(settings: MongodSettings, connector: C) -> Self {
		Self {
			settings,
			connector,
			process: None,
			state: LifecycleState::Idle,
			imported: None,
		}
	}

	/// Start hook
	///
	/// Does nothing for a skipped run. Otherwise launches `mongod` on
	/// `config.port`, waits for readiness and imports `config.fixture_path`
	/// when one is set.
	///
	/// # Errors
	///
	/// - [`LifecycleError::AlreadyRunning`] if a process is still live
	/// - launch errors from [`MongodProcess::launch`]
	/// - [`LifecycleError::Connection`] if the fixture target cannot be opened
	/// - [`LifecycleError::Seeding`] if the import fails; a missing file reads
	///   `Could not find file: <path>`
	pub async fn on_test_start(&mut self, config: &RunConfig) -> LifecycleResult<()> {
		if config.skip {
			return Ok(());
		}
		if let Some(process) = &self.process {
			return Err(LifecycleError::AlreadyRunning(process.endpoint().port()));
		}

		self.imported = None;
		self.state = LifecycleState::Starting;
		info!("MongoDB starting on port {}", config.port);

		let process = match MongodProcess::launch(&self.settings, config.port).await {
			Ok(process) => process,
			Err(e) => {
				self.state = LifecycleState::Failed;
				return Err(e);
			}
		};
		info!("MongoDB ready: {}", process.readiness_line());
		self.process = Some(process);
		self.state = LifecycleState::Ready;

		if let Some(path) = &config.fixture_path {
			self.state = LifecycleState::Importing;
			match self.import(config, path).await {
				Ok(count) => {
					self.imported = Some(count);
					self.state = LifecycleState::Ready;
				}
				Err(e) => {
					self.state = LifecycleState::Failed;
					return Err(e);
				}
			}
		}

		Ok(())
	}

	async fn import(&self, config: &RunConfig, path: &str) -> LifecycleResult<usize> {
		let Some(endpoint) = self.endpoint() else {
			return Err(LifecycleError::Connection(
				"MongoDB is not running".to_string(),
			));
		};
		let importer = FixtureImporter::new(self.settings.fixtures_root());
		let target = self
			.connector
			.connect(endpoint, &config.database, &config.collection)
			.await?;

		let count = importer.import(path, config.import_mode(), &target).await?;
		info!(
			"Imported {} document(s) from {} into {}.{}",
			count, path, config.database, config.collection
		);
		Ok(count)
	}

	/// End hook
	///
	/// Stops the process if one is live. Safe to call repeatedly, after a
	/// failed start, or when nothing was started.
	pub async fn on_test_end(&mut self) {
		if let Some(process) = self.process.take() {
			let port = process.endpoint().port();
			process.stop().await;
			info!("MongoDB stopped on port {}", port);
		} else {
			debug!("No MongoDB process to stop");
		}

		if self.state != LifecycleState::Idle {
			self.state = LifecycleState::Stopped;
		}
	}

	/// Current lifecycle state
	pub fn state(&self) -> LifecycleState {
		self.state
	}

	/// Whether a process is live
	pub fn is_running(&self) -> bool {
		self.process.is_some()
	}

	/// Endpoint of the live process
	pub fn endpoint(&self) -> Option<&MongodEndpoint> {
		self.process.as_ref().map(MongodProcess::endpoint)
	}

	/// Output line that signalled readiness of the live process
	pub fn readiness_signal(&self) -> Option<&str> {
		self.process.as_ref().map(MongodProcess::readiness_line)
	}

	/// Documents imported by the last successful start
	pub fn imported_documents(&self) -> Option<usize> {
		self.imported
	}

	/// Settings this instance launches with
	pub fn settings(&self) -> &MongodSettings {
		&self.settings
	}

	/// Connector used for fixture import
	pub fn connector(&self) -> &C {
		&self.connector
	}
}

impl<C: TargetConnector> std::fmt::Debug for EmbeddedMongoDb<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EmbeddedMongoDb")
			.field("state", &self.state)
			.field("process", &self.process)
			.field("imported", &self.imported)
			.finish()
	}
}
