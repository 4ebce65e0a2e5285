//! Lifecycle error types

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use embedded_mongodb_seeding::SeedingError;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Errors raised while starting MongoDB or seeding it
#[derive(Debug, Error)]
pub enum LifecycleError {
	/// Per-test or environment configuration is unusable
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	/// Fixture import failed
	#[error(transparent)]
	Seeding(#[from] SeedingError),

	/// The `mongod` binary could not be executed
	#[error("Failed to launch {}: {source}", .binary.display())]
	Spawn {
		/// Binary that was executed
		binary: PathBuf,
		/// Underlying error
		#[source]
		source: std::io::Error,
	},

	/// The temporary data directory could not be created
	#[error("Failed to create MongoDB data directory: {0}")]
	DataDirectory(#[source] std::io::Error),

	/// `mongod` did not report readiness in time
	#[error("MongoDB did not start on port {port} within {timeout:?}")]
	StartupTimeout {
		/// Requested port
		port: u16,
		/// Configured startup timeout
		timeout: Duration,
	},

	/// `mongod` exited before reporting readiness
	#[error("MongoDB exited before accepting connections on port {port} ({})", describe_status(.status))]
	ExitedBeforeReady {
		/// Requested port
		port: u16,
		/// Exit status, when it could be collected
		status: Option<ExitStatus>,
	},

	/// Reading `mongod` output failed
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// A process is already running for this test
	#[error("MongoDB is already running on port {0}")]
	AlreadyRunning(u16),

	/// The driver could not connect to the running instance
	#[error("Failed to connect to MongoDB: {0}")]
	Connection(String),
}

fn describe_status(status: &Option<ExitStatus>) -> String {
	match status {
		Some(status) => status.to_string(),
		None => "exit status unavailable".to_string(),
	}
}

/// Result type alias for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
