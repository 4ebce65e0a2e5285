//! Settings shared by every test run
//!
//! Unlike [`RunConfig`](crate::config::RunConfig), which is per test, these
//! describe the environment: which `mongod` binary to run, where fixtures
//! live and how long to wait for startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `EMBEDDED_MONGODB_BINARY` | `mongod` (looked up on `PATH`) |
//! | `EMBEDDED_MONGODB_BIND_IP` | `127.0.0.1` |
//! | `EMBEDDED_MONGODB_FIXTURES_DIR` | `tests/fixtures` |
//! | `EMBEDDED_MONGODB_STARTUP_TIMEOUT_SECS` | `30` |
//! | `EMBEDDED_MONGODB_CONNECT_TIMEOUT_SECS` | `10` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use embedded_mongodb_seeding::fixtures::DEFAULT_FIXTURES_ROOT;

use crate::config::ConfigurationError;

/// Environment variable naming the `mongod` binary.
pub const BINARY_ENV: &str = "EMBEDDED_MONGODB_BINARY";
/// Environment variable naming the bind address.
pub const BIND_IP_ENV: &str = "EMBEDDED_MONGODB_BIND_IP";
/// Environment variable naming the fixtures root.
pub const FIXTURES_DIR_ENV: &str = "EMBEDDED_MONGODB_FIXTURES_DIR";
/// Environment variable holding the startup timeout in seconds.
pub const STARTUP_TIMEOUT_ENV: &str = "EMBEDDED_MONGODB_STARTUP_TIMEOUT_SECS";
/// Environment variable holding the client connect timeout in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "EMBEDDED_MONGODB_CONNECT_TIMEOUT_SECS";

const DEFAULT_BINARY: &str = "mongod";
const DEFAULT_BIND_IP: &str = "127.0.0.1";
const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How to launch and reach the embedded `mongod`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongodSettings {
	binary: PathBuf,
	bind_ip: String,
	fixtures_root: PathBuf,
	startup_timeout: Duration,
	connect_timeout: Duration,
	extra_args: Vec<String>,
}

impl Default for MongodSettings {
	fn default() -> Self {
		Self {
			binary: PathBuf::from(DEFAULT_BINARY),
			bind_ip: DEFAULT_BIND_IP.to_string(),
			fixtures_root: PathBuf::from(DEFAULT_FIXTURES_ROOT),
			startup_timeout: DEFAULT_STARTUP_TIMEOUT,
			connect_timeout: DEFAULT_CONNECT_TIMEOUT,
			extra_args: Vec::new(),
		}
	}
}

impl MongodSettings {
	/// Create settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Read settings from `EMBEDDED_MONGODB_*` environment variables
	///
	/// Unset variables keep their defaults.
	///
	/// # Errors
	///
	/// [`ConfigurationError::Environment`] when a timeout is not a positive
	/// whole number of seconds.
	pub fn from_env() -> Result<Self, ConfigurationError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Read settings through an arbitrary variable lookup
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = Self::default();

		if let Some(binary) = lookup(BINARY_ENV).filter(|v| !v.is_empty()) {
			settings.binary = PathBuf::from(binary);
		}
		if let Some(bind_ip) = lookup(BIND_IP_ENV).filter(|v| !v.is_empty()) {
			settings.bind_ip = bind_ip;
		}
		if let Some(root) = lookup(FIXTURES_DIR_ENV).filter(|v| !v.is_empty()) {
			settings.fixtures_root = PathBuf::from(root);
		}
		if let Some(value) = lookup(STARTUP_TIMEOUT_ENV) {
			settings.startup_timeout = parse_seconds(STARTUP_TIMEOUT_ENV, &value)?;
		}
		if let Some(value) = lookup(CONNECT_TIMEOUT_ENV) {
			settings.connect_timeout = parse_seconds(CONNECT_TIMEOUT_ENV, &value)?;
		}

		Ok(settings)
	}

	/// Use another `mongod` binary
	pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
		self.binary = binary.into();
		self
	}

	/// Bind another address
	pub fn with_bind_ip(mut self, bind_ip: impl Into<String>) -> Self {
		self.bind_ip = bind_ip.into();
		self
	}

	/// Resolve fixture paths against another directory
	pub fn with_fixtures_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.fixtures_root = root.into();
		self
	}

	/// Bound the wait for the readiness signal
	pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
		self.startup_timeout = timeout;
		self
	}

	/// Bound the client's server selection when importing fixtures
	pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
		self.connect_timeout = timeout;
		self
	}

	/// Append an argument to the `mongod` command line
	pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
		self.extra_args.push(arg.into());
		self
	}

	/// `mongod` binary
	pub fn binary(&self) -> &Path {
		&self.binary
	}

	/// Bind address
	pub fn bind_ip(&self) -> &str {
		&self.bind_ip
	}

	/// Fixtures root
	pub fn fixtures_root(&self) -> &Path {
		&self.fixtures_root
	}

	/// Startup timeout
	pub fn startup_timeout(&self) -> Duration {
		self.startup_timeout
	}

	/// Connect timeout
	pub fn connect_timeout(&self) -> Duration {
		self.connect_timeout
	}

	/// Extra `mongod` arguments
	pub fn extra_args(&self) -> &[String] {
		&self.extra_args
	}
}

fn parse_seconds(variable: &str, value: &str) -> Result<Duration, ConfigurationError> {
	match value.trim().parse::<u64>() {
		Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
		_ => Err(ConfigurationError::Environment {
			variable: variable.to_string(),
			value: value.to_string(),
		}),
	}
}
