//! Embedded `mongod` process management
//!
//! [`MongodProcess`] owns a running `mongod` together with its temporary data
//! directory. Launching blocks until `mongod` prints its readiness line:
//!
//! - legacy text logs: `... waiting for connections on port 27017`
//! - structured logs (MongoDB 4.4+): `{"msg":"Waiting for connections","attr":{"port":27017,...}}`
//!
//! Output after readiness keeps being drained in the background so `mongod`
//! never blocks on a full pipe; it is logged at `trace` level under the
//! `mongod` target.
//!
//! Dropping a [`MongodProcess`] without calling [`stop`](MongodProcess::stop)
//! still kills `mongod`, but cannot wait for it to exit: the data directory is
//! removed right away and `mongod` may still hold files in it. Only `stop`
//! reaps the process before the directory goes.
//!
//! ```ignore
//! use embedded_mongodb_test::process::MongodProcess;
//! use embedded_mongodb_test::settings::MongodSettings;
//!
//! let process = MongodProcess::launch(&MongodSettings::from_env()?, 27017).await?;
//! let url = process.endpoint().connection_string();
//! // Use url...
//! process.stop().await;
//! ```

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{LifecycleError, LifecycleResult};
use crate::settings::MongodSettings;

/// Text `mongod` prints once it accepts connections (legacy log format)
pub const READINESS_SIGNAL: &str = "waiting for connections on port";

// How long to wait for an exit status once stdout has closed.
const EXIT_GRACE: Duration = Duration::from_secs(5);

const STRUCTURED_READINESS_MESSAGE: &str = "\"msg\":\"Waiting for connections\"";

/// Whether a line of `mongod` output is the readiness signal
///
/// # Examples
///
/// ```
/// use embedded_mongodb_test::process::is_readiness_line;
///
/// assert!(is_readiness_line("[initandlisten] waiting for connections on port 27017"));
/// assert!(is_readiness_line(r#"{"t":{},"s":"I","msg":"Waiting for connections","attr":{"port":27017}}"#));
/// assert!(!is_readiness_line("[initandlisten] MongoDB starting"));
/// ```
pub fn is_readiness_line(line: &str) -> bool {
	line.contains(READINESS_SIGNAL) || line.contains(STRUCTURED_READINESS_MESSAGE)
}

/// Host and port of a running instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongodEndpoint {
	host: String,
	port: u16,
}

impl MongodEndpoint {
	/// Create an endpoint
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self {
			host: host.into(),
			port,
		}
	}

	/// Host the driver connects to
	pub fn host(&self) -> &str {
		&self.host
	}

	/// Port `mongod` listens on
	pub fn port(&self) -> u16 {
		self.port
	}

	/// `mongodb://` connection string
	///
	/// ```
	/// use embedded_mongodb_test::process::MongodEndpoint;
	///
	/// let endpoint = MongodEndpoint::new("127.0.0.1", 27017);
	/// assert_eq!(endpoint.connection_string(), "mongodb://127.0.0.1:27017");
	/// ```
	pub fn connection_string(&self) -> String {
		if self.host.contains(':') {
			format!("mongodb://[{}]:{}", self.host, self.port)
		} else {
			format!("mongodb://{}:{}", self.host, self.port)
		}
	}
}

/// A running `mongod`
pub struct MongodProcess {
	child: Child,
	endpoint: MongodEndpoint,
	readiness: String,
	drain: Option<JoinHandle<()>>,
	// Dropped after `child`, which is declared first.
	data_dir: TempDir,
}

impl std::fmt::Debug for MongodProcess {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MongodProcess")
			.field("pid", &self.child.id())
			.field("endpoint", &self.endpoint)
			.field("data_dir", &self.data_dir.path())
			.finish()
	}
}

impl MongodProcess {
	/// Launch `mongod` on `port` and wait for its readiness signal
	///
	/// # Errors
	///
	/// - [`LifecycleError::DataDirectory`] if the data directory cannot be created
	/// - [`LifecycleError::Spawn`] if the binary cannot be executed
	/// - [`LifecycleError::ExitedBeforeReady`] if `mongod` exits first
	/// - [`LifecycleError::StartupTimeout`] if readiness takes longer than
	///   [`MongodSettings::startup_timeout`]
	///
	/// The process is killed before any of these errors is returned.
	pub async fn launch(settings: &MongodSettings, port: u16) -> LifecycleResult<Self> {
		let data_dir = tempfile::Builder::new()
			.prefix("embedded-mongodb-")
			.tempdir()
			.map_err(LifecycleError::DataDirectory)?;

		let mut command = Command::new(settings.binary());
		command
			.arg("--port")
			.arg(port.to_string())
			.arg("--dbpath")
			.arg(data_dir.path())
			.arg("--bind_ip")
			.arg(settings.bind_ip())
			.args(settings.extra_args())
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.kill_on_drop(true);

		debug!(
			"Launching {} on port {} with data directory {}",
			settings.binary().display(),
			port,
			data_dir.path().display()
		);
		let mut child = command.spawn().map_err(|source| LifecycleError::Spawn {
			binary: settings.binary().to_path_buf(),
			source,
		})?;

		let Some(stdout) = child.stdout.take() else {
			let _ = child.kill().await;
			return Err(LifecycleError::ExitedBeforeReady { port, status: None });
		};
		let mut lines = BufReader::new(stdout).lines();

		let waited = tokio::time::timeout(settings.startup_timeout(), wait_for_readiness(&mut lines)).await;
		let readiness = match waited {
			Ok(Ok(Some(line))) => line,
			Ok(Ok(None)) => {
				let status = match tokio::time::timeout(EXIT_GRACE, child.wait()).await {
					Ok(Ok(status)) => Some(status),
					_ => {
						let _ = child.kill().await;
						None
					}
				};
				return Err(LifecycleError::ExitedBeforeReady { port, status });
			}
			Ok(Err(e)) => {
				let _ = child.kill().await;
				return Err(LifecycleError::Io(e));
			}
			Err(_) => {
				let _ = child.kill().await;
				return Err(LifecycleError::StartupTimeout {
					port,
					timeout: settings.startup_timeout(),
				});
			}
		};

		let drain = tokio::spawn(async move {
			while let Ok(Some(line)) = lines.next_line().await {
				trace!(target: "mongod", "{}", line);
			}
		});

		Ok(Self {
			child,
			endpoint: MongodEndpoint::new(client_host(settings.bind_ip()), port),
			readiness,
			drain: Some(drain),
			data_dir,
		})
	}

	/// Where the process accepts connections
	pub fn endpoint(&self) -> &MongodEndpoint {
		&self.endpoint
	}

	/// The output line that signalled readiness
	pub fn readiness_line(&self) -> &str {
		&self.readiness
	}

	/// OS process id, while the process is alive
	pub fn pid(&self) -> Option<u32> {
		self.child.id()
	}

	/// Temporary `--dbpath`, removed when the process is stopped or dropped
	pub fn data_dir(&self) -> &Path {
		self.data_dir.path()
	}

	/// Kill the process, reap it and remove its data directory
	///
	/// Never fails; problems are logged.
	pub async fn stop(mut self) {
		if let Some(drain) = self.drain.take() {
			drain.abort();
		}
		if let Err(e) = self.child.kill().await {
			warn!("Failed to stop MongoDB on port {}: {}", self.endpoint.port(), e);
		}
		debug!(
			"Removing MongoDB data directory {}",
			self.data_dir.path().display()
		);
	}
}

impl Drop for MongodProcess {
	fn drop(&mut self) {
		if let Some(drain) = self.drain.take() {
			drain.abort();
		}
		// Reached without `stop`: kill now, reap if it already exited.
		if let Ok(None) = self.child.try_wait() {
			if let Err(e) = self.child.start_kill() {
				warn!("Failed to kill MongoDB on port {}: {}", self.endpoint.port(), e);
			}
			let _ = self.child.try_wait();
		}
	}
}

async fn wait_for_readiness(
	lines: &mut tokio::io::Lines<BufReader<ChildStdout>>,
) -> std::io::Result<Option<String>> {
	while let Some(line) = lines.next_line().await? {
		trace!(target: "mongod", "{}", line);
		if is_readiness_line(&line) {
			return Ok(Some(line));
		}
	}
	Ok(None)
}

// A wildcard bind address is not something a client can dial.
fn client_host(bind_ip: &str) -> &str {
	let first = bind_ip.split(',').next().unwrap_or(bind_ip).trim();
	match first {
		"" | "0.0.0.0" => "127.0.0.1",
		"::" => "::1",
		host => host,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case::legacy("2017-01-01T00:00:00.000+0000 I NETWORK  [thread1] waiting for connections on port 27017")]
	#[case::structured(
		r#"{"t":{"$date":"2024-01-01T00:00:00.000+00:00"},"s":"I","c":"NETWORK","id":23016,"ctx":"listener","msg":"Waiting for connections","attr":{"port":27017,"ssl":"off"}}"#
	)]
	fn test_readiness_lines(#[case] line: &str) {
		assert!(is_readiness_line(line));
	}

	#[rstest]
	#[case::startup("[initandlisten] MongoDB starting : pid=1 port=27017")]
	#[case::other_message(r#"{"msg":"Listening on","attr":{"address":"127.0.0.1"}}"#)]
	#[case::empty("")]
	fn test_non_readiness_lines(#[case] line: &str) {
		assert!(!is_readiness_line(line));
	}

	#[rstest]
	#[case("127.0.0.1", "127.0.0.1")]
	#[case("0.0.0.0", "127.0.0.1")]
	#[case("::", "::1")]
	#[case("localhost,10.0.0.5", "localhost")]
	fn test_client_host(#[case] bind_ip: &str, #[case] expected: &str) {
		assert_eq!(client_host(bind_ip), expected);
	}

	#[rstest]
	fn test_ipv6_connection_string() {
		let endpoint = MongodEndpoint::new("::1", 27018);
		assert_eq!(endpoint.connection_string(), "mongodb://[::1]:27018");
	}
}
