//! Per-test run configuration
//!
//! Tests declare what they need from the embedded MongoDB instance with
//! [`Marker`]s. [`RunConfig::resolve`] turns a set of markers into the
//! effective configuration for one test run.
//!
//! ## Textual markers
//!
//! | Marker | Meaning |
//! |---|---|
//! | `skip` | Do not start MongoDB for this test |
//! | `port=27018` | Bind a non-default port |
//! | `importFrom=users.json` | Import a fixture after startup |
//! | `importFrom=users.json, arrayMode=true` | Import a fixture holding a JSON array |
//! | `importFrom=users.json, database=app, collection=users` | Import into another collection |
//!
//! Options are separated by commas, so a fixture path cannot contain one:
//! `importFrom=a,b.json` reads `b.json` as an option and fails with
//! [`ConfigurationError::UnknownOption`].
//!
//! ## Precedence
//!
//! `skip` wins over every other marker. Two `port` markers with different
//! values, or two `importFrom` markers, are rejected with
//! [`ConfigurationError::Conflict`].
//!
//! ```rust
//! use embedded_mongodb_test::config::RunConfig;
//!
//! let config = RunConfig::parse(&["port=27018", "importFrom=users.json, arrayMode=true"]).unwrap();
//! assert_eq!(config.port, 27018);
//! assert_eq!(config.fixture_path.as_deref(), Some("users.json"));
//! assert!(config.array_mode);
//! ```

use std::str::FromStr;

use embedded_mongodb_seeding::ImportMode;
use thiserror::Error;

/// Port `mongod` binds when no `port` marker is given.
pub const DEFAULT_PORT: u16 = 27017;

/// Database fixtures are imported into by default.
pub const DEFAULT_DATABASE: &str = "local";

/// Collection fixtures are imported into by default.
pub const DEFAULT_COLLECTION: &str = "embedded-test-collection";

/// Contradictory or malformed per-test configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// Marker text could not be read at all.
	#[error("Malformed marker: {0}")]
	Malformed(String),

	/// Option name is not recognized.
	#[error("Unknown marker option: {0}")]
	UnknownOption(String),

	/// Option value has the wrong type or range.
	#[error("Invalid value for {option}: {value}")]
	InvalidValue {
		/// Option name
		option: String,
		/// Rejected value
		value: String,
	},

	/// Markers contradict each other.
	#[error("Conflicting markers: {0}")]
	Conflict(String),

	/// Environment variable holds an unusable value.
	#[error("Invalid environment variable {variable}: {value}")]
	Environment {
		/// Variable name
		variable: String,
		/// Rejected value
		value: String,
	},
}

/// Fixture import requested by a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMarker {
	/// Fixture path, relative to the fixtures root unless absolute
	pub path: String,
	/// Whether the fixture holds a single JSON array
	pub array_mode: bool,
	/// Target database override
	pub database: Option<String>,
	/// Target collection override
	pub collection: Option<String>,
}

impl ImportMarker {
	/// Import `path` in line mode into the default collection
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			array_mode: false,
			database: None,
			collection: None,
		}
	}

	/// Set array mode
	pub fn array_mode(mut self, array_mode: bool) -> Self {
		self.array_mode = array_mode;
		self
	}

	/// Import into another database
	pub fn database(mut self, database: impl Into<String>) -> Self {
		self.database = Some(database.into());
		self
	}

	/// Import into another collection
	pub fn collection(mut self, collection: impl Into<String>) -> Self {
		self.collection = Some(collection.into());
		self
	}
}

/// Declarative per-test metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
	/// Do not start MongoDB
	Skip,
	/// Bind this port instead of [`DEFAULT_PORT`]
	Port(u16),
	/// Import a fixture once MongoDB is ready
	Import(ImportMarker),
}

impl FromStr for Marker {
	type Err = ConfigurationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut options = s.split(',').map(str::trim).filter(|o| !o.is_empty());
		let head = options
			.next()
			.ok_or_else(|| ConfigurationError::Malformed(s.to_string()))?;

		let (name, value) = split_option(head);
		match (name, value) {
			("skip", None) => {
				reject_trailing(options)?;
				Ok(Marker::Skip)
			}
			("port", Some(value)) => {
				reject_trailing(options)?;
				parse_port(value).map(Marker::Port)
			}
			("importFrom", Some(path)) if !path.is_empty() => {
				let mut import = ImportMarker::new(path);
				for option in options {
					match split_option(option) {
						("arrayMode", Some(value)) => {
							import.array_mode = parse_bool("arrayMode", value)?;
						}
						("database", Some(value)) if !value.is_empty() => {
							import.database = Some(value.to_string());
						}
						("collection", Some(value)) if !value.is_empty() => {
							import.collection = Some(value.to_string());
						}
						(name @ ("arrayMode" | "database" | "collection"), value) => {
							return Err(ConfigurationError::InvalidValue {
								option: name.to_string(),
								value: value.unwrap_or_default().to_string(),
							});
						}
						_ => return Err(ConfigurationError::UnknownOption(option.to_string())),
					}
				}
				Ok(Marker::Import(import))
			}
			("skip" | "port" | "importFrom", _) => Err(ConfigurationError::Malformed(s.to_string())),
			_ => Err(ConfigurationError::UnknownOption(head.to_string())),
		}
	}
}

fn split_option(option: &str) -> (&str, Option<&str>) {
	match option.split_once('=') {
		Some((name, value)) => (name.trim(), Some(value.trim())),
		None => (option.trim(), None),
	}
}

fn reject_trailing<'a>(mut options: impl Iterator<Item = &'a str>) -> Result<(), ConfigurationError> {
	match options.next() {
		Some(option) => Err(ConfigurationError::UnknownOption(option.to_string())),
		None => Ok(()),
	}
}

fn parse_port(value: &str) -> Result<u16, ConfigurationError> {
	match value.parse::<u16>() {
		Ok(port) if port != 0 => Ok(port),
		_ => Err(ConfigurationError::InvalidValue {
			option: "port".to_string(),
			value: value.to_string(),
		}),
	}
}

fn parse_bool(option: &str, value: &str) -> Result<bool, ConfigurationError> {
	match value {
		"true" => Ok(true),
		"false" => Ok(false),
		_ => Err(ConfigurationError::InvalidValue {
			option: option.to_string(),
			value: value.to_string(),
		}),
	}
}

/// Effective configuration for one test run
///
/// Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
	/// Do not start MongoDB
	pub skip: bool,
	/// Port `mongod` binds
	pub port: u16,
	/// Fixture to import after startup
	pub fixture_path: Option<String>,
	/// Whether the fixture holds a single JSON array
	pub array_mode: bool,
	/// Database the fixture is imported into
	pub database: String,
	/// Collection the fixture is imported into
	pub collection: String,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			skip: false,
			port: DEFAULT_PORT,
			fixture_path: None,
			array_mode: false,
			database: DEFAULT_DATABASE.to_string(),
			collection: DEFAULT_COLLECTION.to_string(),
		}
	}
}

impl RunConfig {
	/// Configuration that starts nothing
	pub fn skipped() -> Self {
		Self {
			skip: true,
			..Self::default()
		}
	}

	/// Resolve markers into a run configuration
	///
	/// # Errors
	///
	/// [`ConfigurationError::Conflict`] for two different ports or more than
	/// one import, unless a `Skip` marker is present.
	pub fn resolve(markers: &[Marker]) -> Result<Self, ConfigurationError> {
		if markers.iter().any(|m| matches!(m, Marker::Skip)) {
			return Ok(Self::skipped());
		}

		let mut config = Self::default();
		let mut port: Option<u16> = None;
		let mut import: Option<&ImportMarker> = None;

		for marker in markers {
			match marker {
				Marker::Skip => {}
				Marker::Port(value) => match port {
					Some(existing) if existing != *value => {
						return Err(ConfigurationError::Conflict(format!(
							"port={} and port={}",
							existing, value
						)));
					}
					_ => port = Some(*value),
				},
				Marker::Import(marker) => {
					if let Some(existing) = import {
						return Err(ConfigurationError::Conflict(format!(
							"importFrom={} and importFrom={}",
							existing.path, marker.path
						)));
					}
					import = Some(marker);
				}
			}
		}

		if let Some(port) = port {
			config.port = port;
		}
		if let Some(import) = import {
			config.fixture_path = Some(import.path.clone());
			config.array_mode = import.array_mode;
			if let Some(database) = &import.database {
				config.database = database.clone();
			}
			if let Some(collection) = &import.collection {
				config.collection = collection.clone();
			}
		}

		Ok(config)
	}

	/// Parse textual markers and resolve them
	pub fn parse(markers: &[&str]) -> Result<Self, ConfigurationError> {
		let markers = markers
			.iter()
			.map(|m| m.parse::<Marker>())
			.collect::<Result<Vec<_>, _>>()?;
		Self::resolve(&markers)
	}

	/// Import mode derived from `array_mode`
	pub fn import_mode(&self) -> ImportMode {
		ImportMode::from_array_flag(self.array_mode)
	}
}
