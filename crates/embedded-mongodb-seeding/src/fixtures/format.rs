//! Fixture layout definitions.
//!
//! A fixture file holds either one JSON document per line (the layout
//! `mongoimport` reads by default) or a single JSON array of documents.

use mongodb::bson::{Bson, Document};
use serde_json::Value;

use crate::error::{SeedingError, SeedingResult};

/// How the documents of a fixture file are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ImportMode {
	/// Whitespace or newline delimited JSON documents (default).
	#[default]
	Lines,

	/// One top-level JSON array; every element is a document.
	Array,
}

impl ImportMode {
	/// Maps the boolean `arrayMode` option onto an import mode.
	///
	/// # Example
	///
	/// ```
	/// # use embedded_mongodb_seeding::fixtures::ImportMode;
	/// assert_eq!(ImportMode::from_array_flag(false), ImportMode::Lines);
	/// assert_eq!(ImportMode::from_array_flag(true), ImportMode::Array);
	/// ```
	pub fn from_array_flag(array_mode: bool) -> Self {
		if array_mode { Self::Array } else { Self::Lines }
	}

	/// Returns true for [`ImportMode::Array`].
	pub fn is_array(&self) -> bool {
		matches!(self, Self::Array)
	}
}

impl std::fmt::Display for ImportMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Lines => write!(f, "line"),
			Self::Array => write!(f, "array"),
		}
	}
}

/// Converts one parsed JSON value into a BSON document.
///
/// Extended JSON forms such as `{"$oid": "..."}` or `{"$date": ...}` are
/// converted to their BSON types. `index` is the zero-based position of the
/// value in the fixture and only used for error messages.
pub(crate) fn to_document(value: Value, index: usize) -> SeedingResult<Document> {
	match value {
		Value::Object(_) => match Bson::try_from(value) {
			Ok(Bson::Document(document)) => Ok(document),
			Ok(other) => Err(SeedingError::Parse(format!(
				"Document {} is not an object after extended JSON conversion: {:?}",
				index,
				other.element_type()
			))),
			Err(e) => Err(SeedingError::Parse(format!(
				"Invalid extended JSON in document {}: {}",
				index, e
			))),
		},
		other => Err(SeedingError::Parse(format!(
			"Document {} must be a JSON object, found {}",
			index,
			json_type_name(&other)
		))),
	}
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
