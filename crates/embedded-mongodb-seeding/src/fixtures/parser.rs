//! Fixture parsing functionality.
//!
//! This module turns fixture file content into BSON documents, following the
//! layout selected by [`ImportMode`].

use mongodb::bson::Document;
use serde_json::Value;

use super::format::{ImportMode, json_type_name, to_document};
use crate::error::{SeedingError, SeedingResult};

/// Parser for fixture content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureParser;

impl FixtureParser {
	/// Creates a new fixture parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses fixture content into documents, in source order.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::Parse`] if the content is not valid JSON or
	/// does not have the shape `mode` expects. In particular, a top-level
	/// array is rejected in [`ImportMode::Lines`].
	///
	/// # Example
	///
	/// ```
	/// # use embedded_mongodb_seeding::fixtures::{FixtureParser, ImportMode};
	/// let parser = FixtureParser::new();
	/// let documents = parser
	///     .parse_str("{\"a\": 1}\n{\"a\": 2}\n", ImportMode::Lines)
	///     .unwrap();
	/// assert_eq!(documents.len(), 2);
	/// ```
	pub fn parse_str(&self, content: &str, mode: ImportMode) -> SeedingResult<Vec<Document>> {
		match mode {
			ImportMode::Lines => self.parse_lines(content),
			ImportMode::Array => self.parse_array(content),
		}
	}

	/// Parses a stream of independent JSON documents.
	fn parse_lines(&self, content: &str) -> SeedingResult<Vec<Document>> {
		let stream = serde_json::Deserializer::from_str(content).into_iter::<Value>();

		let mut documents = Vec::new();
		for (idx, item) in stream.enumerate() {
			let value = item.map_err(|e| {
				SeedingError::Parse(format!("Invalid JSON document at index {}: {}", idx, e))
			})?;

			if value.is_array() {
				return Err(SeedingError::Parse(format!(
					"Expected one JSON document per line but found an array at index {}; \
					 enable array mode to import a JSON array",
					idx
				)));
			}

			documents.push(to_document(value, idx)?);
		}

		Ok(documents)
	}

	/// Parses a single top-level JSON array.
	fn parse_array(&self, content: &str) -> SeedingResult<Vec<Document>> {
		let value: Value = serde_json::from_str(content)
			.map_err(|e| SeedingError::Parse(format!("Invalid JSON array: {}", e)))?;

		let items = match value {
			Value::Array(items) => items,
			other => {
				return Err(SeedingError::Parse(format!(
					"Array mode expects a top-level JSON array, found {}",
					json_type_name(&other)
				)));
			}
		};

		let mut documents = Vec::with_capacity(items.len());
		for (idx, item) in items.into_iter().enumerate() {
			documents.push(to_document(item, idx)?);
		}

		Ok(documents)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const THREE_IN_ARRAY: &str = r#"[
            {"name": "Alice"},
            {"name": "Bob"},
            {"name": "Carol"}
        ]"#;

	#[rstest]
	fn test_parse_single_line_document() {
		let parser = FixtureParser::new();
		let documents = parser
			.parse_str(r#"{"name": "Alice", "age": 30}"#, ImportMode::Lines)
			.unwrap();
		assert_eq!(documents.len(), 1);
		assert_eq!(documents[0].get_str("name").unwrap(), "Alice");
	}

	#[rstest]
	fn test_parse_lines_keeps_order() {
		let parser = FixtureParser::new();
		let content = "{\"n\": \"one\"}\n{\"n\": \"two\"}\n\n   {\"n\": \"three\"}";
		let documents = parser.parse_str(content, ImportMode::Lines).unwrap();
		let values: Vec<&str> = documents.iter().map(|d| d.get_str("n").unwrap()).collect();
		assert_eq!(values, vec!["one", "two", "three"]);
	}

	#[rstest]
	fn test_parse_lines_accepts_pretty_printed_documents() {
		let parser = FixtureParser::new();
		let content = "{\n  \"n\": 1\n}\n{\n  \"n\": 2\n}\n";
		let documents = parser.parse_str(content, ImportMode::Lines).unwrap();
		assert_eq!(documents.len(), 2);
	}

	#[rstest]
	fn test_parse_lines_empty_content() {
		let parser = FixtureParser::new();
		let documents = parser.parse_str("  \n", ImportMode::Lines).unwrap();
		assert!(documents.is_empty());
	}

	#[rstest]
	fn test_parse_lines_rejects_array() {
		let parser = FixtureParser::new();
		let result = parser.parse_str(THREE_IN_ARRAY, ImportMode::Lines);
		match result {
			Err(SeedingError::Parse(message)) => assert!(message.contains("array mode")),
			other => panic!("Expected Parse error, got {:?}", other),
		}
	}

	#[rstest]
	fn test_parse_lines_rejects_truncated_document() {
		let parser = FixtureParser::new();
		let result = parser.parse_str("{\"n\": 1}\n{\"n\": ", ImportMode::Lines);
		assert!(matches!(result, Err(SeedingError::Parse(_))));
	}

	#[rstest]
	fn test_parse_array() {
		let parser = FixtureParser::new();
		let documents = parser.parse_str(THREE_IN_ARRAY, ImportMode::Array).unwrap();
		assert_eq!(documents.len(), 3);
		assert_eq!(documents[2].get_str("name").unwrap(), "Carol");
	}

	#[rstest]
	fn test_parse_array_rejects_single_object() {
		let parser = FixtureParser::new();
		let result = parser.parse_str(r#"{"name": "Alice"}"#, ImportMode::Array);
		match result {
			Err(SeedingError::Parse(message)) => assert!(message.contains("an object")),
			other => panic!("Expected Parse error, got {:?}", other),
		}
	}

	#[rstest]
	fn test_parse_array_rejects_non_object_element() {
		let parser = FixtureParser::new();
		let result = parser.parse_str(r#"[{"name": "Alice"}, "Bob"]"#, ImportMode::Array);
		match result {
			Err(SeedingError::Parse(message)) => assert!(message.contains("Document 1")),
			other => panic!("Expected Parse error, got {:?}", other),
		}
	}
}
