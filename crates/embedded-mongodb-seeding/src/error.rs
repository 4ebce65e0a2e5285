//! Error types for fixture import.

use thiserror::Error;

/// Errors that can occur while importing fixture data.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// Fixture file does not exist. Holds the path as it was requested.
	#[error("Could not find file: {0}")]
	FileNotFound(String),

	/// Fixture content does not have the shape the import mode expects.
	#[error("Parse error: {0}")]
	Parse(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The target collection rejected a document.
	#[error("Database error: {0}")]
	Database(String),
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_file_not_found_message() {
		let error = SeedingError::FileNotFound("non_existent_file.json".to_string());
		assert_eq!(
			error.to_string(),
			"Could not find file: non_existent_file.json"
		);
	}

	#[rstest]
	fn test_io_error_from() {
		let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
		let seeding_error: SeedingError = io_error.into();
		assert!(matches!(seeding_error, SeedingError::Io(_)));
	}
}
