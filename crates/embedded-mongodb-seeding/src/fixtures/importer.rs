//! Fixture import into a target collection.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{FixtureParser, FixtureTarget, ImportMode};
use crate::error::{SeedingError, SeedingResult};

/// Default directory fixture paths are resolved against.
pub const DEFAULT_FIXTURES_ROOT: &str = "tests/fixtures";

/// Reads fixture files and inserts their documents into a [`FixtureTarget`].
///
/// # Example
///
/// ```ignore
/// use embedded_mongodb_seeding::fixtures::{FixtureImporter, ImportMode};
///
/// let importer = FixtureImporter::new("tests/fixtures");
/// let inserted = importer
///     .import("users.json", ImportMode::Array, &collection)
///     .await?;
/// println!("Imported {} documents", inserted);
/// ```
#[derive(Debug, Clone)]
pub struct FixtureImporter {
	root: PathBuf,
	parser: FixtureParser,
}

impl Default for FixtureImporter {
	fn default() -> Self {
		Self::new(DEFAULT_FIXTURES_ROOT)
	}
}

impl FixtureImporter {
	/// Creates an importer resolving relative paths against `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			parser: FixtureParser::new(),
		}
	}

	/// Returns the fixtures root directory.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves a fixture path against the fixtures root.
	///
	/// Absolute paths are returned unchanged.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::FileNotFound`] carrying `path` exactly as given
	/// when the resolved file does not exist.
	pub fn resolve(&self, path: &str) -> SeedingResult<PathBuf> {
		let candidate = Path::new(path);
		let resolved = if candidate.is_absolute() {
			candidate.to_path_buf()
		} else {
			self.root.join(candidate)
		};

		if resolved.is_file() {
			Ok(resolved)
		} else {
			Err(SeedingError::FileNotFound(path.to_string()))
		}
	}

	/// Imports every document of the fixture at `path` into `target`.
	///
	/// The whole file is parsed before the first insert, so content with the
	/// wrong shape for `mode` inserts nothing. Documents are then inserted in
	/// file order; the first failed insert aborts the import and earlier
	/// inserts are kept.
	///
	/// # Returns
	///
	/// The number of inserted documents.
	///
	/// # Errors
	///
	/// - [`SeedingError::FileNotFound`] if the file does not exist
	/// - [`SeedingError::Parse`] if the content does not match `mode`
	/// - [`SeedingError::Io`] if the file cannot be read
	/// - [`SeedingError::Database`] if the target rejects a document
	pub async fn import<T>(&self, path: &str, mode: ImportMode, target: &T) -> SeedingResult<usize>
	where
		T: FixtureTarget + ?Sized,
	{
		let resolved = self.resolve(path)?;
		let content = tokio::fs::read_to_string(&resolved).await.map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				SeedingError::FileNotFound(path.to_string())
			} else {
				SeedingError::Io(e)
			}
		})?;

		let documents = self.parser.parse_str(&content, mode)?;
		debug!(
			"Importing {} document(s) from {} in {} mode",
			documents.len(),
			resolved.display(),
			mode
		);

		let mut inserted = 0;
		for document in documents {
			target.insert(document).await?;
			inserted += 1;
		}

		debug!("Imported {} document(s) from {}", inserted, path);
		Ok(inserted)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::MemoryTarget;
	use rstest::{fixture, rstest};
	use std::io::Write;
	use tempfile::TempDir;

	#[fixture]
	fn fixtures_dir() -> TempDir {
		let dir = tempfile::tempdir().unwrap();
		let mut lines = std::fs::File::create(dir.path().join("lines.json")).unwrap();
		writeln!(lines, r#"{{"name": "Alice"}}"#).unwrap();
		writeln!(lines, r#"{{"name": "Bob"}}"#).unwrap();
		let mut array = std::fs::File::create(dir.path().join("array.json")).unwrap();
		writeln!(
			array,
			r#"[{{"name": "Alice"}}, {{"name": "Bob"}}, {{"name": "Carol"}}]"#
		)
		.unwrap();
		dir
	}

	#[rstest]
	fn test_resolve_relative_path(fixtures_dir: TempDir) {
		let importer = FixtureImporter::new(fixtures_dir.path());
		let resolved = importer.resolve("lines.json").unwrap();
		assert_eq!(resolved, fixtures_dir.path().join("lines.json"));
	}

	#[rstest]
	fn test_resolve_absolute_path(fixtures_dir: TempDir) {
		let importer = FixtureImporter::new("/does/not/matter");
		let absolute = fixtures_dir.path().join("array.json");
		let resolved = importer.resolve(absolute.to_str().unwrap()).unwrap();
		assert_eq!(resolved, absolute);
	}

	#[rstest]
	fn test_resolve_rejects_directories(fixtures_dir: TempDir) {
		let importer = FixtureImporter::new(fixtures_dir.path());
		let result = importer.resolve(".");
		assert!(matches!(result, Err(SeedingError::FileNotFound(_))));
	}

	#[rstest]
	fn test_default_root() {
		let importer = FixtureImporter::default();
		assert_eq!(importer.root(), Path::new(DEFAULT_FIXTURES_ROOT));
	}

	#[rstest]
	#[tokio::test]
	async fn test_import_lines(fixtures_dir: TempDir) {
		let importer = FixtureImporter::new(fixtures_dir.path());
		let target = MemoryTarget::new();

		let inserted = importer
			.import("lines.json", ImportMode::Lines, &target)
			.await
			.unwrap();

		assert_eq!(inserted, 2);
		assert_eq!(target.len(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_import_array_in_line_mode_inserts_nothing(fixtures_dir: TempDir) {
		let importer = FixtureImporter::new(fixtures_dir.path());
		let target = MemoryTarget::new();

		let result = importer
			.import("array.json", ImportMode::Lines, &target)
			.await;

		assert!(matches!(result, Err(SeedingError::Parse(_))));
		assert!(target.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_import_stops_at_first_rejected_insert(fixtures_dir: TempDir) {
		let importer = FixtureImporter::new(fixtures_dir.path());
		let target = MemoryTarget::failing_after(2);

		let result = importer
			.import("array.json", ImportMode::Array, &target)
			.await;

		assert!(matches!(result, Err(SeedingError::Database(_))));
		let names: Vec<String> = target
			.documents()
			.iter()
			.map(|d| d.get_str("name").unwrap().to_string())
			.collect();
		assert_eq!(names, vec!["Alice", "Bob"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_import_missing_file(fixtures_dir: TempDir) {
		let importer = FixtureImporter::new(fixtures_dir.path());
		let target = MemoryTarget::new();

		let error = importer
			.import("non_existent_file.json", ImportMode::Lines, &target)
			.await
			.unwrap_err();

		assert!(matches!(error, SeedingError::FileNotFound(_)));
		assert_eq!(
			error.to_string(),
			"Could not find file: non_existent_file.json"
		);
	}
}
