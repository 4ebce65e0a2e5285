//! Fixture import against the bundled fixture files.

use std::path::PathBuf;

use embedded_mongodb_seeding::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn importer() -> FixtureImporter {
	FixtureImporter::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

#[rstest]
#[case::single("single_document.json", ImportMode::Lines, 1)]
#[case::multiple("multiple_documents.json", ImportMode::Lines, 2)]
#[case::array("multiple_documents_array.json", ImportMode::Array, 3)]
#[tokio::test]
async fn test_import_counts(
	importer: FixtureImporter,
	#[case] file: &str,
	#[case] mode: ImportMode,
	#[case] expected: usize,
) {
	let target = MemoryTarget::new();

	let inserted = importer.import(file, mode, &target).await.unwrap();

	assert_eq!(inserted, expected);
	assert_eq!(target.len(), expected);
}

#[rstest]
#[tokio::test]
async fn test_import_preserves_file_order(importer: FixtureImporter) {
	let target = MemoryTarget::new();

	importer
		.import("multiple_documents_array.json", ImportMode::Array, &target)
		.await
		.unwrap();

	let names: Vec<String> = target
		.documents()
		.iter()
		.map(|d| d.get_str("name").unwrap().to_string())
		.collect();
	assert_eq!(names, vec!["Ada Lovelace", "Alan Turing", "Grace Hopper"]);
	assert!(target.documents()[2].get_object_id("_id").is_ok());
}

#[rstest]
#[tokio::test]
async fn test_array_file_in_default_mode_fails(importer: FixtureImporter) {
	let target = MemoryTarget::new();

	let result = importer
		.import(
			"multiple_documents_array.json",
			ImportMode::default(),
			&target,
		)
		.await;

	assert!(matches!(result, Err(SeedingError::Parse(_))));
	assert!(target.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_line_file_in_array_mode_fails(importer: FixtureImporter) {
	let target = MemoryTarget::new();

	let result = importer
		.import("multiple_documents.json", ImportMode::Array, &target)
		.await;

	assert!(matches!(result, Err(SeedingError::Parse(_))));
	assert!(target.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_missing_file(importer: FixtureImporter) {
	let target = MemoryTarget::new();

	let error = importer
		.import("non_existent_file.json", ImportMode::Lines, &target)
		.await
		.unwrap_err();

	assert_eq!(
		error.to_string(),
		"Could not find file: non_existent_file.json"
	);
}
