//! End-to-end tests against a real `mongod`.
//!
//! Ignored by default. Run with a MongoDB server binary on `PATH` (or named by
//! `EMBEDDED_MONGODB_BINARY`):
//!
//! ```text
//! cargo test --test embedded_mongodb -- --ignored
//! ```

use std::path::Path;

use embedded_mongodb::prelude::*;
use mongodb::Client;
use mongodb::bson::{Document, doc};
use rstest::{fixture, rstest};
use serial_test::serial;

const PORT: u16 = 27117;

#[fixture]
fn settings() -> MongodSettings {
	init_test_logging();
	let fixtures = Path::new(env!("CARGO_MANIFEST_DIR"))
		.join("crates/embedded-mongodb-seeding/tests/fixtures");
	MongodSettings::from_env().unwrap().with_fixtures_root(fixtures)
}

async fn count(mongo: &EmbeddedMongoDb) -> u64 {
	let endpoint = mongo.endpoint().unwrap();
	let client = Client::with_uri_str(endpoint.connection_string())
		.await
		.unwrap();
	client
		.database("local")
		.collection::<Document>("embedded-test-collection")
		.count_documents(doc! {})
		.await
		.unwrap()
}

fn markers(import: Option<&str>) -> RunConfig {
	let port = format!("port={PORT}");
	let mut markers = vec![port.as_str()];
	markers.extend(import);
	RunConfig::parse(&markers).unwrap()
}

#[rstest]
#[serial(mongod)]
#[tokio::test]
#[ignore = "requires a local mongod binary"]
async fn test_skip_does_not_start(settings: MongodSettings) {
	let mut mongo = EmbeddedMongoDb::new(settings);

	mongo.on_test_start(&RunConfig::skipped()).await.unwrap();

	assert!(!mongo.is_running());
	assert_eq!(mongo.readiness_signal(), None);
	mongo.on_test_end().await;
}

#[rstest]
#[serial(mongod)]
#[tokio::test]
#[ignore = "requires a local mongod binary"]
async fn test_start_accepts_connections(settings: MongodSettings) {
	let mut mongo = EmbeddedMongoDb::new(settings);

	mongo.on_test_start(&markers(None)).await.unwrap();

	let endpoint = mongo.endpoint().unwrap();
	assert_eq!(endpoint.port(), PORT);
	let client = Client::with_uri_str(endpoint.connection_string())
		.await
		.unwrap();
	let pong = client
		.database("admin")
		.run_command(doc! { "ping": 1 })
		.await
		.unwrap();
	assert!(pong.contains_key("ok"));

	mongo.on_test_end().await;
	assert!(!mongo.is_running());
}

#[rstest]
#[case::single_document("importFrom=single_document.json", 1)]
#[case::multiple_documents("importFrom=multiple_documents.json", 2)]
#[case::array("importFrom=multiple_documents_array.json, arrayMode=true", 3)]
#[serial(mongod)]
#[tokio::test]
#[ignore = "requires a local mongod binary"]
async fn test_import_fixture(
	settings: MongodSettings,
	#[case] marker: &str,
	#[case] expected: u64,
) {
	let mut mongo = EmbeddedMongoDb::new(settings);

	mongo.on_test_start(&markers(Some(marker))).await.unwrap();

	assert_eq!(count(&mongo).await, expected);
	mongo.on_test_end().await;
}

#[rstest]
#[serial(mongod)]
#[tokio::test]
#[ignore = "requires a local mongod binary"]
async fn test_array_fixture_without_array_mode(settings: MongodSettings) {
	let mut mongo = EmbeddedMongoDb::new(settings);

	let result = mongo
		.on_test_start(&markers(Some("importFrom=multiple_documents_array.json")))
		.await;

	assert!(matches!(
		result,
		Err(LifecycleError::Seeding(SeedingError::Parse(_)))
	));
	assert_eq!(count(&mongo).await, 0);
	mongo.on_test_end().await;
}

#[rstest]
#[serial(mongod)]
#[tokio::test]
#[ignore = "requires a local mongod binary"]
async fn test_missing_fixture(settings: MongodSettings) {
	let config = markers(Some("importFrom=non_existent_file.json"));

	let error = with_embedded_mongodb(settings, &config, |_ctx| async {})
		.await
		.unwrap_err();

	assert_eq!(error.to_string(), "Could not find file: non_existent_file.json");
}
