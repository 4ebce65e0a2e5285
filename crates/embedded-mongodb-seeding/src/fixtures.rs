//! Fixture parsing and import.
//!
//! - [`ImportMode`] - line-delimited documents or a single JSON array
//! - [`FixtureParser`] - turns fixture content into BSON documents
//! - [`FixtureTarget`] - where parsed documents are inserted
//! - [`FixtureImporter`] - resolves a fixture file and imports it

mod format;
mod importer;
mod parser;
mod target;

pub use format::ImportMode;
pub use importer::{DEFAULT_FIXTURES_ROOT, FixtureImporter};
pub use parser::FixtureParser;
pub use target::{FixtureTarget, MemoryTarget};
