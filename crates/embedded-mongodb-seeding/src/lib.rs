//! JSON fixture import for embedded MongoDB test instances.
//!
//! Fixture files come in two layouts:
//!
//! - **Line mode** (default): one JSON document per line, the layout
//!   `mongoimport` reads without `--jsonArray`
//! - **Array mode**: a single top-level JSON array of documents
//!
//! Loading a fixture into a collection:
//!
//! ```ignore
//! use embedded_mongodb_seeding::prelude::*;
//!
//! let importer = FixtureImporter::new("tests/fixtures");
//! let collection = client
//!     .database("local")
//!     .collection::<mongodb::bson::Document>("embedded-test-collection");
//! let inserted = importer
//!     .import("users.json", ImportMode::Lines, &collection)
//!     .await?;
//! ```
//!
//! A file whose content does not match the selected layout is rejected as a
//! whole: an array fed to line mode fails with [`SeedingError::Parse`] and
//! inserts nothing.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod fixtures;
pub mod prelude;

pub use error::{SeedingError, SeedingResult};
pub use fixtures::{FixtureImporter, FixtureParser, FixtureTarget, ImportMode, MemoryTarget};
