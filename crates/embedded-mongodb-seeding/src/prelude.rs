//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use embedded_mongodb_seeding::prelude::*;
//! ```

pub use crate::error::{SeedingError, SeedingResult};
pub use crate::fixtures::{FixtureImporter, FixtureParser, FixtureTarget, ImportMode, MemoryTarget};
