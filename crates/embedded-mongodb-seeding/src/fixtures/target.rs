//! Destinations for imported fixture documents.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::Collection;
use mongodb::bson::Document;
use parking_lot::Mutex;

use crate::error::{SeedingError, SeedingResult};

/// A collection that accepts fixture documents one at a time.
///
/// The importer calls [`insert`](FixtureTarget::insert) once per document in
/// source order and stops at the first error.
#[async_trait]
pub trait FixtureTarget: Send + Sync {
	/// Inserts a single document.
	async fn insert(&self, document: Document) -> SeedingResult<()>;
}

#[async_trait]
impl FixtureTarget for Collection<Document> {
	async fn insert(&self, document: Document) -> SeedingResult<()> {
		self.insert_one(document).await.map_err(|e| {
			SeedingError::Database(format!(
				"Failed to insert into {}.{}: {}",
				self.namespace().db,
				self.name(),
				e
			))
		})?;
		Ok(())
	}
}

#[async_trait]
impl<T: FixtureTarget + ?Sized> FixtureTarget for Arc<T> {
	async fn insert(&self, document: Document) -> SeedingResult<()> {
		(**self).insert(document).await
	}
}

/// In-memory fixture target.
///
/// Keeps inserted documents in order. Clones share the same storage, so a
/// clone handed to an importer can be inspected afterwards.
///
/// # Example
///
/// ```
/// use embedded_mongodb_seeding::fixtures::{FixtureTarget, MemoryTarget};
/// use mongodb::bson::doc;
///
/// # block_on(async {
/// let target = MemoryTarget::new();
/// target.insert(doc! { "name": "Alice" }).await.unwrap();
/// assert_eq!(target.len(), 1);
/// # });
/// # fn block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
	documents: Arc<Mutex<Vec<Document>>>,
	fail_after: Option<usize>,
}

impl MemoryTarget {
	/// Creates an empty target.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a target that rejects every insert once `accepted` documents
	/// have been stored.
	pub fn failing_after(accepted: usize) -> Self {
		Self {
			documents: Arc::default(),
			fail_after: Some(accepted),
		}
	}

	/// Returns a copy of the stored documents.
	pub fn documents(&self) -> Vec<Document> {
		self.documents.lock().clone()
	}

	/// Returns the number of stored documents.
	pub fn len(&self) -> usize {
		self.documents.lock().len()
	}

	/// Returns true if nothing has been stored.
	pub fn is_empty(&self) -> bool {
		self.documents.lock().is_empty()
	}
}

#[async_trait]
impl FixtureTarget for MemoryTarget {
	async fn insert(&self, document: Document) -> SeedingResult<()> {
		let mut documents = self.documents.lock();
		if self.fail_after.is_some_and(|limit| documents.len() >= limit) {
			return Err(SeedingError::Database(format!(
				"Memory target rejected document {}",
				documents.len()
			)));
		}
		documents.push(document);
		Ok(())
	}
}
