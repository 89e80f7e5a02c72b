//! Document store abstraction for the comic catalog.
//!
//! Records are schemaless JSON objects. A store assigns `id` and `createdAt`
//! on insert and answers conjunctive [`Predicate`] queries with optional
//! ordering and offset/limit.

mod error;
mod memory;
mod predicate;

use async_trait::async_trait;

pub use error::{StoreError, StoreResult};
pub use memory::{read_seed_file, MemoryStore};
pub use predicate::{Condition, FindOptions, Operator, Predicate, SortDirection, SortOrder};

/// A stored JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "id";
/// Field holding the store-assigned creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Persistence backend for a single collection of documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `predicate`, ordered and sliced by `options`.
    async fn find(&self, predicate: &Predicate, options: &FindOptions)
        -> StoreResult<Vec<Document>>;

    /// First document in store order matching `predicate`.
    async fn find_one(&self, predicate: &Predicate) -> StoreResult<Option<Document>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Document>>;

    /// Persist a new document, returning it with `id` and `createdAt` set.
    async fn insert(&self, document: Document) -> StoreResult<Document>;

    /// Replace the document at `id`, keeping its `id` and `createdAt`.
    /// Returns `None` when nothing is stored at `id`.
    async fn replace_by_id(&self, id: &str, document: Document) -> StoreResult<Option<Document>>;

    /// Remove the document at `id`, returning it if it existed.
    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Document>>;

    async fn count(&self, predicate: &Predicate) -> StoreResult<u64>;
}
