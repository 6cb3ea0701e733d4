//! The document-store seam.

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a document store backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No document matched.
    #[error("no document found in {collection}")]
    NotFound {
        /// The collection that was queried.
        collection: String,
    },

    /// The backend failed (connection, serialization, constraint).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable document persistence.
///
/// Documents are schemaless [`serde_json::Value`] maps; collections
/// are named by string. Implementations sit in front of whatever
/// backend the deployment uses.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Find documents in `collection` matching `filter` (equality on
    /// the filter's top-level fields).
    async fn find(&self, collection: &str, filter: &Value) -> StoreResult<Vec<Value>>;

    /// Create a document, returning it with its assigned id.
    async fn create(&self, collection: &str, data: Value) -> StoreResult<Value>;

    /// Update the document with `id`, returning the updated document.
    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Value>;
}
