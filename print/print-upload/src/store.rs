//! Storage and ledger seams.
//!
//! The orchestrator talks to durable storage and to the upload ledger
//! through these traits so tests can script failures and timing
//! deterministically, and so the HTTP implementation stays swappable.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TransferResult;

/// Callback invoked with the cumulative byte count of the current
/// transfer as chunks are confirmed sent.
pub type ProgressSink = Arc<dyn Fn(u64) + Send + Sync>;

/// A durably stored upload, as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Ledger record identifier.
    pub id: String,
    /// Storage key the bytes live under.
    pub key: String,
    /// Public or presigned URL for later retrieval.
    pub url: String,
}

/// Presigned context for one multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MultipartTicket {
    /// Provider-issued upload identifier.
    pub upload_id: String,
    /// One presigned URL per part, in part order.
    pub part_urls: Vec<String>,
}

/// One finished part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedPart {
    /// 1-based part number.
    pub part_number: u32,
    /// Entity tag returned by the storage provider.
    pub etag: String,
}

/// Durable byte storage.
///
/// Three paths with different size/latency tradeoffs: presigned direct
/// PUT, sequential multipart, and a server-proxied fallback for when a
/// direct PUT is blocked.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Obtain a presigned URL for a single-request PUT of `key`.
    async fn presign_put(&self, key: &str) -> TransferResult<String>;

    /// Obtain a multipart ticket for `key` with `parts` presigned part
    /// URLs.
    async fn presign_multipart(&self, key: &str, parts: u32) -> TransferResult<MultipartTicket>;

    /// PUT `data` to a presigned `url`, reporting cumulative progress.
    ///
    /// Returns the entity tag of the stored bytes.
    async fn put(&self, url: &str, data: Bytes, progress: ProgressSink) -> TransferResult<String>;

    /// Complete a multipart upload from its ordered parts.
    async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> TransferResult<()>;

    /// Upload `data` through the application server instead of
    /// directly to storage. Creates the ledger record server-side.
    async fn proxy_upload(&self, file_name: &str, data: Bytes) -> TransferResult<StoredObject>;
}

/// The upload ledger: durable records of stored files.
#[allow(async_fn_in_trait)]
pub trait UploadLedger {
    /// Look up an existing record for an identical prior upload.
    async fn find_existing(&self, file_name: &str, size: u64)
        -> TransferResult<Option<StoredObject>>;

    /// Record a freshly stored object.
    async fn create_record(
        &self,
        file_name: &str,
        size: u64,
        key: &str,
    ) -> TransferResult<StoredObject>;
}
