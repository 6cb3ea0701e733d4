//! Client-side upload orchestration.
//!
//! Drives one file at a time through the pipeline
//!
//! ```text
//! idle → analyzing → pending → uploading → finalizing → ready
//! ```
//!
//! with `pending → uploading` retryable: any network-class failure
//! returns the session to `pending` (keeping the parsed preview and
//! metrics) rather than `idle`, so the user can retry without
//! re-uploading from scratch.
//!
//! Storage and record-keeping are opaque collaborators behind the
//! [`ObjectStore`] and [`UploadLedger`] traits: a presigned direct PUT
//! for small files, sequential multipart for large ones, and a
//! server-proxied fallback when a direct PUT is rejected. The
//! orchestrator treats all three as one logical "durably store these
//! bytes, get back a key" capability with different size/latency
//! tradeoffs.
//!
//! Retries are bounded (2) with exponential backoff (2 s doubling,
//! capped at 10 s) and a live countdown; a stall watchdog aborts
//! transfers that stop reporting progress. Progress snapshots are
//! published through a [`tokio::sync::watch`] channel.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod http;
mod orchestrator;
mod session;
mod store;

pub use error::{TransferError, TransferResult};
pub use http::HttpObjectStore;
pub use orchestrator::{UploadConfig, UploadOrchestrator};
pub use session::{UploadSession, UploadStatus};
pub use store::{CompletedPart, MultipartTicket, ObjectStore, ProgressSink, StoredObject, UploadLedger};
