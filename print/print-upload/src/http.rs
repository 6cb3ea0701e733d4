//! HTTP-backed storage and ledger client.
//!
//! Talks to the application server for presigning, proxying and ledger
//! records, and directly to object storage for the presigned PUTs.

use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{TransferError, TransferResult};
use crate::store::{
    CompletedPart, MultipartTicket, ObjectStore, ProgressSink, StoredObject, UploadLedger,
};

// Streamed PUT bodies are fed to the transport in chunks of this size
// so the progress callback ticks at a useful granularity.
const STREAM_CHUNK: usize = 64 * 1024;

/// [`ObjectStore`] and [`UploadLedger`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PresignResponse {
    url: String,
}

impl HttpObjectStore {
    /// Create a client rooted at `base_url` (no trailing slash needed).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport_error(err: reqwest::Error) -> TransferError {
    if err.is_timeout() {
        TransferError::Timeout
    } else {
        TransferError::Network(err.to_string())
    }
}

async fn reject_on_error(resp: reqwest::Response) -> TransferResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(TransferError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl ObjectStore for HttpObjectStore {
    async fn presign_put(&self, key: &str) -> TransferResult<String> {
        let resp = self
            .client
            .get(self.endpoint("/api/uploads/presign"))
            .query(&[("key", key)])
            .send()
            .await
            .map_err(transport_error)?;
        let resp = reject_on_error(resp).await?;
        let presigned: PresignResponse = resp.json().await.map_err(transport_error)?;
        Ok(presigned.url)
    }

    async fn presign_multipart(&self, key: &str, parts: u32) -> TransferResult<MultipartTicket> {
        let resp = self
            .client
            .post(self.endpoint("/api/uploads/multipart"))
            .json(&json!({ "key": key, "parts": parts }))
            .send()
            .await
            .map_err(transport_error)?;
        let resp = reject_on_error(resp).await?;
        resp.json().await.map_err(transport_error)
    }

    async fn put(&self, url: &str, data: Bytes, progress: ProgressSink) -> TransferResult<String> {
        let total = data.len();
        let chunks: Vec<Bytes> = data.chunks(STREAM_CHUNK).map(Bytes::copy_from_slice).collect();
        let mut sent = 0u64;
        let body = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            progress(sent);
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let resp = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await
            .map_err(transport_error)?;
        let resp = reject_on_error(resp).await?;

        let etag = resp
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .trim_matches('"')
            .to_owned();
        debug!(bytes = total, "put complete");
        Ok(etag)
    }

    async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> TransferResult<()> {
        let resp = self
            .client
            .post(self.endpoint("/api/uploads/multipart/complete"))
            .json(&json!({ "key": key, "upload_id": upload_id, "parts": parts }))
            .send()
            .await
            .map_err(transport_error)?;
        reject_on_error(resp).await?;
        Ok(())
    }

    async fn proxy_upload(&self, file_name: &str, data: Bytes) -> TransferResult<StoredObject> {
        let resp = self
            .client
            .post(self.endpoint("/api/uploads/proxy"))
            .query(&[("name", file_name)])
            .body(data)
            .send()
            .await
            .map_err(transport_error)?;
        let resp = reject_on_error(resp).await?;
        resp.json().await.map_err(transport_error)
    }
}

impl UploadLedger for HttpObjectStore {
    async fn find_existing(
        &self,
        file_name: &str,
        size: u64,
    ) -> TransferResult<Option<StoredObject>> {
        let resp = self
            .client
            .get(self.endpoint("/api/uploads"))
            .query(&[("file_name", file_name), ("size", &size.to_string())])
            .send()
            .await
            .map_err(transport_error)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = reject_on_error(resp).await?;
        let object: StoredObject = resp.json().await.map_err(transport_error)?;
        Ok(Some(object))
    }

    async fn create_record(
        &self,
        file_name: &str,
        size: u64,
        key: &str,
    ) -> TransferResult<StoredObject> {
        let resp = self
            .client
            .post(self.endpoint("/api/uploads"))
            .json(&json!({ "file_name": file_name, "size": size, "key": key }))
            .send()
            .await
            .map_err(transport_error)?;
        let resp = reject_on_error(resp).await?;
        resp.json().await.map_err(transport_error)
    }
}
