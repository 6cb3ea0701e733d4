//! The upload state machine.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use print_analyze::analyze_geometry;
use print_types::{MeshGeometry, SourceUnit};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{TransferError, TransferResult};
use crate::session::{UploadSession, UploadStatus};
use crate::store::{CompletedPart, ObjectStore, ProgressSink, StoredObject, UploadLedger};

/// Tuning knobs for the orchestrator.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Payloads at or above this size go through multipart.
    pub multipart_threshold: u64,
    /// Multipart part size in bytes.
    pub part_size: u64,
    /// Largest payload the server-proxied fallback will carry.
    pub proxy_max_bytes: u64,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// First backoff delay; doubles per retry.
    pub backoff_base: Duration,
    /// Upper bound on any backoff delay.
    pub backoff_cap: Duration,
    /// Idle time before a transfer is flagged as stalled.
    pub stall_warn: Duration,
    /// Idle time before a stalled transfer is aborted.
    pub stall_abort: Duration,
    /// Deadline for presign, complete and ledger calls.
    pub op_timeout: Duration,
    /// Doubles the stall windows for throttled or sleepy devices.
    pub low_power: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            multipart_threshold: 32 * 1024 * 1024,
            part_size: 8 * 1024 * 1024,
            proxy_max_bytes: 12 * 1024 * 1024,
            max_retries: 2,
            backoff_base: Duration::from_secs(2),
            backoff_cap: Duration::from_secs(10),
            stall_warn: Duration::from_secs(10),
            stall_abort: Duration::from_secs(30),
            op_timeout: Duration::from_secs(15),
            low_power: false,
        }
    }
}

impl UploadConfig {
    fn stall_warn_window(&self) -> Duration {
        if self.low_power {
            self.stall_warn * 2
        } else {
            self.stall_warn
        }
    }

    fn stall_abort_window(&self) -> Duration {
        if self.low_power {
            self.stall_abort * 2
        } else {
            self.stall_abort
        }
    }
}

/// How one successful transfer produced a durable object.
enum TransferOutcome {
    /// Bytes landed under a key; the ledger record is still ours to
    /// write.
    Key,
    /// The proxy path stored bytes and wrote the record in one shot.
    Stored(StoredObject),
}

struct Inner {
    session: UploadSession,
    payload: Option<Bytes>,
}

// Last observed progress of the in-flight PUT, shared between the
// progress sink and the watchdog.
struct ProgressPoint {
    at: Instant,
    bytes: u64,
}

/// Drives one file at a time from selection to durable storage.
///
/// All methods take `&self`; the session lives behind interior
/// mutability and every meaningful change is published through a watch
/// channel. Selecting a new file supersedes any in-flight upload: the
/// old transfer observes the generation change and aborts without
/// touching the new session.
pub struct UploadOrchestrator<S, L> {
    store: S,
    ledger: L,
    config: UploadConfig,
    inner: Mutex<Inner>,
    generation: AtomicU64,
    events: watch::Sender<UploadSession>,
}

impl<S: ObjectStore, L: UploadLedger> UploadOrchestrator<S, L> {
    /// Create an idle orchestrator over the given collaborators.
    pub fn new(store: S, ledger: L, config: UploadConfig) -> Self {
        let (events, _) = watch::channel(UploadSession::default());
        Self {
            store,
            ledger,
            config,
            inner: Mutex::new(Inner {
                session: UploadSession::default(),
                payload: None,
            }),
            generation: AtomicU64::new(0),
            events,
        }
    }

    /// Subscribe to session snapshots.
    pub fn subscribe(&self) -> watch::Receiver<UploadSession> {
        self.events.subscribe()
    }

    /// The current session snapshot.
    #[must_use]
    pub fn session(&self) -> UploadSession {
        self.lock().session.clone()
    }

    /// Select a file, superseding any in-flight upload.
    ///
    /// `geometry` is the parsed mesh, or `None` when parsing failed;
    /// a parse failure drops the session back to idle with an error,
    /// while a parsed file is measured and parked in `pending` until
    /// [`start_upload`](Self::start_upload) is called.
    pub fn select_file(
        &self,
        file_name: &str,
        data: Bytes,
        geometry: Option<&MeshGeometry>,
        unit: SourceUnit,
    ) -> UploadSession {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let size = data.len() as u64;
        {
            let mut inner = self.lock();
            inner.payload = None;
            inner.session = UploadSession {
                status: UploadStatus::Analyzing,
                file_name: Some(file_name.to_owned()),
                file_size: size,
                ..UploadSession::default()
            };
            self.events.send_replace(inner.session.clone());
        }

        let mut inner = self.lock();
        match geometry {
            Some(mesh) => {
                let metrics = analyze_geometry(mesh, unit);
                debug!(file_name, size, "file analyzed");
                inner.payload = Some(data);
                inner.session.metrics = Some(metrics);
                inner.session.status = UploadStatus::Pending;
            }
            None => {
                warn!(file_name, "could not parse model file");
                inner.session.status = UploadStatus::Idle;
                inner.session.error = Some("could not parse model file".to_owned());
            }
        }
        self.events.send_replace(inner.session.clone());
        inner.session.clone()
    }

    /// Discard the current selection and any in-flight upload.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.lock();
        inner.payload = None;
        inner.session = UploadSession::default();
        self.events.send_replace(inner.session.clone());
    }

    /// Upload the pending file to durable storage.
    ///
    /// Checks the ledger for an identical prior upload first; on a hit
    /// the stored object is reused without moving any bytes. Transient
    /// failures are retried up to the configured budget with doubling
    /// backoff and a per-second countdown; when the budget runs out
    /// the session returns to `pending` with the failure recorded, so
    /// a manual retry needs no re-analysis.
    ///
    /// # Errors
    ///
    /// Returns the last transfer failure once the retry budget is
    /// exhausted, [`TransferError::Aborted`] when a newer selection
    /// superseded this upload, and a 409 rejection when no file is
    /// pending.
    pub async fn start_upload(&self) -> TransferResult<StoredObject> {
        let generation = self.generation.load(Ordering::SeqCst);
        let (file_name, size, data) = {
            let inner = self.lock();
            if inner.session.status != UploadStatus::Pending {
                return Err(TransferError::Rejected {
                    status: 409,
                    message: "no upload is pending".to_owned(),
                });
            }
            let name = inner
                .session
                .file_name
                .clone()
                .unwrap_or_else(|| "model".to_owned());
            let payload = inner.payload.clone().ok_or(TransferError::Rejected {
                status: 409,
                message: "pending session has no payload".to_owned(),
            })?;
            (name, inner.session.file_size, payload)
        };

        self.update(|s| {
            s.status = UploadStatus::Uploading;
            s.error = None;
            s.bytes_sent = 0;
            s.attempt = 0;
            s.stalled = false;
            s.retry_in_secs = None;
        });

        // Dedup: an identical prior upload short-circuits the transfer.
        // Lookup failures never block the upload itself.
        match self.op(self.ledger.find_existing(&file_name, size)).await {
            Ok(Some(existing)) => {
                info!(key = %existing.key, "reusing identical prior upload");
                self.finish(existing.clone());
                return Ok(existing);
            }
            Ok(None) => {}
            Err(err) => debug!(error = %err, "dedup lookup failed, uploading anyway"),
        }

        let key = object_key(&file_name, size);
        let mut attempt = 0u32;
        let outcome = loop {
            attempt += 1;
            self.update(|s| {
                s.status = UploadStatus::Uploading;
                s.attempt = attempt;
                s.bytes_sent = 0;
                s.stalled = false;
                s.speed_bps = None;
            });
            self.check_generation(generation)?;
            match self.transfer_once(&key, &file_name, &data, generation).await {
                Ok(outcome) => break outcome,
                Err(err) if err.is_retryable() && attempt <= self.config.max_retries => {
                    warn!(attempt, error = %err, "transfer failed, backing off");
                    self.backoff(attempt, generation).await?;
                }
                Err(err) => return self.fail_to_pending(err, generation),
            }
        };

        let object = match outcome {
            TransferOutcome::Stored(object) => object,
            TransferOutcome::Key => match self.finalize(&file_name, size, &key).await {
                Ok(object) => object,
                Err(err) => return self.fail_to_pending(err, generation),
            },
        };

        info!(key = %object.key, size, "upload ready");
        self.finish(object.clone());
        Ok(object)
    }

    async fn transfer_once(
        &self,
        key: &str,
        file_name: &str,
        data: &Bytes,
        generation: u64,
    ) -> TransferResult<TransferOutcome> {
        let size = data.len() as u64;
        if size >= self.config.multipart_threshold {
            return self
                .multipart_transfer(key, data, generation)
                .await
                .map(|()| TransferOutcome::Key);
        }

        match self.direct_transfer(key, data, generation).await {
            Ok(_etag) => Ok(TransferOutcome::Key),
            // A blocked direct PUT (strict storage policy, broken
            // network path) can still succeed through the server,
            // within the proxy's payload cap.
            Err(err @ (TransferError::Network(_) | TransferError::Rejected { .. }))
                if size <= self.config.proxy_max_bytes =>
            {
                warn!(error = %err, "direct put failed, falling back to proxy");
                self.op(self.store.proxy_upload(file_name, data.clone()))
                    .await
                    .map(TransferOutcome::Stored)
            }
            Err(err) => Err(err),
        }
    }

    async fn direct_transfer(
        &self,
        key: &str,
        data: &Bytes,
        generation: u64,
    ) -> TransferResult<String> {
        let url = self.op(self.store.presign_put(key)).await?;
        self.check_generation(generation)?;
        self.monitored_put(&url, data.clone(), 0, generation).await
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: part counts are bounded well below u32::MAX by the part size
    async fn multipart_transfer(
        &self,
        key: &str,
        data: &Bytes,
        generation: u64,
    ) -> TransferResult<()> {
        let part_size = usize::try_from(self.config.part_size).unwrap_or(8 * 1024 * 1024);
        let count = data.len().div_ceil(part_size);
        let ticket = self
            .op(self.store.presign_multipart(key, count as u32))
            .await?;
        if ticket.part_urls.len() < count {
            return Err(TransferError::Rejected {
                status: 502,
                message: "multipart ticket is missing part urls".to_owned(),
            });
        }

        // Parts go up sequentially; the completion call needs their
        // etags in part order.
        let mut parts = Vec::with_capacity(count);
        for (index, url) in ticket.part_urls.iter().take(count).enumerate() {
            self.check_generation(generation)?;
            let start = index * part_size;
            let end = (start + part_size).min(data.len());
            let etag = self
                .monitored_put(url, data.slice(start..end), start as u64, generation)
                .await?;
            parts.push(CompletedPart {
                part_number: (index + 1) as u32,
                etag,
            });
            debug!(part = index + 1, of = count, "part stored");
        }

        self.op(self.store.complete_multipart(key, &ticket.upload_id, &parts))
            .await
    }

    /// Run one PUT under the stall watchdog, folding its progress into
    /// the session.
    async fn monitored_put(
        &self,
        url: &str,
        data: Bytes,
        base_offset: u64,
        generation: u64,
    ) -> TransferResult<String> {
        let progress = Arc::new(Mutex::new(ProgressPoint {
            at: Instant::now(),
            bytes: 0,
        }));
        let sink: ProgressSink = {
            let progress = Arc::clone(&progress);
            Arc::new(move |bytes| {
                let mut point = progress.lock().unwrap_or_else(PoisonError::into_inner);
                point.at = Instant::now();
                point.bytes = bytes;
            })
        };

        tokio::select! {
            result = self.store.put(url, data, sink) => result,
            err = self.watch_transfer(&progress, base_offset, generation) => Err(err),
        }
    }

    /// Ticks once a second while a PUT is in flight: publishes
    /// progress, flags stalls after the warning window and gives up
    /// after the abort window. Also notices when a newer file
    /// selection has superseded this transfer.
    #[allow(clippy::cast_precision_loss)]
    async fn watch_transfer(
        &self,
        progress: &Mutex<ProgressPoint>,
        base_offset: u64,
        generation: u64,
    ) -> TransferError {
        let warn_after = self.config.stall_warn_window();
        let abort_after = self.config.stall_abort_window();
        let mut last_bytes = 0u64;
        let mut warned = false;
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if self.generation.load(Ordering::SeqCst) != generation {
                return TransferError::Aborted;
            }

            let (at, bytes) = {
                let point = progress.lock().unwrap_or_else(PoisonError::into_inner);
                (point.at, point.bytes)
            };
            let idle = at.elapsed();
            let delta = bytes.saturating_sub(last_bytes);
            last_bytes = bytes;

            let stalled = idle >= warn_after;
            self.update(|s| {
                s.bytes_sent = base_offset + bytes;
                s.speed_bps = Some(delta as f64);
                s.stalled = stalled;
            });
            if stalled && !warned {
                warn!(idle_secs = idle.as_secs(), "transfer has stalled");
                warned = true;
            }
            if idle >= abort_after {
                warn!(idle_secs = idle.as_secs(), "aborting stalled transfer");
                return TransferError::Aborted;
            }
        }
    }

    /// Write the ledger record for freshly stored bytes.
    ///
    /// A timed-out write may still have landed server-side, so the
    /// ledger is probed once before the timeout is surfaced.
    async fn finalize(
        &self,
        file_name: &str,
        size: u64,
        key: &str,
    ) -> TransferResult<StoredObject> {
        self.update(|s| s.status = UploadStatus::Finalizing);
        match self.op(self.ledger.create_record(file_name, size, key)).await {
            Ok(object) => Ok(object),
            Err(TransferError::Timeout) => {
                debug!("finalize timed out, probing for the record");
                match self.op(self.ledger.find_existing(file_name, size)).await {
                    Ok(Some(object)) => Ok(object),
                    _ => Err(TransferError::Timeout),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Sleep out the backoff delay with a per-second countdown in the
    /// session, bailing if a newer selection supersedes the wait.
    async fn backoff(&self, attempt: u32, generation: u64) -> TransferResult<()> {
        let exp = attempt.saturating_sub(1).min(8);
        let delay = self
            .config
            .backoff_base
            .saturating_mul(1 << exp)
            .min(self.config.backoff_cap);
        let mut remaining = delay.as_secs();
        while remaining > 0 {
            self.check_generation(generation)?;
            self.update(|s| s.retry_in_secs = Some(remaining));
            tokio::time::sleep(Duration::from_secs(1)).await;
            remaining -= 1;
        }
        self.update(|s| s.retry_in_secs = None);
        Ok(())
    }

    /// Apply the configured deadline to a short storage or ledger call.
    async fn op<T>(&self, fut: impl Future<Output = TransferResult<T>>) -> TransferResult<T> {
        match tokio::time::timeout(self.config.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(TransferError::Timeout),
        }
    }

    fn finish(&self, object: StoredObject) {
        self.update(|s| {
            s.status = UploadStatus::Ready;
            s.bytes_sent = s.file_size;
            s.object = Some(object);
            s.error = None;
            s.retry_in_secs = None;
            s.stalled = false;
        });
    }

    /// Drop back to `pending` with the failure recorded, unless a
    /// newer selection owns the session now.
    fn fail_to_pending<T>(&self, err: TransferError, generation: u64) -> TransferResult<T> {
        if self.generation.load(Ordering::SeqCst) == generation {
            warn!(error = %err, "upload failed, returning to pending");
            self.update(|s| {
                s.status = UploadStatus::Pending;
                s.error = Some(err.to_string());
                s.retry_in_secs = None;
                s.stalled = false;
            });
        }
        Err(err)
    }

    fn check_generation(&self, generation: u64) -> TransferResult<()> {
        if self.generation.load(Ordering::SeqCst) == generation {
            Ok(())
        } else {
            Err(TransferError::Aborted)
        }
    }

    fn update(&self, apply: impl FnOnce(&mut UploadSession)) {
        let mut inner = self.lock();
        apply(&mut inner.session);
        self.events.send_replace(inner.session.clone());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn object_key(file_name: &str, size: u64) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("uploads/{size}-{safe}")
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicU32;

    use print_types::solid_box;

    use super::*;

    #[derive(Default)]
    struct FakeStore {
        put_failures: Mutex<VecDeque<TransferError>>,
        puts: AtomicU32,
        proxies: AtomicU32,
        completed: Mutex<Vec<CompletedPart>>,
        hang_puts: bool,
    }

    impl FakeStore {
        fn failing(failures: Vec<TransferError>) -> Self {
            Self {
                put_failures: Mutex::new(failures.into()),
                ..Self::default()
            }
        }
    }

    impl ObjectStore for FakeStore {
        async fn presign_put(&self, key: &str) -> TransferResult<String> {
            Ok(format!("https://store.test/{key}"))
        }

        async fn presign_multipart(
            &self,
            key: &str,
            parts: u32,
        ) -> TransferResult<crate::store::MultipartTicket> {
            Ok(crate::store::MultipartTicket {
                upload_id: "mp-1".into(),
                part_urls: (1..=parts)
                    .map(|n| format!("https://store.test/{key}?part={n}"))
                    .collect(),
            })
        }

        async fn put(
            &self,
            _url: &str,
            data: Bytes,
            progress: ProgressSink,
        ) -> TransferResult<String> {
            let n = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(err) = self.put_failures.lock().unwrap().pop_front() {
                return Err(err);
            }
            if self.hang_puts {
                progress(data.len() as u64 / 2);
                futures::future::pending::<()>().await;
            }
            progress(data.len() as u64);
            Ok(format!("etag-{n}"))
        }

        async fn complete_multipart(
            &self,
            _key: &str,
            _upload_id: &str,
            parts: &[CompletedPart],
        ) -> TransferResult<()> {
            self.completed.lock().unwrap().extend_from_slice(parts);
            Ok(())
        }

        async fn proxy_upload(
            &self,
            file_name: &str,
            _data: Bytes,
        ) -> TransferResult<StoredObject> {
            self.proxies.fetch_add(1, Ordering::SeqCst);
            Ok(StoredObject {
                id: "proxy-1".into(),
                key: format!("proxy/{file_name}"),
                url: "https://cdn.test/proxy-1".into(),
            })
        }
    }

    #[derive(Default)]
    struct FakeLedger {
        existing: Mutex<Option<StoredObject>>,
        created: AtomicU32,
        hang_create: bool,
    }

    impl UploadLedger for FakeLedger {
        async fn find_existing(
            &self,
            _file_name: &str,
            _size: u64,
        ) -> TransferResult<Option<StoredObject>> {
            Ok(self.existing.lock().unwrap().clone())
        }

        async fn create_record(
            &self,
            _file_name: &str,
            _size: u64,
            key: &str,
        ) -> TransferResult<StoredObject> {
            let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
            let object = StoredObject {
                id: format!("rec-{n}"),
                key: key.to_owned(),
                url: format!("https://cdn.test/{key}"),
            };
            if self.hang_create {
                // Simulates a record that lands while the response is
                // lost in transit.
                *self.existing.lock().unwrap() = Some(object.clone());
                futures::future::pending::<()>().await;
            }
            Ok(object)
        }
    }

    fn test_config() -> UploadConfig {
        UploadConfig {
            multipart_threshold: 1024,
            part_size: 256,
            proxy_max_bytes: 512,
            op_timeout: Duration::from_secs(5),
            ..UploadConfig::default()
        }
    }

    fn pending_orchestrator(
        store: FakeStore,
        ledger: FakeLedger,
        config: UploadConfig,
        payload_len: usize,
    ) -> UploadOrchestrator<FakeStore, FakeLedger> {
        let orchestrator = UploadOrchestrator::new(store, ledger, config);
        let mesh = solid_box(40.0, 60.0, 40.0);
        let data = Bytes::from(vec![0u8; payload_len]);
        orchestrator.select_file("model.stl", data, Some(&mesh), SourceUnit::Millimeters);
        orchestrator
    }

    #[test]
    fn select_file_analyzes_and_parks_pending() {
        let orchestrator = pending_orchestrator(
            FakeStore::default(),
            FakeLedger::default(),
            test_config(),
            600,
        );
        let session = orchestrator.session();
        assert_eq!(session.status, UploadStatus::Pending);
        assert_eq!(session.file_name.as_deref(), Some("model.stl"));
        assert_eq!(session.file_size, 600);
        let metrics = session.metrics.unwrap();
        assert!(!metrics.is_unanalyzable());
        assert!((metrics.size.y - 60.0).abs() < 1e-10);
    }

    #[test]
    fn unparseable_file_drops_to_idle_with_error() {
        let orchestrator = UploadOrchestrator::new(
            FakeStore::default(),
            FakeLedger::default(),
            test_config(),
        );
        let session = orchestrator.select_file(
            "garbage.stl",
            Bytes::from_static(b"not a mesh"),
            None,
            SourceUnit::Millimeters,
        );
        assert_eq!(session.status, UploadStatus::Idle);
        assert!(session.error.unwrap().contains("parse"));
    }

    #[tokio::test(start_paused = true)]
    async fn upload_without_pending_file_is_rejected() {
        let orchestrator = UploadOrchestrator::new(
            FakeStore::default(),
            FakeLedger::default(),
            test_config(),
        );
        let result = orchestrator.start_upload().await;
        assert!(matches!(
            result,
            Err(TransferError::Rejected { status: 409, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn identical_prior_upload_is_reused_without_transfer() {
        let ledger = FakeLedger::default();
        *ledger.existing.lock().unwrap() = Some(StoredObject {
            id: "rec-0".into(),
            key: "uploads/600-model.stl".into(),
            url: "https://cdn.test/rec-0".into(),
        });
        let orchestrator =
            pending_orchestrator(FakeStore::default(), ledger, test_config(), 600);

        let object = orchestrator.start_upload().await.unwrap();
        assert_eq!(object.id, "rec-0");
        assert_eq!(orchestrator.store.puts.load(Ordering::SeqCst), 0);
        assert_eq!(orchestrator.session().status, UploadStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_retry_with_doubling_backoff() {
        // 600 bytes exceeds the 512 byte proxy cap, so both network
        // failures classify as retryable instead of falling back.
        let store = FakeStore::failing(vec![
            TransferError::Network("reset".into()),
            TransferError::Network("reset".into()),
        ]);
        let orchestrator =
            pending_orchestrator(store, FakeLedger::default(), test_config(), 600);

        let started = Instant::now();
        let object = orchestrator.start_upload().await.unwrap();
        let elapsed = started.elapsed();

        // 2 s after the first failure, 4 s after the second.
        assert!(elapsed >= Duration::from_secs(6), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(10), "elapsed {elapsed:?}");
        assert_eq!(orchestrator.store.puts.load(Ordering::SeqCst), 3);
        let session = orchestrator.session();
        assert_eq!(session.status, UploadStatus::Ready);
        assert_eq!(session.attempt, 3);
        assert_eq!(session.object.unwrap(), object);
        assert_eq!(orchestrator.ledger.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_budget_exhaustion_returns_to_pending() {
        let store = FakeStore::failing(vec![
            TransferError::Network("reset".into()),
            TransferError::Network("reset".into()),
            TransferError::Network("reset".into()),
        ]);
        let orchestrator =
            pending_orchestrator(store, FakeLedger::default(), test_config(), 600);

        let result = orchestrator.start_upload().await;
        assert!(matches!(result, Err(TransferError::Network(_))));
        let session = orchestrator.session();
        assert_eq!(session.status, UploadStatus::Pending);
        assert!(session.error.unwrap().contains("network"));
        assert_eq!(orchestrator.store.puts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_rejection_does_not_retry() {
        let store = FakeStore::failing(vec![TransferError::Rejected {
            status: 413,
            message: "too big".into(),
        }]);
        // 600 > proxy cap: the rejection cannot fall back either.
        let orchestrator =
            pending_orchestrator(store, FakeLedger::default(), test_config(), 600);

        let result = orchestrator.start_upload().await;
        assert!(matches!(result, Err(TransferError::Rejected { status: 413, .. })));
        assert_eq!(orchestrator.store.puts.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.session().status, UploadStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_direct_put_falls_back_to_proxy() {
        let store = FakeStore::failing(vec![TransferError::Rejected {
            status: 403,
            message: "forbidden".into(),
        }]);
        let orchestrator =
            pending_orchestrator(store, FakeLedger::default(), test_config(), 300);

        let object = orchestrator.start_upload().await.unwrap();
        assert_eq!(object.id, "proxy-1");
        assert_eq!(orchestrator.store.proxies.load(Ordering::SeqCst), 1);
        // The proxy writes the record server-side.
        assert_eq!(orchestrator.ledger.created.load(Ordering::SeqCst), 0);
        assert_eq!(orchestrator.session().status, UploadStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn large_payloads_go_multipart_with_ordered_parts() {
        let orchestrator = pending_orchestrator(
            FakeStore::default(),
            FakeLedger::default(),
            test_config(),
            1500,
        );

        orchestrator.start_upload().await.unwrap();

        let parts = orchestrator.store.completed.lock().unwrap().clone();
        assert_eq!(parts.len(), 6); // ceil(1500 / 256)
        for (index, part) in parts.iter().enumerate() {
            assert_eq!(part.part_number, u32::try_from(index).unwrap() + 1);
        }
        assert_eq!(orchestrator.store.puts.load(Ordering::SeqCst), 6);
        assert_eq!(orchestrator.ledger.created.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.session().status, UploadStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_transfer_is_aborted_by_the_watchdog() {
        let store = FakeStore {
            hang_puts: true,
            ..FakeStore::default()
        };
        let config = UploadConfig {
            max_retries: 0,
            ..test_config()
        };
        let orchestrator = pending_orchestrator(store, FakeLedger::default(), config, 600);

        let started = Instant::now();
        let result = orchestrator.start_upload().await;
        assert_eq!(result, Err(TransferError::Aborted));
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert_eq!(orchestrator.session().status, UploadStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn low_power_mode_doubles_the_stall_windows() {
        let store = FakeStore {
            hang_puts: true,
            ..FakeStore::default()
        };
        let config = UploadConfig {
            max_retries: 0,
            low_power: true,
            ..test_config()
        };
        let orchestrator = pending_orchestrator(store, FakeLedger::default(), config, 600);

        let started = Instant::now();
        let result = orchestrator.start_upload().await;
        assert_eq!(result, Err(TransferError::Aborted));
        assert!(started.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn finalize_timeout_recovers_via_ledger_probe() {
        let ledger = FakeLedger {
            hang_create: true,
            ..FakeLedger::default()
        };
        let orchestrator =
            pending_orchestrator(FakeStore::default(), ledger, test_config(), 600);

        let object = orchestrator.start_upload().await.unwrap();
        assert_eq!(object.id, "rec-1");
        assert_eq!(orchestrator.session().status, UploadStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn new_selection_supersedes_an_inflight_upload() {
        let store = FakeStore {
            hang_puts: true,
            ..FakeStore::default()
        };
        let orchestrator = Arc::new(pending_orchestrator(
            store,
            FakeLedger::default(),
            test_config(),
            600,
        ));

        let worker = Arc::clone(&orchestrator);
        let handle = tokio::spawn(async move { worker.start_upload().await });
        tokio::time::sleep(Duration::from_secs(2)).await;

        let mesh = solid_box(10.0, 10.0, 10.0);
        let session = orchestrator.select_file(
            "replacement.stl",
            Bytes::from(vec![0u8; 64]),
            Some(&mesh),
            SourceUnit::Millimeters,
        );

        let result = handle.await.unwrap();
        assert_eq!(result, Err(TransferError::Aborted));
        // The superseded transfer must not disturb the new session.
        assert_eq!(session.status, UploadStatus::Pending);
        assert_eq!(
            orchestrator.session().file_name.as_deref(),
            Some("replacement.stl")
        );
        assert_eq!(orchestrator.session().status, UploadStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_snapshots_reach_subscribers() {
        let orchestrator = pending_orchestrator(
            FakeStore::default(),
            FakeLedger::default(),
            test_config(),
            600,
        );
        let mut events = orchestrator.subscribe();

        orchestrator.start_upload().await.unwrap();

        events.mark_changed();
        assert!(events.changed().await.is_ok());
        let snapshot = events.borrow().clone();
        assert_eq!(snapshot.status, UploadStatus::Ready);
        assert_eq!(snapshot.bytes_sent, 600);
        assert!((snapshot.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn object_keys_are_sanitized() {
        assert_eq!(
            object_key("my model (v2).stl", 42),
            "uploads/42-my-model--v2-.stl"
        );
    }
}
