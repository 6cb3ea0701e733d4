//! Upload session state.

use print_analyze::MeshMetrics;

use crate::store::StoredObject;

/// Lifecycle phase of the current upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    /// No file selected (or the last selection was discarded).
    #[default]
    Idle,
    /// Parsing and measuring the selected file.
    Analyzing,
    /// Analyzed and waiting for the upload to start (or to be retried).
    Pending,
    /// Bytes are in flight.
    Uploading,
    /// Bytes are stored; the ledger record is being written.
    Finalizing,
    /// Durably stored and recorded.
    Ready,
}

impl UploadStatus {
    /// Stable key for logging and UI binding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Finalizing => "finalizing",
            Self::Ready => "ready",
        }
    }
}

/// Observable snapshot of the upload session.
///
/// Published through a watch channel on every meaningful change; the
/// snapshot is cheap to clone and carries no payload bytes.
#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    /// Current lifecycle phase.
    pub status: UploadStatus,
    /// Selected file name, when a file is selected.
    pub file_name: Option<String>,
    /// Selected file size in bytes.
    pub file_size: u64,
    /// Bytes confirmed sent so far.
    pub bytes_sent: u64,
    /// Current attempt number (1-based) while uploading.
    pub attempt: u32,
    /// Rolling transfer speed in bytes per second, when measurable.
    pub speed_bps: Option<f64>,
    /// True once the stall watchdog's warning window elapses without
    /// progress.
    pub stalled: bool,
    /// Seconds remaining before the next retry, during backoff.
    pub retry_in_secs: Option<u64>,
    /// Last failure message, kept across the `uploading → pending`
    /// fallback so the user sees why the retry budget ran out.
    pub error: Option<String>,
    /// Geometry metrics from analysis, kept for the whole session.
    pub metrics: Option<MeshMetrics>,
    /// The stored object, once `Ready`.
    pub object: Option<StoredObject>,
}

impl UploadSession {
    /// Fraction of the payload confirmed sent, 0.0–1.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.file_size == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.bytes_sent as f64 / self.file_size as f64;
        ratio.clamp(0.0, 1.0)
    }
}
