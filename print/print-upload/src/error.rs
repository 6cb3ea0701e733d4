//! Transfer error types.

use thiserror::Error;

/// Errors surfaced by upload transfers and record-keeping.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// An operation exceeded its deadline.
    #[error("operation timed out")]
    Timeout,

    /// A network-level failure (connection reset, DNS, TLS).
    #[error("network failure: {0}")]
    Network(String),

    /// The transfer was aborted, either by the stall watchdog or
    /// because a newer file selection superseded it.
    #[error("transfer aborted")]
    Aborted,

    /// The remote side rejected the request.
    #[error("rejected ({status}): {message}")]
    Rejected {
        /// HTTP-style status code.
        status: u16,
        /// Human-readable rejection reason.
        message: String,
    },

    /// The payload exceeds what the selected path can carry.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Payload size in bytes.
        size: u64,
        /// The path's size limit in bytes.
        limit: u64,
    },
}

impl TransferError {
    /// Whether a retry with backoff could plausibly succeed.
    ///
    /// Timeouts, network failures and watchdog aborts are transient;
    /// rejections and size violations are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_) | Self::Aborted)
    }
}

/// Result alias for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(TransferError::Timeout.is_retryable());
        assert!(TransferError::Network("reset".into()).is_retryable());
        assert!(TransferError::Aborted.is_retryable());
    }

    #[test]
    fn rejections_are_terminal() {
        let err = TransferError::Rejected {
            status: 413,
            message: "too big".into(),
        };
        assert!(!err.is_retryable());
        assert!(!TransferError::TooLarge { size: 9, limit: 4 }.is_retryable());
    }
}
