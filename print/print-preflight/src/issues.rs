//! Preflight issue types.

/// A manufacturability concern found during preflight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightIssue {
    /// Machine-readable issue code.
    pub code: IssueCode,
    /// Human-readable, actionable description.
    pub message: String,
}

impl PreflightIssue {
    /// Create a new issue.
    #[must_use]
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Machine-readable preflight issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// A dimension exceeds the build volume; unprintable as-is.
    ExceedsBuildVolume,
    /// Volume came from the bounding-box fallback; geometry integrity
    /// is unverified.
    UnverifiedVolume,
    /// Very slender proportions (longest/shortest extent ratio high).
    SlenderGeometry,
    /// The mesh produced no usable metrics at all.
    Unanalyzable,
}

impl IssueCode {
    /// Human-readable name for the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExceedsBuildVolume => "exceeds-build-volume",
            Self::UnverifiedVolume => "unverified-volume",
            Self::SlenderGeometry => "slender-geometry",
            Self::Unanalyzable => "unanalyzable",
        }
    }
}
