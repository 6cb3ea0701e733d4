//! Shared risk classification.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Manufacturability risk classification shared by the preflight
/// evaluator and the orientation advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RiskStatus {
    /// No known manufacturability concern.
    Ok,
    /// Printable, but geometry integrity or proportions warrant review.
    Risk,
    /// Physically impossible as configured (e.g. exceeds the bed).
    Critical,
}

impl RiskStatus {
    /// Ranking weight: ok < risk < critical.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Ok => 1,
            Self::Risk => 2,
            Self::Critical => 3,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Risk => "risk",
            Self::Critical => "critical",
        }
    }

    /// True only for [`RiskStatus::Critical`].
    #[must_use]
    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}
