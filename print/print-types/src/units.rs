//! Source-file unit handling.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The linear unit an uploaded file's coordinates are expressed in.
///
/// Most mesh formats carry no unit metadata; the upload pipeline either
/// knows the unit from the format convention (STL is conventionally
/// millimeters, glTF meters) or falls back to [`infer_source_unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SourceUnit {
    /// Coordinates are millimeters (no scaling needed).
    #[default]
    Millimeters,
    /// Coordinates are meters (scale linear values by 1000).
    Meters,
}

impl SourceUnit {
    /// Multiplier converting a linear value in this unit to millimeters.
    #[inline]
    #[must_use]
    pub const fn linear_scale(self) -> f64 {
        match self {
            Self::Millimeters => 1.0,
            Self::Meters => 1000.0,
        }
    }
}

/// Guess the source unit from the largest raw bounding-box extent.
///
/// Heuristic, not a guarantee: a model whose largest raw extent is at
/// most 5 units is assumed to be meters (a 5 m print is implausible, a
/// 5 mm one barely printable), anything larger millimeters. This
/// mirrors how glTF-style uploads behave in practice. Callers that know
/// the real unit should pass it explicitly instead of calling this.
///
/// # Example
///
/// ```
/// use print_types::{infer_source_unit, SourceUnit};
///
/// assert_eq!(infer_source_unit(0.12), SourceUnit::Meters);
/// assert_eq!(infer_source_unit(80.0), SourceUnit::Millimeters);
/// ```
#[must_use]
pub fn infer_source_unit(max_extent: f64) -> SourceUnit {
    if max_extent > 0.0 && max_extent <= 5.0 {
        SourceUnit::Meters
    } else {
        SourceUnit::Millimeters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale() {
        assert!((SourceUnit::Millimeters.linear_scale() - 1.0).abs() < f64::EPSILON);
        assert!((SourceUnit::Meters.linear_scale() - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn heuristic_boundary() {
        assert_eq!(infer_source_unit(5.0), SourceUnit::Meters);
        assert_eq!(infer_source_unit(5.01), SourceUnit::Millimeters);
    }

    #[test]
    fn degenerate_extent_defaults_to_millimeters() {
        assert_eq!(infer_source_unit(0.0), SourceUnit::Millimeters);
        assert_eq!(infer_source_unit(-1.0), SourceUnit::Millimeters);
    }
}
