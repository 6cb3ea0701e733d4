//! Preflight evaluation.

use print_analyze::VolumeMethod;
use print_types::{PrinterDims, RiskStatus};
use tracing::debug;

use crate::issues::{IssueCode, PreflightIssue};

/// Aspect ratio (longest/shortest extent) beyond which proportions are
/// flagged as slender.
pub const SLENDERNESS_THRESHOLD: f64 = 6.0;

// Score policy weights. Monotone in each input by construction.
const UTILIZATION_WEIGHT: f64 = 40.0;
const FALLBACK_PENALTY: f64 = 25.0;
const SLENDER_WEIGHT: f64 = 25.0;
const CRITICAL_FLOOR: f64 = 90.0;

/// Result of a preflight evaluation.
#[derive(Debug, Clone)]
pub struct PreflightReport {
    /// Overall classification.
    pub status: RiskStatus,
    /// Risk score, 0–100, monotone in the inputs.
    pub score: u8,
    /// One-line human-readable summary.
    pub summary: String,
    /// Individual issues found.
    pub issues: Vec<PreflightIssue>,
}

impl PreflightReport {
    /// True when the model must not be added to a cart as-is.
    ///
    /// Only `Critical` blocks; `Risk` is advisory.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.status.is_critical()
    }

    /// First issue with the given code, if any.
    #[must_use]
    pub fn issue(&self, code: IssueCode) -> Option<&PreflightIssue> {
        self.issues.iter().find(|i| i.code == code)
    }
}

/// Evaluate final post-scale dimensions and volume for print readiness.
///
/// Pure function of its inputs. Rules, in order:
///
/// - Zero-size input is `Critical` and unanalyzable.
/// - Any dimension strictly greater than `bed_mm` is `Critical`
///   (a dimension exactly equal to the bed still fits).
/// - A fallback volume method or slender proportions mark `Risk`.
/// - Otherwise `Ok`.
///
/// # Example
///
/// ```
/// use print_analyze::VolumeMethod;
/// use print_preflight::{evaluate, IssueCode};
/// use print_types::{PrinterDims, RiskStatus};
///
/// let too_wide = PrinterDims::new(250.0, 80.0, 80.0);
/// let report = evaluate(&too_wide, 400.0, VolumeMethod::Mesh, 200.0);
///
/// assert_eq!(report.status, RiskStatus::Critical);
/// assert!(report.issue(IssueCode::ExceedsBuildVolume).is_some());
/// ```
#[must_use]
pub fn evaluate(
    dims: &PrinterDims,
    volume_cm3: f64,
    volume_method: VolumeMethod,
    bed_mm: f64,
) -> PreflightReport {
    if dims.is_zero() || volume_cm3 <= 0.0 {
        return PreflightReport {
            status: RiskStatus::Critical,
            score: 100,
            summary: "Model could not be analyzed".to_string(),
            issues: vec![PreflightIssue::new(
                IssueCode::Unanalyzable,
                "The uploaded file produced no measurable geometry; choose a different file",
            )],
        };
    }

    let mut issues = Vec::new();
    let mut status = RiskStatus::Ok;

    for (axis, extent) in [("X", dims.x), ("Y", dims.y), ("Z", dims.z)] {
        if extent > bed_mm {
            status = RiskStatus::Critical;
            issues.push(PreflightIssue::new(
                IssueCode::ExceedsBuildVolume,
                format!("{axis} dimension {extent:.1} mm exceeds the {bed_mm:.0} mm build volume"),
            ));
        }
    }

    if volume_method == VolumeMethod::Fallback {
        if status != RiskStatus::Critical {
            status = RiskStatus::Risk;
        }
        issues.push(PreflightIssue::new(
            IssueCode::UnverifiedVolume,
            "Mesh volume could not be verified; the estimate uses a conservative fallback",
        ));
    }

    let ratio = dims.aspect_ratio();
    if ratio.is_finite() && ratio > SLENDERNESS_THRESHOLD {
        if status != RiskStatus::Critical {
            status = RiskStatus::Risk;
        }
        issues.push(PreflightIssue::new(
            IssueCode::SlenderGeometry,
            format!("Very slender proportions (extent ratio {ratio:.1}); the print may tip or warp"),
        ));
    }

    let score = score_for(dims, volume_method, ratio, bed_mm, status);
    let summary = summarize(status, &issues);
    debug!(status = status.as_str(), score, "preflight evaluated");

    PreflightReport {
        status,
        score,
        summary,
        issues,
    }
}

/// Deterministic, monotone 0–100 score.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Truncation: the value is clamped to 0..=100 before the cast
fn score_for(
    dims: &PrinterDims,
    volume_method: VolumeMethod,
    ratio: f64,
    bed_mm: f64,
    status: RiskStatus,
) -> u8 {
    let utilization = (dims.longest() / bed_mm).min(2.0);
    let slender_excess = if ratio.is_finite() {
        ((ratio - SLENDERNESS_THRESHOLD).max(0.0) / SLENDERNESS_THRESHOLD).min(1.0)
    } else {
        1.0
    };
    let fallback = if volume_method == VolumeMethod::Fallback {
        FALLBACK_PENALTY
    } else {
        0.0
    };

    let mut score = UTILIZATION_WEIGHT * utilization + fallback + SLENDER_WEIGHT * slender_excess;
    if status.is_critical() {
        score = score.max(CRITICAL_FLOOR);
    }
    score.clamp(0.0, 100.0).round() as u8
}

fn summarize(status: RiskStatus, issues: &[PreflightIssue]) -> String {
    match status {
        RiskStatus::Ok => "Model is ready for printing".to_string(),
        RiskStatus::Risk => format!("Printable with {} concern(s)", issues.len()),
        RiskStatus::Critical => {
            format!("Not printable as-is: {} issue(s)", issues.len())
        }
    }
}
