//! Candidate scoring and ranking.

use print_price::{compute_print_price, QuoteParams};
use print_types::{PrinterDims, RiskStatus, SceneDims};
use tracing::debug;

use crate::orientation::Orientation;

// Scoring policy constants.
const AREA_RATIO_CAP: f64 = 1.4;
const AREA_WEIGHT: f64 = 48.0;
const SLENDER_WEIGHT: f64 = 36.0;
const EDGE_MARGIN: f64 = 0.92;
const EDGE_PENALTY: f64 = 8.0;
const RISK_SCORE_THRESHOLD: u8 = 65;

/// One evaluated build orientation.
///
/// Purely derived; recomputed whenever base dimensions, the height
/// target or any process option changes, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationCandidate {
    /// The orientation this candidate describes.
    pub orientation: Orientation,
    /// Oriented dimensions in the printer frame, mm.
    pub dims: PrinterDims,
    /// Whether every extent fits the bed.
    pub fits_bed: bool,
    /// Risk classification.
    pub risk_status: RiskStatus,
    /// Tip/support risk score, 0–100 (100 = does not fit).
    pub risk_score: u8,
    /// Estimated print duration in minutes.
    pub eta_minutes: u32,
    /// Estimated price for ranking tiebreaks, when pricing context was
    /// supplied.
    pub estimated_price: Option<f64>,
}

/// Ranked orientation candidates plus the recommendation.
#[derive(Debug, Clone)]
pub struct OrientationAdvice {
    /// All candidates, best first.
    pub candidates: Vec<OrientationCandidate>,
    /// The recommended orientation (first candidate's key).
    pub recommended: Orientation,
}

impl OrientationAdvice {
    /// The top-ranked candidate.
    #[must_use]
    pub fn best(&self) -> &OrientationCandidate {
        // Ranking always produces all three candidates
        &self.candidates[0]
    }

    /// True when no orientation fits the bed at all.
    #[must_use]
    pub fn none_fit(&self) -> bool {
        self.candidates.iter().all(|c| !c.fits_bed)
    }
}

/// Evaluate and rank the canonical orientations without pricing.
///
/// The base box arrives in the scene frame (Y-up); the model is scaled
/// uniformly so the upright build height equals `target_height_mm`,
/// converted to the printer frame, and each orientation's permutation
/// is applied.
#[must_use]
pub fn advise(base: &SceneDims, target_height_mm: f64, bed_mm: f64) -> OrientationAdvice {
    rank(base, target_height_mm, bed_mm, None)
}

/// Evaluate and rank with per-candidate price estimates as the final
/// ranking tiebreak.
///
/// The supplied params' dimensions and volume are overridden per
/// candidate; everything else (technology, material, quality,
/// hollow/infill, queue) carries through, so option changes re-rank.
#[must_use]
pub fn advise_with_pricing(
    base: &SceneDims,
    target_height_mm: f64,
    bed_mm: f64,
    pricing: &QuoteParams,
) -> OrientationAdvice {
    rank(base, target_height_mm, bed_mm, Some(pricing))
}

fn rank(
    base: &SceneDims,
    target_height_mm: f64,
    bed_mm: f64,
    pricing: Option<&QuoteParams>,
) -> OrientationAdvice {
    let scale = if base.y > 0.0 && target_height_mm > 0.0 {
        target_height_mm / base.y
    } else {
        1.0
    };
    let upright = base.scaled(scale).to_printer();

    let mut candidates: Vec<OrientationCandidate> = Orientation::all()
        .into_iter()
        .map(|orientation| {
            let mut candidate = score(orientation, orientation.apply(upright), bed_mm);
            if let Some(params) = pricing {
                let params = params
                    .clone()
                    .with_dims(candidate.dims);
                candidate.estimated_price = Some(compute_print_price(&params).price);
            }
            candidate
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.risk_status
            .weight()
            .cmp(&b.risk_status.weight())
            .then(a.risk_score.cmp(&b.risk_score))
            .then(a.eta_minutes.cmp(&b.eta_minutes))
            .then(
                a.estimated_price
                    .unwrap_or(0.0)
                    .total_cmp(&b.estimated_price.unwrap_or(0.0)),
            )
    });

    let recommended = candidates[0].orientation;
    debug!(recommended = recommended.as_str(), "orientations ranked");

    OrientationAdvice {
        candidates,
        recommended,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Truncation: scores are clamped to 0..=99 and etas floored at 20 before casting
fn score(orientation: Orientation, dims: PrinterDims, bed_mm: f64) -> OrientationCandidate {
    let fits_bed = dims.fits_within(bed_mm);

    if !fits_bed {
        // Cheap eta fallback: the normal formula with the footprint
        // ratio pinned at its cap and no risk bonus.
        let eta = (0.58f64.mul_add(dims.z, 18.0) + 95.0 * AREA_RATIO_CAP)
            .round()
            .max(20.0);
        return OrientationCandidate {
            orientation,
            dims,
            fits_bed: false,
            risk_status: RiskStatus::Critical,
            risk_score: 100,
            eta_minutes: eta as u32,
            estimated_price: None,
        };
    }

    let base_area_ratio = (dims.x * dims.y / (bed_mm * bed_mm)).min(AREA_RATIO_CAP);
    let footprint = dims.x.max(dims.y);
    let slenderness = if footprint > 0.0 { dims.z / footprint } else { 0.0 };
    let edge_penalty = if footprint > EDGE_MARGIN * bed_mm {
        EDGE_PENALTY
    } else {
        0.0
    };

    let raw = SLENDER_WEIGHT.mul_add(slenderness, AREA_WEIGHT * base_area_ratio) + edge_penalty;
    let risk_score = raw.clamp(0.0, 99.0).round() as u8;
    let risk_status = if risk_score >= RISK_SCORE_THRESHOLD {
        RiskStatus::Risk
    } else {
        RiskStatus::Ok
    };

    let risk_bonus = if risk_status == RiskStatus::Risk { 10.0 } else { 0.0 };
    let eta = (0.58f64.mul_add(dims.z, 18.0) + 95.0 * base_area_ratio + risk_bonus)
        .round()
        .max(20.0);

    OrientationCandidate {
        orientation,
        dims,
        fits_bed: true,
        risk_status,
        risk_score,
        eta_minutes: eta as u32,
        estimated_price: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use print_price::Technology;
    use print_types::DEFAULT_BED_MM;

    #[test]
    fn all_three_candidates_are_evaluated() {
        let base = SceneDims::new(40.0, 60.0, 40.0);
        let advice = advise(&base, 60.0, DEFAULT_BED_MM);
        assert_eq!(advice.candidates.len(), 3);
        assert_eq!(advice.recommended, advice.best().orientation);
    }

    #[test]
    fn height_target_scales_uniformly() {
        let base = SceneDims::new(40.0, 60.0, 40.0);
        let advice = advise(&base, 120.0, DEFAULT_BED_MM);
        let upright = advice
            .candidates
            .iter()
            .find(|c| c.orientation == Orientation::Upright)
            .unwrap();
        assert!((upright.dims.z - 120.0).abs() < 1e-10);
        assert!((upright.dims.x - 80.0).abs() < 1e-10);
    }

    #[test]
    fn oversize_upright_is_critical_with_score_100() {
        // 250 mm wide in every orientation's X or Z: upright keeps the
        // 250 on the bed axis.
        let base = SceneDims::new(250.0, 80.0, 80.0);
        let advice = advise(&base, 80.0, DEFAULT_BED_MM);
        let upright = advice
            .candidates
            .iter()
            .find(|c| c.orientation == Orientation::Upright)
            .unwrap();
        assert!(!upright.fits_bed);
        assert_eq!(upright.risk_score, 100);
        assert_eq!(upright.risk_status, RiskStatus::Critical);
    }

    #[test]
    fn tall_model_prefers_lying_down() {
        // 30×180×30: upright is very slender; an on-side orientation
        // should win.
        let base = SceneDims::new(30.0, 180.0, 30.0);
        let advice = advise(&base, 180.0, DEFAULT_BED_MM);
        assert_ne!(advice.recommended, Orientation::Upright);
    }

    #[test]
    fn candidates_rank_by_ascending_risk_score() {
        let base = SceneDims::new(30.0, 180.0, 30.0);
        let advice = advise(&base, 180.0, DEFAULT_BED_MM);
        let scores: Vec<u8> = advice.candidates.iter().map(|c| c.risk_score).collect();
        let mut sorted = scores.clone();
        sorted.sort_unstable();
        assert_eq!(scores, sorted);
    }

    #[test]
    fn none_fit_when_every_pose_exceeds_bed() {
        let base = SceneDims::new(250.0, 250.0, 250.0);
        let advice = advise(&base, 250.0, DEFAULT_BED_MM);
        assert!(advice.none_fit());
        assert_eq!(advice.best().risk_status, RiskStatus::Critical);
    }

    #[test]
    fn fitting_cube_is_ok_everywhere() {
        let base = SceneDims::new(50.0, 50.0, 50.0);
        let advice = advise(&base, 50.0, DEFAULT_BED_MM);
        for candidate in &advice.candidates {
            assert!(candidate.fits_bed);
            assert_eq!(candidate.risk_status, RiskStatus::Ok);
            assert!(candidate.eta_minutes >= 20);
        }
    }

    #[test]
    fn eta_has_floor_of_twenty_minutes() {
        let base = SceneDims::new(1.0, 1.0, 1.0);
        let advice = advise(&base, 1.0, DEFAULT_BED_MM);
        assert!(advice.candidates.iter().all(|c| c.eta_minutes == 20));
    }

    #[test]
    fn pricing_fills_estimated_price() {
        let base = SceneDims::new(40.0, 60.0, 40.0);
        let params = QuoteParams::new(Technology::Sla).with_volume_cm3(96.0);
        let advice = advise_with_pricing(&base, 60.0, DEFAULT_BED_MM, &params);
        assert!(advice
            .candidates
            .iter()
            .all(|c| c.estimated_price.is_some()));
    }

    #[test]
    fn recomputation_is_pure() {
        let base = SceneDims::new(40.0, 60.0, 40.0);
        let a = advise(&base, 60.0, DEFAULT_BED_MM);
        let b = advise(&base, 60.0, DEFAULT_BED_MM);
        assert_eq!(a.candidates, b.candidates);
    }
}
