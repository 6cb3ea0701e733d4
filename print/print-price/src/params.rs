//! Quote parameters.

use print_types::PrinterDims;

use crate::catalog::{normalize_material, Quality, Technology};

/// Everything the estimator needs to price one print job.
///
/// Built with `Default` plus `with_*` methods; out-of-range values are
/// clamped rather than rejected so the estimator stays total.
///
/// # Example
///
/// ```
/// use print_price::{QuoteParams, Technology, Quality};
///
/// let params = QuoteParams::new(Technology::Fdm)
///     .with_quality(Quality::Pro)
///     .with_infill_pct(150); // clamped to 100
/// assert_eq!(params.infill_pct, 100);
/// ```
#[derive(Debug, Clone)]
pub struct QuoteParams {
    /// Selected technology.
    pub technology: Technology,
    /// Normalized material name (always on the allow-list).
    pub material: &'static str,
    /// Quality tier.
    pub quality: Quality,
    /// Final post-scale dimensions in the printer frame, if known.
    pub dims: Option<PrinterDims>,
    /// Measured material volume in cm³, if known.
    pub volume_cm3: Option<f64>,
    /// SLA only: shell the model instead of printing solid.
    pub hollow: bool,
    /// FDM only: infill percentage, clamped to 8–100.
    pub infill_pct: u8,
    /// Current shop load multiplier, clamped to 1.0–2.0.
    pub queue_multiplier: f64,
    /// Feature flag: allow the geometry-aware model.
    pub smart_pricing: bool,
}

impl QuoteParams {
    /// Default infill percentage for FDM jobs.
    pub const DEFAULT_INFILL_PCT: u8 = 20;

    /// Create parameters for a technology with its canonical material.
    #[must_use]
    pub fn new(technology: Technology) -> Self {
        Self {
            technology,
            material: technology.canonical_material(),
            quality: Quality::Standard,
            dims: None,
            volume_cm3: None,
            hollow: false,
            infill_pct: Self::DEFAULT_INFILL_PCT,
            queue_multiplier: 1.0,
            smart_pricing: true,
        }
    }

    /// Request a material; unrecognized names map to the canonical one.
    #[must_use]
    pub fn with_material(mut self, raw: &str) -> Self {
        self.material = normalize_material(self.technology, raw);
        self
    }

    /// Set the quality tier.
    #[must_use]
    pub const fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Provide final printer-frame dimensions.
    #[must_use]
    pub const fn with_dims(mut self, dims: PrinterDims) -> Self {
        self.dims = Some(dims);
        self
    }

    /// Provide a measured volume in cm³.
    #[must_use]
    pub const fn with_volume_cm3(mut self, volume_cm3: f64) -> Self {
        self.volume_cm3 = Some(volume_cm3);
        self
    }

    /// SLA hollow mode.
    #[must_use]
    pub const fn with_hollow(mut self, hollow: bool) -> Self {
        self.hollow = hollow;
        self
    }

    /// FDM infill percentage, clamped to 8–100.
    #[must_use]
    pub fn with_infill_pct(mut self, pct: u8) -> Self {
        self.infill_pct = pct.clamp(8, 100);
        self
    }

    /// Queue-load multiplier, clamped to 1.0–2.0.
    #[must_use]
    pub fn with_queue_multiplier(mut self, multiplier: f64) -> Self {
        self.queue_multiplier = if multiplier.is_finite() {
            multiplier.clamp(1.0, 2.0)
        } else {
            1.0
        };
        self
    }

    /// Enable or disable the geometry-aware model.
    #[must_use]
    pub const fn with_smart_pricing(mut self, enabled: bool) -> Self {
        self.smart_pricing = enabled;
        self
    }
}

impl Default for QuoteParams {
    fn default() -> Self {
        Self::new(Technology::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = QuoteParams::default();
        assert_eq!(params.technology, Technology::Fdm);
        assert_eq!(params.material, "pla");
        assert_eq!(params.infill_pct, QuoteParams::DEFAULT_INFILL_PCT);
        assert!((params.queue_multiplier - 1.0).abs() < f64::EPSILON);
        assert!(params.smart_pricing);
    }

    #[test]
    fn infill_is_clamped() {
        assert_eq!(QuoteParams::default().with_infill_pct(3).infill_pct, 8);
        assert_eq!(QuoteParams::default().with_infill_pct(250).infill_pct, 100);
        assert_eq!(QuoteParams::default().with_infill_pct(40).infill_pct, 40);
    }

    #[test]
    fn queue_multiplier_is_clamped() {
        let p = QuoteParams::default().with_queue_multiplier(0.5);
        assert!((p.queue_multiplier - 1.0).abs() < f64::EPSILON);
        let p = QuoteParams::default().with_queue_multiplier(5.0);
        assert!((p.queue_multiplier - 2.0).abs() < f64::EPSILON);
        let p = QuoteParams::default().with_queue_multiplier(f64::NAN);
        assert!((p.queue_multiplier - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn material_is_normalized_on_entry() {
        let p = QuoteParams::new(Technology::Sla).with_material("granite");
        assert_eq!(p.material, "standard-resin");
    }
}
