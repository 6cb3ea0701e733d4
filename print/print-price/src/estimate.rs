//! The smart and legacy price models.

use tracing::debug;

use crate::catalog::{
    legacy_material_surcharge, material_rate_per_cm3, Technology, BASE_FEE, SMART_PRICE_CEILING,
    SMART_PRICE_FLOOR, VOLUME_HARD_CEILING_CM3,
};
use crate::params::QuoteParams;

/// Material volumes below this still bill as this minimum, cm³.
const MATERIAL_MIN_CM3: f64 = 4.0;

/// Volumes may exceed the bounding box by at most this factor before
/// the smart model refuses to trust them.
const VOLUME_BOUNDS_TOLERANCE: f64 = 1.15;

/// Which model produced the final price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceModel {
    /// Geometry-aware cost model.
    Smart,
    /// Flat surcharge table.
    Legacy,
}

/// How trustworthy the geometry inputs behind the estimate were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    /// Measured volume and dimensions were both available.
    High,
    /// Only dimensions were available.
    Medium,
    /// Neither, or the smart model was unavailable.
    Low,
}

/// Cost components of a successful smart estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmartBreakdown {
    /// Material cost including support and waste fractions.
    pub material_cost: f64,
    /// Machine-time cost.
    pub machine_cost: f64,
    /// Fixed post-processing cost.
    pub post_process_cost: f64,
    /// Estimated total machine hours.
    pub total_hours: f64,
    /// Complexity score, 0.08–0.95.
    pub complexity: f64,
    /// Risk margin fraction, 0.04–0.16.
    pub risk_pct: f64,
    /// Final rounded smart price.
    pub price: f64,
}

/// A computed price estimate.
///
/// The only persisted subset is what a cart line item copies out at
/// add-to-cart time; everything else is re-derived on each parameter
/// change.
#[derive(Debug, Clone)]
pub struct PriceEstimate {
    /// Final price (smart when available, legacy otherwise).
    pub price: f64,
    /// The always-available legacy price.
    pub legacy_price: f64,
    /// The smart price, when the geometry supported it.
    pub smart_price: Option<f64>,
    /// Which model `price` came from.
    pub model: PriceModel,
    /// Input trustworthiness.
    pub confidence: Confidence,
    /// Estimated machine hours (smart model only).
    pub hours: Option<f64>,
    /// Queue-load multiplier that was applied.
    pub queue_multiplier: f64,
}

/// Compute a price for one print job.
///
/// Pure and total: always returns a finite price and never panics. The
/// legacy table answers whenever the smart model's preconditions fail
/// (missing geometry, implausible volume, runaway price, or the feature
/// flag disabled).
///
/// # Example
///
/// ```
/// use print_price::{compute_print_price, Confidence, PriceModel, QuoteParams, Technology};
///
/// // No geometry at all: still priced, via the legacy table.
/// let estimate = compute_print_price(&QuoteParams::new(Technology::Fdm));
/// assert_eq!(estimate.model, PriceModel::Legacy);
/// assert_eq!(estimate.confidence, Confidence::Low);
/// assert!(estimate.price.is_finite());
/// ```
#[must_use]
pub fn compute_print_price(params: &QuoteParams) -> PriceEstimate {
    let legacy_price = legacy_price(params);
    let breakdown = if params.smart_pricing {
        smart_breakdown(params)
    } else {
        None
    };

    let confidence = match (params.volume_cm3, params.dims, &breakdown) {
        (Some(_), Some(_), Some(_)) => Confidence::High,
        (_, Some(_), Some(_)) => Confidence::Medium,
        _ => Confidence::Low,
    };

    match breakdown {
        Some(b) => PriceEstimate {
            price: b.price,
            legacy_price,
            smart_price: Some(b.price),
            model: PriceModel::Smart,
            confidence,
            hours: Some(b.total_hours),
            queue_multiplier: params.queue_multiplier,
        },
        None => {
            debug!(
                technology = params.technology.as_str(),
                "smart model unavailable, using legacy price"
            );
            PriceEstimate {
                price: legacy_price,
                legacy_price,
                smart_price: None,
                model: PriceModel::Legacy,
                confidence: Confidence::Low,
                hours: None,
                queue_multiplier: params.queue_multiplier,
            }
        }
    }
}

/// The flat legacy price: base fee plus technology, material and
/// quality surcharges. Always succeeds.
fn legacy_price(params: &QuoteParams) -> f64 {
    BASE_FEE
        + params.technology.legacy_surcharge()
        + legacy_material_surcharge(params.technology, params.material)
        + params.quality.legacy_surcharge()
}

/// Fraction of the effective volume that actually becomes material.
fn material_usage_factor(params: &QuoteParams) -> f64 {
    match params.technology {
        Technology::Sla => {
            if params.hollow {
                0.28
            } else {
                1.0
            }
        }
        Technology::Fdm => {
            let infill = f64::from(params.infill_pct) / 100.0;
            0.88f64.mul_add(infill, 0.12).clamp(0.12, 1.0)
        }
    }
}

/// The volume the cost model works from: the measured volume when
/// credible, otherwise a bounding-box estimate. `None` when neither is
/// usable.
fn effective_volume_cm3(params: &QuoteParams, bounds_volume: Option<f64>) -> Option<f64> {
    let measured = params
        .volume_cm3
        .filter(|v| v.is_finite() && *v > 0.0);

    let mut effective = match (measured, bounds_volume) {
        (Some(v), _) => v,
        (None, Some(b)) => b * params.technology.estimated_infill_ratio(),
        (None, None) => return None,
    };

    if let Some(b) = bounds_volume {
        effective = effective.min(VOLUME_BOUNDS_TOLERANCE * b);
    }

    (effective > 0.0 && effective <= VOLUME_HARD_CEILING_CM3).then_some(effective)
}

/// Run the geometry-aware model. `None` means "fall back to legacy".
fn smart_breakdown(params: &QuoteParams) -> Option<SmartBreakdown> {
    let bounds_volume = params
        .dims
        .map(|d| d.bounds_volume_cm3())
        .filter(|v| *v > 0.0);

    let effective_volume = effective_volume_cm3(params, bounds_volume)?;

    let fill_ratio = bounds_volume.map_or_else(
        || params.technology.estimated_infill_ratio(),
        |b| (effective_volume / b).min(1.0),
    );
    let slenderness = params
        .dims
        .map_or(0.0, |d| {
            let footprint = d.x.max(d.y);
            if footprint > 0.0 {
                d.z / footprint
            } else {
                0.0
            }
        });

    let complexity = (0.55 * (1.0 - fill_ratio)
        + 0.035 * (slenderness - 2.0).max(0.0)
        + params.quality.complexity_adder())
    .clamp(0.08, 0.95);

    let support_pct =
        0.24f64.mul_add(complexity, 0.08).clamp(0.08, params.technology.support_cap());
    let waste_pct = params.technology.waste_pct();

    let rate = material_rate_per_cm3(params.technology, params.material);
    let material_cost = (effective_volume * material_usage_factor(params)).max(MATERIAL_MIN_CM3)
        * (1.0 + support_pct + waste_pct)
        * rate;

    let height_mm = params.dims.map_or(0.0, |d| d.z);
    let time_volume = effective_volume.min(params.technology.time_volume_cap_cm3());
    let base_hours = match params.technology {
        Technology::Sla => 0.6 + height_mm * 0.04 + time_volume / 500.0,
        Technology::Fdm => 0.4 + time_volume / 28.0 + height_mm / 90.0,
    };
    let total_hours =
        base_hours * params.quality.time_multiplier() * 0.35f64.mul_add(complexity, 1.0);

    let machine_cost = total_hours * params.technology.machine_rate_per_hour();
    let post_process_cost =
        params.technology.post_process_fee() + params.quality.post_process_adder();

    let risk_pct = (0.08f64.mul_add(complexity, 0.04) + params.technology.risk_adder())
        .clamp(0.04, 0.16);

    let subtotal = BASE_FEE + material_cost + machine_cost + post_process_cost;
    let price = (subtotal * (1.0 + risk_pct) * params.queue_multiplier)
        .max(SMART_PRICE_FLOOR)
        .round();

    if !price.is_finite() || price > SMART_PRICE_CEILING {
        debug!(price, "smart price rejected");
        return None;
    }

    Some(SmartBreakdown {
        material_cost,
        machine_cost,
        post_process_cost,
        total_hours,
        complexity,
        risk_pct,
        price,
    })
}
