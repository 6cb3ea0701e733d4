//! Technology, material and quality tables.
//!
//! All monetary constants are shop policy, fixed here rather than in a
//! database. Rates are per cm³ of material or per machine hour.

/// Flat base fee applied by both price models.
pub const BASE_FEE: f64 = 249.0;

/// Smart prices never drop below this floor.
pub const SMART_PRICE_FLOOR: f64 = 450.0;

/// Smart prices above this ceiling are rejected in favor of the legacy
/// model (a runaway estimate helps nobody).
pub const SMART_PRICE_CEILING: f64 = 250_000.0;

/// Effective volumes above this are rejected as implausible for the
/// shop's machines.
pub const VOLUME_HARD_CEILING_CM3: f64 = 12_000.0;

/// 3D printing technology offered by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Technology {
    /// Stereolithography (resin).
    Sla,
    /// Fused deposition modeling (filament).
    #[default]
    Fdm,
}

impl Technology {
    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sla => "SLA",
            Self::Fdm => "FDM",
        }
    }

    /// Canonical material used when an unrecognized one is requested.
    #[must_use]
    pub const fn canonical_material(self) -> &'static str {
        match self {
            Self::Sla => "standard-resin",
            Self::Fdm => "pla",
        }
    }

    /// Materials offered for this technology.
    #[must_use]
    pub const fn allowed_materials(self) -> &'static [&'static str] {
        match self {
            Self::Sla => &["standard-resin", "tough-resin", "clear-resin"],
            Self::Fdm => &["pla", "abs", "petg"],
        }
    }

    /// Assumed solid fraction when only a bounding box is known.
    #[must_use]
    pub const fn estimated_infill_ratio(self) -> f64 {
        match self {
            Self::Sla => 0.34,
            Self::Fdm => 0.24,
        }
    }

    /// Fixed material waste fraction (failed supports, purge, vat loss).
    #[must_use]
    pub const fn waste_pct(self) -> f64 {
        match self {
            Self::Sla => 0.12,
            Self::Fdm => 0.08,
        }
    }

    /// Upper bound on the support-material fraction.
    #[must_use]
    pub const fn support_cap(self) -> f64 {
        match self {
            Self::Sla => 0.42,
            Self::Fdm => 0.36,
        }
    }

    /// Cap on the volume fed into the time model, cm³.
    ///
    /// Huge models batch across jobs; uncapped volume would produce
    /// runaway time estimates.
    #[must_use]
    pub const fn time_volume_cap_cm3(self) -> f64 {
        match self {
            Self::Sla => 450.0,
            Self::Fdm => 700.0,
        }
    }

    /// Machine rate per hour.
    #[must_use]
    pub const fn machine_rate_per_hour(self) -> f64 {
        match self {
            Self::Sla => 140.0,
            Self::Fdm => 90.0,
        }
    }

    /// Fixed post-processing fee (wash/cure for SLA, deburr for FDM).
    #[must_use]
    pub const fn post_process_fee(self) -> f64 {
        match self {
            Self::Sla => 120.0,
            Self::Fdm => 40.0,
        }
    }

    /// Technology-specific adder to the risk margin.
    #[must_use]
    pub const fn risk_adder(self) -> f64 {
        match self {
            Self::Sla => 0.02,
            Self::Fdm => 0.0,
        }
    }

    /// Legacy flat surcharge for the technology.
    #[must_use]
    pub const fn legacy_surcharge(self) -> f64 {
        match self {
            Self::Sla => 200.0,
            Self::Fdm => 100.0,
        }
    }
}

/// Print quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    /// Standard layer height and finish.
    #[default]
    Standard,
    /// Finer layers, slower print, extra finishing.
    Pro,
}

impl Quality {
    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Pro => "pro",
        }
    }

    /// Multiplier on total machine time.
    #[must_use]
    pub const fn time_multiplier(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Pro => 1.4,
        }
    }

    /// Contribution to the complexity score.
    #[must_use]
    pub const fn complexity_adder(self) -> f64 {
        match self {
            Self::Standard => 0.05,
            Self::Pro => 0.12,
        }
    }

    /// Extra post-processing fee.
    #[must_use]
    pub const fn post_process_adder(self) -> f64 {
        match self {
            Self::Standard => 0.0,
            Self::Pro => 80.0,
        }
    }

    /// Legacy flat surcharge for the tier.
    #[must_use]
    pub const fn legacy_surcharge(self) -> f64 {
        match self {
            Self::Standard => 0.0,
            Self::Pro => 150.0,
        }
    }
}

/// Validate a requested material against the technology's allow-list.
///
/// Matching is case-insensitive on the trimmed input; anything
/// unrecognized falls back to the technology's canonical material.
///
/// # Example
///
/// ```
/// use print_price::{normalize_material, Technology};
///
/// assert_eq!(normalize_material(Technology::Fdm, " PETG "), "petg");
/// assert_eq!(normalize_material(Technology::Fdm, "unobtanium"), "pla");
/// ```
#[must_use]
pub fn normalize_material(technology: Technology, raw: &str) -> &'static str {
    let wanted = raw.trim().to_ascii_lowercase();
    technology
        .allowed_materials()
        .iter()
        .find(|m| **m == wanted)
        .copied()
        .unwrap_or_else(|| technology.canonical_material())
}

/// Material rate per cm³ for a normalized material name.
///
/// Unknown names price as the canonical material (the normalizer
/// should have run first).
#[must_use]
pub fn material_rate_per_cm3(technology: Technology, material: &str) -> f64 {
    match (technology, material) {
        (Technology::Sla, "tough-resin") => 18.0,
        (Technology::Sla, "clear-resin") => 16.0,
        (Technology::Sla, _) => 14.0,
        (Technology::Fdm, "abs") => 7.0,
        (Technology::Fdm, "petg") => 8.0,
        (Technology::Fdm, _) => 6.0,
    }
}

/// Legacy flat surcharge for a normalized material name.
#[must_use]
pub fn legacy_material_surcharge(technology: Technology, material: &str) -> f64 {
    match (technology, material) {
        (Technology::Sla, "tough-resin") => 180.0,
        (Technology::Sla, "clear-resin") => 150.0,
        (Technology::Sla, _) => 120.0,
        (Technology::Fdm, "abs") => 60.0,
        (Technology::Fdm, "petg") => 80.0,
        (Technology::Fdm, _) => 40.0,
    }
}
