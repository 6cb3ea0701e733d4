//! Print estimation engine for a 3D-print storefront.
//!
//! This umbrella crate re-exports all print-* crates, providing the
//! full quote pipeline behind one dependency: measure an uploaded
//! mesh, check it against the build volume, recommend an orientation,
//! price the job and freeze the result into a cart line item.
//!
//! # Quick Start
//!
//! ```
//! use print_engine::prelude::*;
//!
//! // Measure the uploaded geometry (here: a 40×60×40 mm box).
//! let mesh = solid_box(40.0, 60.0, 40.0);
//! let metrics = analyze_geometry(&mesh, SourceUnit::Millimeters);
//!
//! // Rank build orientations for a 60 mm tall print.
//! let advice = advise(&metrics.size, 60.0, DEFAULT_BED_MM);
//! let best = advice.best();
//!
//! // Preflight the chosen pose and price the job.
//! let report = evaluate(&best.dims, metrics.volume_cm3, metrics.volume_method, DEFAULT_BED_MM);
//! let estimate = compute_print_price(
//!     &QuoteParams::new(Technology::Sla)
//!         .with_dims(best.dims)
//!         .with_volume_cm3(metrics.volume_cm3)
//!         .with_hollow(true),
//! );
//!
//! assert!(!report.is_blocking());
//! assert_eq!(estimate.model, PriceModel::Smart);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Coordinate frames, bounds, mesh geometry, risk levels
//! - [`analyze`] - Mesh measurement with the volume sanity fallback
//! - [`preflight`] - Printability evaluation against the build volume
//! - [`orient`] - Build orientation ranking
//! - [`price`] - Smart and legacy price models
//! - [`upload`] - Client-side upload orchestration
//! - [`commerce`] - Cart line items, relationship refs, pairing codes
//!
//! # Feature Flags
//!
//! - `serde` - Serde derives on the core types

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Coordinate frames, bounds, mesh geometry, risk levels.
pub use print_types as types;

/// Mesh measurement with the volume sanity fallback.
pub use print_analyze as analyze;

/// Printability evaluation against the build volume.
pub use print_preflight as preflight;

/// Build orientation ranking.
pub use print_orient as orient;

/// Smart and legacy price models.
pub use print_price as price;

/// Client-side upload orchestration.
pub use print_upload as upload;

/// Cart line items, relationship refs, pairing codes.
pub use print_commerce as commerce;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for the quote pipeline.
///
/// # Usage
///
/// ```
/// use print_engine::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use print_types::{
        solid_box, MeshGeometry, PrinterDims, RiskStatus, SceneDims, SourceUnit, DEFAULT_BED_MM,
    };

    // Analysis
    pub use print_analyze::{analyze_geometry, MeshMetrics, VolumeMethod};

    // Preflight
    pub use print_preflight::{evaluate, IssueCode, PreflightReport};

    // Orientation
    pub use print_orient::{advise, advise_with_pricing, Orientation, OrientationAdvice};

    // Pricing
    pub use print_price::{
        compute_print_price, Confidence, PriceEstimate, PriceModel, Quality, QuoteParams,
        Technology,
    };

    // Commerce (main storefront use case)
    pub use print_commerce::{add_to_cart, CartLineItem, RelationshipRef};
}

// =============================================================================
// Tests
// =============================================================================
