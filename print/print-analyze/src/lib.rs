//! Mesh geometry analysis for the print estimation engine.
//!
//! Given a parsed triangle mesh and a declared source unit, computes
//! the physical dimensions (mm) and material volume (cm³) that feed
//! the preflight evaluator, orientation advisor and price estimator.
//!
//! The divergence-theorem volume is exact only for closed,
//! consistently-wound meshes; anything else yields plausible-but-wrong
//! numbers. The analyzer therefore sanity-checks the mesh volume
//! against the bounding-box volume and substitutes a conservative
//! occupancy-based estimate when the mesh result is not credible.
//!
//! # Example
//!
//! ```
//! use print_analyze::{analyze_geometry, VolumeMethod};
//! use print_types::{solid_box, SourceUnit};
//!
//! let mesh = solid_box(40.0, 60.0, 40.0);
//! let metrics = analyze_geometry(&mesh, SourceUnit::Millimeters);
//!
//! assert_eq!(metrics.volume_method, VolumeMethod::Mesh);
//! assert!((metrics.volume_cm3 - 96.0).abs() < 1e-6);
//! assert!((metrics.size.y - 60.0).abs() < 1e-10);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod metrics;

pub use metrics::{
    analyze_geometry, MeshMetrics, VolumeMethod, FALLBACK_OCCUPANCY, VOLUME_TOLERANCE_RATIO,
};
