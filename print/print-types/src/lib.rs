//! Core types for the print estimation engine.
//!
//! This crate provides the foundational vocabulary shared by the
//! estimation crates:
//!
//! - [`MeshGeometry`] - An immutable triangle soup with optional indices
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`SceneDims`] / [`PrinterDims`] - The two coordinate-frame framings
//!   of a physical bounding box
//! - [`SourceUnit`] - Declared or inferred source file units
//! - [`RiskStatus`] - Shared ok / risk / critical classification
//!
//! # Units
//!
//! Dimension types are always **millimeters**. Raw geometry arrives in
//! whatever unit the source file used ([`SourceUnit`] tells the analyzer
//! how to scale it); once a [`SceneDims`] or [`PrinterDims`] exists it is
//! millimeters, full stop.
//!
//! # Coordinate Frames
//!
//! Two frames describe the same physical box and must never be silently
//! conflated:
//!
//! - **Scene frame** ([`SceneDims`]): the convention uploaded models and
//!   the render layer use. **Y is up.**
//! - **Printer frame** ([`PrinterDims`]): the build-chamber convention.
//!   **Z is up.**
//!
//! Conversion is an explicit, named operation in each direction
//! ([`SceneDims::to_printer`], [`PrinterDims::to_scene`]); a bare
//! `{x, y, z}` without a frame tag does not exist in this workspace.
//!
//! # Example
//!
//! ```
//! use print_types::{MeshGeometry, SceneDims};
//!
//! // A single triangle, 10 mm wide
//! let mesh = MeshGeometry::from_raw(
//!     &[0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 5.0, 5.0, 0.0],
//!     None,
//! );
//! assert_eq!(mesh.triangle_count(), 1);
//!
//! let size = mesh.bounds().size();
//! let dims = SceneDims::new(size.x, size.y, size.z);
//! assert!((dims.to_printer().z - 5.0).abs() < 1e-10);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod frames;
mod geometry;
mod risk;
mod units;

pub use bounds::Aabb;
pub use frames::{PrinterDims, SceneDims, DEFAULT_BED_MM};
pub use geometry::{solid_box, MeshGeometry};
pub use risk::RiskStatus;
pub use units::{infer_source_unit, SourceUnit};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
