//! Build-orientation recommendation.
//!
//! Given the base bounding box of a model (scene frame, Y-up) and a
//! target height, evaluates each of the three canonical build
//! orientations (upright, on-side about X, on-side about Y) for bed
//! fit, a heuristic tip/support risk score and an estimated print
//! duration, then ranks them and recommends the best.
//!
//! The orientation set is closed and enumerable; there is no general
//! rotation search. Every candidate is recomputed from scratch whenever
//! base dimensions, the height target or process options change.
//!
//! # Example
//!
//! ```
//! use print_orient::{advise, Orientation};
//! use print_types::{SceneDims, DEFAULT_BED_MM};
//!
//! let base = SceneDims::new(40.0, 60.0, 40.0);
//! let advice = advise(&base, 60.0, DEFAULT_BED_MM);
//!
//! assert_eq!(advice.candidates.len(), 3);
//! assert!(advice.candidates.iter().all(|c| c.fits_bed));
//! assert_eq!(advice.recommended, advice.candidates[0].orientation);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod advisor;
mod orientation;

pub use advisor::{advise, advise_with_pricing, OrientationAdvice, OrientationCandidate};
pub use orientation::Orientation;
