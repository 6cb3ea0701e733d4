//! Price and print-time estimation.
//!
//! Converts geometry plus process parameters (technology, material,
//! quality tier, hollow/infill, queue load) into a cost and elapsed-time
//! estimate without running a slicer.
//!
//! Two models exist:
//!
//! - **Smart**: geometry-aware costs (material usage, machine time,
//!   post processing, risk margin) derived from measured volume and
//!   dimensions.
//! - **Legacy**: a flat surcharge table that is always available.
//!
//! [`compute_print_price`] is pure and **total**: it always returns a
//! valid price, silently falling back to the legacy model whenever the
//! smart model's preconditions are not met. The caller can see which
//! model won through [`PriceEstimate::model`] and how trustworthy the
//! inputs were through [`PriceEstimate::confidence`].
//!
//! # Example
//!
//! ```
//! use print_price::{compute_print_price, PriceModel, QuoteParams, Technology};
//! use print_types::PrinterDims;
//!
//! let params = QuoteParams::new(Technology::Sla)
//!     .with_dims(PrinterDims::new(40.0, 40.0, 60.0))
//!     .with_volume_cm3(96.0)
//!     .with_hollow(true);
//!
//! let estimate = compute_print_price(&params);
//! assert_eq!(estimate.model, PriceModel::Smart);
//! assert!(estimate.price >= 450.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod catalog;
mod estimate;
mod params;

pub use catalog::{
    material_rate_per_cm3, normalize_material, Quality, Technology, BASE_FEE, SMART_PRICE_CEILING,
    SMART_PRICE_FLOOR, VOLUME_HARD_CEILING_CM3,
};
pub use estimate::{compute_print_price, Confidence, PriceEstimate, PriceModel, SmartBreakdown};
pub use params::QuoteParams;
