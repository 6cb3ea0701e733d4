//! Preflight manufacturability checks.
//!
//! Given the final post-scale dimensions and volume of an uploaded
//! model, flags issues (too large for the bed, unverified geometry,
//! extreme proportions) and assigns an overall [`RiskStatus`].
//!
//! The evaluator is a pure function of its inputs. It escalates to
//! `Critical` only for physically impossible configurations (exceeds
//! the bed) or unanalyzable input; subjective quality concerns never
//! block, they only mark `Risk`.
//!
//! # Example
//!
//! ```
//! use print_analyze::VolumeMethod;
//! use print_preflight::evaluate;
//! use print_types::{PrinterDims, RiskStatus, DEFAULT_BED_MM};
//!
//! let dims = PrinterDims::new(40.0, 40.0, 60.0);
//! let report = evaluate(&dims, 96.0, VolumeMethod::Mesh, DEFAULT_BED_MM);
//!
//! assert_eq!(report.status, RiskStatus::Ok);
//! assert!(report.issues.is_empty());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod issues;
mod report;

pub use issues::{IssueCode, PreflightIssue};
pub use report::{evaluate, PreflightReport, SLENDERNESS_THRESHOLD};
