//! Calculation logic for the bill offset calculators.
//!
//! Both calculators are pure functions of their inputs: the perpetuity
//! calculator sizes an investment to pay one bill forever, and the projection
//! calculator grows an investment and checks it against a list of bills.

pub mod common;
pub mod coverage;
pub mod perpetuity;
pub mod projection;

pub use coverage::{CoveragePolicy, evaluate_coverage, evaluate_coverage_with_policy};
pub use perpetuity::{
    PerpetuityCalculator, PerpetuityError, PerpetuityFigures, PerpetuityInput, PerpetuityResult,
};
pub use projection::{
    ProjectionCalculator, ProjectionError, ProjectionResult, effective_roi, future_value,
};
