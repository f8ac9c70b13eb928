//! API-boundary errors (spec.md §7: "No error is surfaced as an exception
//! across the core's public surface" — this covers the numerical paths
//! only; the handful of genuinely exceptional construction-time failures
//! below are the exception to that rule).
//!
//! Mirrors the teacher's `ephemeris::table::EphemerisTableError` shape
//! (`#[derive(thiserror::Error, Debug)]`, one variant per failure mode,
//! `#[error("...")]` messages with interpolated context).

use thiserror::Error;

/// Errors raised constructing or validating core data, never by the
/// numerical propagation/prediction/crossing surfaces (those substitute a
/// safe fallback and log instead, per §7).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("non-finite value in celestial body catalog entry {name}")]
    NonFiniteCatalogEntry { name: &'static str },

    #[error("gravitational parameter must be positive, got {mu}")]
    NonPositiveMu { mu: f64 },

    #[error("unknown body {name} requested from catalog")]
    UnknownBody { name: String },
}
