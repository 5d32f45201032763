#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory analytics engine over citizen issue reports.
//!
//! Each module implements one detector as a pure synchronous function
//! over an immutable `&[IssueRecord]` snapshot: spatial hotspot
//! clustering, emerging-issue growth, short-horizon volume forecasting,
//! type co-occurrence correlation, plus resolution-time heuristics and
//! status statistics for the dashboard's summary panels.
//!
//! Detectors never return errors. Insufficient data yields an empty
//! result (or `None` for the forecaster), malformed records are excluded
//! from time-based computations only, and internal degeneracies are
//! absorbed at the function boundary with a `log::warn!`. Evaluation
//! time is always an explicit parameter so results are deterministic and
//! callers can compute analytics for any snapshot instant.

pub mod correlation;
pub mod emerging;
pub mod features;
pub mod forecast;
pub mod hotspots;
pub mod resolution;
pub mod stats;

/// Rounds to 1 decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
