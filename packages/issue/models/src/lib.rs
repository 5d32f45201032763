#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Citizen issue taxonomy types and the reported-issue record model.
//!
//! This crate defines the canonical issue type enumeration, severity
//! ordinals, and status values used across the entire civic-map system.
//! The analytics engine, persistence layer, and presentation layer all
//! share these types; the enumeration order defined here is also the
//! documented tie-break order for every ranked analytics output.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Severity level for a reported issue, from 1 (low) to 4 (critical).
///
/// The numeric mapping {Low: 1, Medium: 2, High: 3, Critical: 4} is a
/// process-wide constant: every analytics component averages and scores
/// severities through [`IssueSeverity::score`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IssueSeverity {
    /// Nuisance-level issue with no immediate impact
    Low = 1,
    /// Noticeable impact, routine response
    Medium = 2,
    /// Significant impact, expedited response
    High = 3,
    /// Danger to health or safety, immediate response
    Critical = 4,
}

impl IssueSeverity {
    /// Returns the ordinal score of this severity level.
    #[must_use]
    pub const fn score(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from an ordinal score.
    ///
    /// # Errors
    ///
    /// Returns an error if the score is not in the range 1-4.
    pub const fn from_score(score: u8) -> Result<Self, InvalidSeverityError> {
        match score {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            4 => Ok(Self::Critical),
            _ => Err(InvalidSeverityError { score }),
        }
    }

    /// Returns all variants in ordinal order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// Error returned when attempting to create an [`IssueSeverity`] from an
/// invalid ordinal score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid score that was provided.
    pub score: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity score {}: expected 1-4", self.score)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Category of a reported issue.
///
/// The order of variants is the canonical enumeration order: it defines
/// the stable integer encoding returned by [`IssueType::code`] and the
/// tie-break order for ranked analytics output. Appending new variants is
/// backward compatible; reordering existing ones is a breaking change to
/// any stored encoded value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IssueType {
    /// Smog, emissions, burning, dust
    #[serde(rename = "Air Quality")]
    #[strum(serialize = "Air Quality")]
    AirQuality,
    /// Contaminated supply, sewage discharge, standing water
    #[serde(rename = "Water Pollution")]
    #[strum(serialize = "Water Pollution")]
    WaterPollution,
    /// Uncollected garbage, illegal dumping, overflowing bins
    #[serde(rename = "Waste Management")]
    #[strum(serialize = "Waste Management")]
    WasteManagement,
    /// Construction, traffic, industrial, or amplified noise
    #[serde(rename = "Noise Pollution")]
    #[strum(serialize = "Noise Pollution")]
    NoisePollution,
    /// Broken roads, streetlights, drainage, public structures
    Infrastructure,
    /// Missing or inaccessible medical services
    #[serde(rename = "Healthcare Access")]
    #[strum(serialize = "Healthcare Access")]
    HealthcareAccess,
    /// Hazardous conditions and personal-safety concerns
    #[serde(rename = "Public Safety")]
    #[strum(serialize = "Public Safety")]
    PublicSafety,
    /// Transit availability, road safety, congestion
    Transportation,
    /// Issues that don't fit any other category
    Other,
}

impl IssueType {
    /// Returns the stable integer encoding of this type: its index in
    /// [`IssueType::all`]. Comparable across calls and processes as long
    /// as the enumeration version is unchanged.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns all variants in canonical enumeration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AirQuality,
            Self::WaterPollution,
            Self::WasteManagement,
            Self::NoisePollution,
            Self::Infrastructure,
            Self::HealthcareAccess,
            Self::PublicSafety,
            Self::Transportation,
            Self::Other,
        ]
    }
}

/// Lifecycle status of a reported issue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IssueStatus {
    /// Reported, not yet triaged
    Open,
    /// Assigned and being worked
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    /// Fixed and verified
    Resolved,
    /// Closed without resolution (duplicate, invalid, won't fix)
    Closed,
}

impl IssueStatus {
    /// Returns all variants in lifecycle order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Open, Self::InProgress, Self::Resolved, Self::Closed]
    }
}

/// A single citizen-reported issue as stored by the persistence layer.
///
/// The analytics engine treats records as immutable input. `date_reported`
/// is kept as the raw stored string because upstream data is known to
/// contain malformed timestamps; [`IssueRecord::reported_at`] coerces it
/// lazily and time-based analyses drop records it cannot parse. Spatial
/// analyses keep them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    /// Unique identifier.
    pub id: u64,
    /// Short human-readable title.
    pub title: String,
    /// Issue category.
    pub issue_type: IssueType,
    /// Severity, if one was assigned. Missing severity scores 0.
    pub severity: Option<IssueSeverity>,
    /// Free-text location description (display only).
    pub location: String,
    /// Free-text description.
    pub description: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Lifecycle status.
    pub status: IssueStatus,
    /// Raw reported-at timestamp as stored; may be malformed.
    pub date_reported: String,
}

impl IssueRecord {
    /// Coerces the raw `date_reported` string into a timestamp.
    ///
    /// Returns `None` for malformed values; callers in time-based analyses
    /// drop such records, spatial analyses retain them.
    #[must_use]
    pub fn reported_at(&self) -> Option<NaiveDateTime> {
        coerce_datetime(&self.date_reported)
    }

    /// Returns the ordinal severity score, 0 when no severity is assigned.
    #[must_use]
    pub fn severity_score(&self) -> u8 {
        self.severity.map_or(0, IssueSeverity::score)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub fn has_finite_coordinates(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Validates the record against required-field and coordinate rules
    /// before it is accepted into the store.
    ///
    /// # Errors
    ///
    /// Returns [`IssueValidationError`] when a required text field is
    /// empty or the coordinates are non-finite or outside `bounds`.
    pub fn validate(&self, bounds: &CoordinateBounds) -> Result<(), IssueValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("location", &self.location),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(IssueValidationError::MissingField { field });
            }
        }

        if !self.has_finite_coordinates() {
            return Err(IssueValidationError::NonFiniteCoordinates {
                lat: self.lat,
                lon: self.lon,
            });
        }

        if !bounds.contains(self.lat, self.lon) {
            return Err(IssueValidationError::OutOfBounds {
                lat: self.lat,
                lon: self.lon,
            });
        }

        Ok(())
    }
}

/// Error returned when an [`IssueRecord`] fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IssueValidationError {
    /// A required text field is empty or whitespace.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// Latitude or longitude is NaN or infinite.
    #[error("non-finite coordinates ({lat}, {lon})")]
    NonFiniteCoordinates {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },

    /// Coordinates fall outside the configured metro region.
    #[error("coordinates ({lat}, {lon}) outside the configured region")]
    OutOfBounds {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
}

/// Plausible coordinate bounds for the metro region being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateBounds {
    /// Minimum latitude, inclusive.
    pub min_lat: f64,
    /// Maximum latitude, inclusive.
    pub max_lat: f64,
    /// Minimum longitude, inclusive.
    pub min_lon: f64,
    /// Maximum longitude, inclusive.
    pub max_lon: f64,
}

impl CoordinateBounds {
    /// Returns `true` if the point falls within the bounds.
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

impl Default for CoordinateBounds {
    /// Bounds of the Lahore metro region, the reference deployment.
    fn default() -> Self {
        Self {
            min_lat: 31.2,
            max_lat: 31.9,
            min_lon: 73.9,
            max_lon: 74.7,
        }
    }
}

/// Coerces a stored timestamp string into a [`NaiveDateTime`].
///
/// Accepts the three shapes present in the record store: space-separated
/// datetime, ISO 8601 `T`-separated datetime (with or without fractional
/// seconds), and bare date (midnight). Returns `None` for anything else.
#[must_use]
pub fn coerce_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
