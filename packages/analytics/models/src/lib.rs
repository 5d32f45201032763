#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived-metric result types and tuning parameters for the analytics
//! engine.
//!
//! Every detector in `civic_map_analytics` consumes a parameter struct and
//! produces a vector (or record) of the result types defined here. The
//! parameter structs exist because the reference thresholds (cluster
//! radius, growth cutoffs, forecast drift) are domain-tuning decisions,
//! not algorithmic ones; `Default` impls preserve the reference numerics.

use chrono::NaiveDate;
use civic_map_issue_models::{IssueSeverity, IssueStatus, IssueType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A dense geographic cluster of issue reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Cluster center latitude (mean of member coordinates).
    pub lat: f64,
    /// Cluster center longitude (mean of member coordinates).
    pub lon: f64,
    /// Number of member issues.
    pub issue_count: u64,
    /// Risk score: `(issue_count * 0.4 + avg_severity * 0.6) * 10`,
    /// rounded to 2 decimals.
    pub risk_score: f64,
    /// Most frequent issue type among members.
    pub primary_type: IssueType,
    /// Mean severity score of members, rounded to 2 decimals.
    pub avg_severity: f64,
}

/// Qualitative label on an emerging issue's growth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum GrowthTrend {
    /// Growth rate above the strong-growth threshold
    Increasing,
    /// Growth above the inclusion threshold but below strong growth
    Rising,
}

/// An issue type whose report frequency is growing between trailing
/// windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergingIssue {
    /// The growing issue type.
    pub issue_type: IssueType,
    /// Report count in the recent window.
    pub recent_count: u64,
    /// Percentage change between the older and recent windows, rounded
    /// to 1 decimal.
    pub growth_rate: f64,
    /// Mean severity score of recent-window reports, rounded to
    /// 2 decimals (2.0 when no severity was assigned in the window).
    pub avg_severity: f64,
    /// Qualitative growth label.
    pub trend: GrowthTrend,
}

/// Direction of the daily issue-volume trend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrendDirection {
    /// Recent average at or above the increase ratio of the previous one
    Increasing,
    /// Recent average at or below the decrease ratio of the previous one
    Decreasing,
    /// Insufficient history, or change within the ratio band
    Stable,
}

/// One day of the issue-volume forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Forecast calendar day.
    pub date: NaiveDate,
    /// Predicted issue count for the day.
    pub predicted_issues: u64,
    /// Trend direction the prediction was derived from.
    pub trend: TrendDirection,
}

/// A short-horizon daily issue-volume forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendForecast {
    /// Per-day predictions, one per horizon day.
    pub points: Vec<ForecastPoint>,
    /// Trailing-window mean daily count, rounded to 1 decimal.
    pub current_avg: f64,
    /// Overall trend direction.
    pub trend_direction: TrendDirection,
}

/// Proximity co-occurrence between two issue types.
///
/// The pair is unordered; `type_a`/`type_b` are stored in enumeration
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationPair {
    /// First type of the pair (lower enumeration code).
    pub type_a: IssueType,
    /// Second type of the pair (higher enumeration code).
    pub type_b: IssueType,
    /// `co_occurrences / min(cells_a, cells_b) * 100`, rounded to
    /// 1 decimal.
    pub correlation: f64,
    /// Number of grid cells containing both types.
    pub co_occurrences: u64,
}

/// Tuning parameters for hotspot detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotParams {
    /// Neighborhood radius in decimal degrees (street-block scale).
    pub epsilon_degrees: f64,
    /// Minimum neighbors (self included) for a core point.
    pub min_neighbors: usize,
    /// Minimum members for a cluster to be reported.
    pub min_cluster_size: usize,
    /// Minimum total records before detection runs at all.
    pub min_records: usize,
}

impl Default for HotspotParams {
    fn default() -> Self {
        Self {
            epsilon_degrees: 0.02,
            min_neighbors: 3,
            min_cluster_size: 3,
            min_records: 10,
        }
    }
}

/// Tuning parameters for emerging-issue detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergingIssueParams {
    /// Width of each trailing window in days.
    pub window_days: i64,
    /// Minimum growth percentage for inclusion (exclusive).
    pub growth_threshold_pct: f64,
    /// Growth percentage above which the trend label is `Increasing`
    /// rather than `Rising` (exclusive).
    pub strong_growth_pct: f64,
    /// Minimum recent-window count for inclusion.
    pub min_recent_count: u64,
    /// Minimum total records before detection runs at all.
    pub min_records: usize,
}

impl Default for EmergingIssueParams {
    fn default() -> Self {
        Self {
            window_days: 30,
            growth_threshold_pct: 20.0,
            strong_growth_pct: 50.0,
            min_recent_count: 3,
            min_records: 20,
        }
    }
}

/// Tuning parameters for the trend forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastParams {
    /// Width of the moving-average window in days.
    pub window_days: usize,
    /// Per-day drift applied when the trend is not stable.
    pub drift_per_day: f64,
    /// Recent/previous ratio at or above which the trend is increasing.
    pub increase_ratio: f64,
    /// Recent/previous ratio at or below which the trend is decreasing.
    pub decrease_ratio: f64,
    /// Minimum total records before a forecast is produced.
    pub min_records: usize,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            window_days: 7,
            drift_per_day: 0.02,
            increase_ratio: 1.2,
            decrease_ratio: 0.8,
            min_records: 10,
        }
    }
}

/// Tuning parameters for the correlation analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationParams {
    /// Decimal places coordinates are rounded to when bucketing into
    /// grid cells (2 decimals is roughly a 1.1 km cell).
    pub cell_decimals: u8,
    /// Minimum correlation percentage for inclusion (exclusive).
    pub correlation_threshold_pct: f64,
    /// Minimum total records before analysis runs at all.
    pub min_records: usize,
}

impl Default for CorrelationParams {
    fn default() -> Self {
        Self {
            cell_decimals: 2,
            correlation_threshold_pct: 20.0,
            min_records: 20,
        }
    }
}

/// Priority band derived from an estimated resolution time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ResolutionPriority {
    /// Estimated at 2 days or less
    High,
    /// Estimated at 3-5 days
    Medium,
    /// Estimated at more than 5 days
    Normal,
}

/// Heuristic resolution-time estimate for a single issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionEstimate {
    /// Estimated days to resolution.
    pub estimated_days: u32,
    /// Priority band implied by the estimate.
    pub priority: ResolutionPriority,
    /// Confidence label for the heuristic.
    pub confidence: String,
}

/// Status breakdown and resolution rates for the issue set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionStats {
    /// Total issues considered.
    pub total_issues: u64,
    /// Issues with status `Resolved`.
    pub resolved: u64,
    /// Issues with status `In Progress`.
    pub in_progress: u64,
    /// Issues with status `Open`.
    pub open: u64,
    /// Issues with status `Closed`.
    pub closed: u64,
    /// Resolved share of all issues, percent rounded to 1 decimal.
    pub resolution_rate_pct: f64,
    /// Resolved share of issues reported in the trailing window, percent
    /// rounded to 1 decimal (0 when no dated records fall inside).
    pub recent_resolution_rate_pct: f64,
}

/// Count of issues of a single type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    /// Issue type.
    pub issue_type: IssueType,
    /// Number of issues.
    pub count: u64,
}

/// Count of issues at a single severity level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCount {
    /// Severity level.
    pub severity: IssueSeverity,
    /// Number of issues.
    pub count: u64,
}

/// Count of issues in a single status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// Lifecycle status.
    pub status: IssueStatus,
    /// Number of issues.
    pub count: u64,
}

/// Summary statistics over the full issue set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStatistics {
    /// Total issues.
    pub total_issues: u64,
    /// Issues with status `Open`.
    pub open_issues: u64,
    /// Issues with status `Resolved`.
    pub resolved_issues: u64,
    /// Issues with severity `Critical`.
    pub critical_issues: u64,
    /// Per-type counts, descending (enumeration order on ties).
    pub by_type: Vec<TypeCount>,
    /// Per-severity counts, descending (ordinal order on ties).
    pub by_severity: Vec<SeverityCount>,
    /// Per-status counts, descending (lifecycle order on ties).
    pub by_status: Vec<StatusCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotspot_defaults_match_reference_constants() {
        let p = HotspotParams::default();
        assert!((p.epsilon_degrees - 0.02).abs() < f64::EPSILON);
        assert_eq!(p.min_neighbors, 3);
        assert_eq!(p.min_cluster_size, 3);
        assert_eq!(p.min_records, 10);
    }

    #[test]
    fn emerging_defaults_match_reference_constants() {
        let p = EmergingIssueParams::default();
        assert_eq!(p.window_days, 30);
        assert!((p.growth_threshold_pct - 20.0).abs() < f64::EPSILON);
        assert!((p.strong_growth_pct - 50.0).abs() < f64::EPSILON);
        assert_eq!(p.min_recent_count, 3);
        assert_eq!(p.min_records, 20);
    }

    #[test]
    fn forecast_defaults_match_reference_constants() {
        let p = ForecastParams::default();
        assert_eq!(p.window_days, 7);
        assert!((p.drift_per_day - 0.02).abs() < f64::EPSILON);
        assert!((p.increase_ratio - 1.2).abs() < f64::EPSILON);
        assert!((p.decrease_ratio - 0.8).abs() < f64::EPSILON);
        assert_eq!(p.min_records, 10);
    }

    #[test]
    fn correlation_defaults_match_reference_constants() {
        let p = CorrelationParams::default();
        assert_eq!(p.cell_decimals, 2);
        assert!((p.correlation_threshold_pct - 20.0).abs() < f64::EPSILON);
        assert_eq!(p.min_records, 20);
    }

    #[test]
    fn trend_direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TrendDirection::Increasing).unwrap(),
            "\"increasing\""
        );
        assert_eq!(TrendDirection::Stable.to_string(), "stable");
    }

    #[test]
    fn hotspot_serializes_camel_case() {
        let hotspot = Hotspot {
            lat: 31.52,
            lon: 74.35,
            issue_count: 5,
            risk_score: 38.0,
            primary_type: IssueType::AirQuality,
            avg_severity: 3.0,
        };
        let json = serde_json::to_value(&hotspot).unwrap();
        assert_eq!(json["issueCount"], 5);
        assert_eq!(json["riskScore"], 38.0);
        assert_eq!(json["primaryType"], "Air Quality");
    }
}
