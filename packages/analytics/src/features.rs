//! Feature preparation: raw issue records to a uniform numeric table.
//!
//! The other detectors consume records directly; the feature table is the
//! uniform representation handed to downstream model experiments and the
//! dashboard's export panel.

use civic_map_issue_models::IssueRecord;
use serde::{Deserialize, Serialize};

/// One row of the prepared feature table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRow {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Stable issue-type encoding from the versioned enumeration.
    pub type_code: u8,
    /// Severity ordinal, 0 when no severity is assigned.
    pub severity_score: u8,
    /// Report month 1-12, 0 when the date cannot be coerced.
    pub month: u32,
    /// Report day of week, Monday = 0, 0 also when the date cannot be
    /// coerced.
    pub day_of_week: u32,
}

/// Normalizes records into the feature table, one row per record.
///
/// Malformed individual fields never fail preparation: a missing severity
/// scores 0 and an unparsable date yields 0 for both derived date fields,
/// keeping the record available for spatial analyses.
#[must_use]
pub fn prepare_features(records: &[IssueRecord]) -> Vec<FeatureRow> {
    records
        .iter()
        .map(|record| {
            let (month, day_of_week) = record.reported_at().map_or((0, 0), |dt| {
                use chrono::Datelike as _;
                (dt.month(), dt.weekday().num_days_from_monday())
            });

            FeatureRow {
                lat: record.lat,
                lon: record.lon,
                type_code: record.issue_type.code(),
                severity_score: record.severity_score(),
                month,
                day_of_week,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use civic_map_issue_models::{IssueSeverity, IssueType};

    use super::*;
    use crate::test_support::record;

    #[test]
    fn empty_input_yields_empty_table() {
        assert!(prepare_features(&[]).is_empty());
    }

    #[test]
    fn derives_month_and_weekday() {
        // 2025-08-01 is a Friday.
        let records = vec![record(
            1,
            IssueType::AirQuality,
            Some(IssueSeverity::High),
            31.52,
            74.35,
            "2025-08-01 09:30:00",
        )];
        let rows = prepare_features(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, 8);
        assert_eq!(rows[0].day_of_week, 4);
        assert_eq!(rows[0].severity_score, 3);
        assert_eq!(rows[0].type_code, IssueType::AirQuality.code());
    }

    #[test]
    fn malformed_date_gets_neutral_defaults() {
        let records = vec![record(
            1,
            IssueType::Other,
            None,
            31.52,
            74.35,
            "not a date",
        )];
        let rows = prepare_features(&records);
        assert_eq!(rows[0].month, 0);
        assert_eq!(rows[0].day_of_week, 0);
        assert_eq!(rows[0].severity_score, 0);
    }

    #[test]
    fn feature_row_serializes_camel_case() {
        let records = vec![record(
            1,
            IssueType::WaterPollution,
            Some(IssueSeverity::Low),
            31.52,
            74.35,
            "2025-08-01",
        )];
        let json = serde_json::to_value(prepare_features(&records)).unwrap();
        assert_eq!(json[0]["typeCode"], IssueType::WaterPollution.code());
        assert_eq!(json[0]["severityScore"], 1);
        assert_eq!(json[0]["dayOfWeek"], 4);
    }

    #[test]
    fn one_row_per_record_in_input_order() {
        let records = vec![
            record(1, IssueType::AirQuality, None, 31.50, 74.30, "2025-08-01"),
            record(2, IssueType::Transportation, None, 31.51, 74.31, "bad"),
            record(3, IssueType::Other, None, f64::NAN, 74.32, "2025-08-02"),
        ];
        let rows = prepare_features(&records);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].type_code, IssueType::Transportation.code());
        assert!(rows[2].lat.is_nan());
    }
}
