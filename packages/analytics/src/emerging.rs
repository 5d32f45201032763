//! Emerging-issue detection: trailing-window growth comparison.
//!
//! Counts reports per issue type in the last `window_days` before the
//! evaluation instant and in the `window_days` before that, then flags
//! types whose growth clears the inclusion threshold. Records whose
//! reported-at timestamp cannot be coerced are excluded here (but not
//! from spatial analyses).

use chrono::{Duration, NaiveDateTime};
use civic_map_analytics_models::{EmergingIssue, EmergingIssueParams, GrowthTrend};
use civic_map_issue_models::{IssueRecord, IssueType};

use crate::{round1, round2};

/// Detects issue types with statistically visible growth between the two
/// trailing windows ending at `evaluated_at`.
///
/// Returns an empty list when fewer than `params.min_records` records are
/// supplied.
#[must_use]
pub fn detect_emerging_issues(
    records: &[IssueRecord],
    evaluated_at: NaiveDateTime,
    params: &EmergingIssueParams,
) -> Vec<EmergingIssue> {
    if records.len() < params.min_records {
        return Vec::new();
    }

    let recent_cutoff = evaluated_at - Duration::days(params.window_days);
    let older_cutoff = evaluated_at - Duration::days(2 * params.window_days);

    let dated: Vec<(&IssueRecord, NaiveDateTime)> = records
        .iter()
        .filter_map(|r| r.reported_at().map(|dt| (r, dt)))
        .collect();

    let mut emerging = Vec::new();
    for issue_type in IssueType::all() {
        let recent: Vec<&IssueRecord> = dated
            .iter()
            .filter(|(r, dt)| r.issue_type == *issue_type && *dt >= recent_cutoff)
            .map(|(r, _)| *r)
            .collect();
        let older_count = dated
            .iter()
            .filter(|(r, dt)| {
                r.issue_type == *issue_type && *dt >= older_cutoff && *dt < recent_cutoff
            })
            .count() as u64;
        let recent_count = recent.len() as u64;

        #[allow(clippy::cast_precision_loss)]
        let growth_rate = if older_count > 0 {
            (recent_count as f64 - older_count as f64) / older_count as f64 * 100.0
        } else if recent_count > 0 {
            100.0
        } else {
            0.0
        };

        if growth_rate <= params.growth_threshold_pct || recent_count < params.min_recent_count {
            continue;
        }

        emerging.push(EmergingIssue {
            issue_type: *issue_type,
            recent_count,
            growth_rate: round1(growth_rate),
            avg_severity: recent_window_severity(&recent),
            trend: if growth_rate > params.strong_growth_pct {
                GrowthTrend::Increasing
            } else {
                GrowthTrend::Rising
            },
        });
    }

    // Stable sort keeps enumeration order on growth-rate ties.
    emerging.sort_by(|a, b| {
        b.growth_rate
            .partial_cmp(&a.growth_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    emerging
}

/// Mean severity score of the recent-window records, 2.0 when none of
/// them has an assigned severity.
fn recent_window_severity(recent: &[&IssueRecord]) -> f64 {
    let scores: Vec<f64> = recent
        .iter()
        .filter_map(|r| r.severity.map(|s| f64::from(s.score())))
        .collect();
    if scores.is_empty() {
        2.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        round2(mean)
    }
}

#[cfg(test)]
mod tests {
    use civic_map_issue_models::IssueSeverity;

    use super::*;
    use crate::test_support::record;

    fn eval_time() -> NaiveDateTime {
        civic_map_issue_models::coerce_datetime("2025-08-31 12:00:00").unwrap()
    }

    /// `count` records of `issue_type` dated `days_back` days before the
    /// evaluation instant.
    fn batch(
        start_id: u64,
        issue_type: IssueType,
        severity: Option<IssueSeverity>,
        days_back: i64,
        count: u64,
    ) -> Vec<IssueRecord> {
        let date = (eval_time() - Duration::days(days_back))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        (0..count)
            .map(|k| record(start_id + k, issue_type, severity, 31.5, 74.3, &date))
            .collect()
    }

    #[test]
    fn nineteen_records_is_insufficient_signal() {
        let records = batch(1, IssueType::AirQuality, None, 5, 19);
        assert!(
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default())
                .is_empty()
        );
    }

    #[test]
    fn new_type_with_no_older_reports_scores_hundred() {
        let mut records = batch(1, IssueType::WasteManagement, Some(IssueSeverity::High), 10, 5);
        // Padding from a flat type that shows no growth.
        records.extend(batch(100, IssueType::Other, None, 10, 8));
        records.extend(batch(200, IssueType::Other, None, 40, 8));

        let emerging =
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default());
        assert_eq!(emerging.len(), 1);
        assert_eq!(emerging[0].issue_type, IssueType::WasteManagement);
        assert!((emerging[0].growth_rate - 100.0).abs() < 1e-9);
        assert_eq!(emerging[0].recent_count, 5);
        assert_eq!(emerging[0].trend, GrowthTrend::Increasing);
        assert!((emerging[0].avg_severity - 3.0).abs() < 1e-9);
    }

    #[test]
    fn moderate_growth_is_labeled_rising() {
        // 3 -> 4 is +33.3 %: above the 20 % inclusion threshold, below
        // the 50 % strong-growth threshold.
        let mut records = batch(1, IssueType::NoisePollution, Some(IssueSeverity::Low), 5, 4);
        records.extend(batch(10, IssueType::NoisePollution, Some(IssueSeverity::Low), 40, 3));
        records.extend(batch(100, IssueType::Other, None, 10, 7));
        records.extend(batch(200, IssueType::Other, None, 40, 7));

        let emerging =
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default());
        assert_eq!(emerging.len(), 1);
        assert_eq!(emerging[0].trend, GrowthTrend::Rising);
        assert!((emerging[0].growth_rate - 33.3).abs() < 1e-9);
    }

    #[test]
    fn growth_without_enough_recent_reports_is_excluded() {
        // 1 -> 2 doubles, but 2 recent reports is below the minimum of 3.
        let mut records = batch(1, IssueType::Transportation, None, 5, 2);
        records.extend(batch(10, IssueType::Transportation, None, 40, 1));
        records.extend(batch(100, IssueType::Other, None, 10, 9));
        records.extend(batch(200, IssueType::Other, None, 40, 9));

        let emerging =
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default());
        assert!(emerging.is_empty());
    }

    #[test]
    fn unparsable_dates_are_excluded_from_windows() {
        let mut records = batch(1, IssueType::PublicSafety, None, 10, 4);
        records.extend(batch(10, IssueType::PublicSafety, None, 40, 3));
        for k in 0..13 {
            records.push(record(
                300 + k,
                IssueType::PublicSafety,
                None,
                31.5,
                74.3,
                "garbage",
            ));
        }

        let emerging =
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default());
        assert_eq!(emerging.len(), 1);
        // Only the 4 dated recent reports count.
        assert_eq!(emerging[0].recent_count, 4);
        assert!((emerging[0].growth_rate - 33.3).abs() < 1e-9);
    }

    #[test]
    fn severity_defaults_when_recent_window_has_none_assigned() {
        let mut records = batch(1, IssueType::Infrastructure, None, 5, 5);
        records.extend(batch(100, IssueType::Other, None, 10, 8));
        records.extend(batch(200, IssueType::Other, None, 40, 8));

        let emerging =
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default());
        assert!((emerging[0].avg_severity - 2.0).abs() < 1e-9);
    }

    #[test]
    fn sorted_by_growth_rate_descending() {
        // AirQuality 2 -> 6 (+200 %), WaterPollution 4 -> 6 (+50 %).
        let mut records = batch(1, IssueType::AirQuality, None, 5, 6);
        records.extend(batch(10, IssueType::AirQuality, None, 40, 2));
        records.extend(batch(20, IssueType::WaterPollution, None, 5, 6));
        records.extend(batch(30, IssueType::WaterPollution, None, 40, 4));
        // Out of both windows; pads past the record minimum only.
        records.extend(batch(100, IssueType::Other, None, 70, 4));

        let emerging =
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default());
        assert_eq!(emerging.len(), 2);
        assert_eq!(emerging[0].issue_type, IssueType::AirQuality);
        assert!((emerging[0].growth_rate - 200.0).abs() < 1e-9);
        assert_eq!(emerging[1].issue_type, IssueType::WaterPollution);
        assert!((emerging[1].growth_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn equal_growth_ties_keep_enumeration_order() {
        // Both types double 3 -> 6.
        let mut records = batch(1, IssueType::HealthcareAccess, None, 5, 6);
        records.extend(batch(10, IssueType::HealthcareAccess, None, 40, 3));
        records.extend(batch(20, IssueType::WaterPollution, None, 5, 6));
        records.extend(batch(30, IssueType::WaterPollution, None, 40, 3));
        records.extend(batch(100, IssueType::Other, None, 70, 4));

        let emerging =
            detect_emerging_issues(&records, eval_time(), &EmergingIssueParams::default());
        assert_eq!(emerging.len(), 2);
        assert_eq!(emerging[0].issue_type, IssueType::WaterPollution);
        assert_eq!(emerging[1].issue_type, IssueType::HealthcareAccess);
    }
}
