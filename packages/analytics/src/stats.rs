//! Status breakdowns and summary statistics for the dashboard panels.

use chrono::{Duration, NaiveDateTime};
use civic_map_analytics_models::{
    IssueStatistics, ResolutionStats, SeverityCount, StatusCount, TypeCount,
};
use civic_map_issue_models::{IssueRecord, IssueSeverity, IssueStatus, IssueType};

use crate::round1;

/// Computes status counts and resolution rates over the issue set.
///
/// `recent_resolution_rate_pct` covers issues reported in the trailing
/// `window_days` before `evaluated_at`; records with unparsable dates
/// count toward the overall rate but not the recent one. Returns `None`
/// on empty input.
#[must_use]
pub fn resolution_stats(
    records: &[IssueRecord],
    evaluated_at: NaiveDateTime,
    window_days: i64,
) -> Option<ResolutionStats> {
    if records.is_empty() {
        return None;
    }

    let count_status =
        |status: IssueStatus| records.iter().filter(|r| r.status == status).count() as u64;

    let total = records.len() as u64;
    let resolved = count_status(IssueStatus::Resolved);

    let cutoff = evaluated_at - Duration::days(window_days);
    let recent: Vec<&IssueRecord> = records
        .iter()
        .filter(|r| r.reported_at().is_some_and(|dt| dt >= cutoff))
        .collect();
    let recent_resolved = recent
        .iter()
        .filter(|r| r.status == IssueStatus::Resolved)
        .count() as u64;

    #[allow(clippy::cast_precision_loss)]
    let rate = resolved as f64 / total as f64 * 100.0;
    #[allow(clippy::cast_precision_loss)]
    let recent_rate = if recent.is_empty() {
        0.0
    } else {
        recent_resolved as f64 / recent.len() as f64 * 100.0
    };

    Some(ResolutionStats {
        total_issues: total,
        resolved,
        in_progress: count_status(IssueStatus::InProgress),
        open: count_status(IssueStatus::Open),
        closed: count_status(IssueStatus::Closed),
        resolution_rate_pct: round1(rate),
        recent_resolution_rate_pct: round1(recent_rate),
    })
}

/// Computes per-type, per-severity, and per-status breakdowns over the
/// full issue set. Returns `None` on empty input.
#[must_use]
pub fn issue_statistics(records: &[IssueRecord]) -> Option<IssueStatistics> {
    if records.is_empty() {
        return None;
    }

    let mut by_type: Vec<TypeCount> = IssueType::all()
        .iter()
        .map(|&issue_type| TypeCount {
            issue_type,
            count: records.iter().filter(|r| r.issue_type == issue_type).count() as u64,
        })
        .filter(|c| c.count > 0)
        .collect();
    by_type.sort_by(|a, b| b.count.cmp(&a.count));

    let mut by_severity: Vec<SeverityCount> = IssueSeverity::all()
        .iter()
        .map(|&severity| SeverityCount {
            severity,
            count: records.iter().filter(|r| r.severity == Some(severity)).count() as u64,
        })
        .filter(|c| c.count > 0)
        .collect();
    by_severity.sort_by(|a, b| b.count.cmp(&a.count));

    let mut by_status: Vec<StatusCount> = IssueStatus::all()
        .iter()
        .map(|&status| StatusCount {
            status,
            count: records.iter().filter(|r| r.status == status).count() as u64,
        })
        .filter(|c| c.count > 0)
        .collect();
    by_status.sort_by(|a, b| b.count.cmp(&a.count));

    Some(IssueStatistics {
        total_issues: records.len() as u64,
        open_issues: records
            .iter()
            .filter(|r| r.status == IssueStatus::Open)
            .count() as u64,
        resolved_issues: records
            .iter()
            .filter(|r| r.status == IssueStatus::Resolved)
            .count() as u64,
        critical_issues: records
            .iter()
            .filter(|r| r.severity == Some(IssueSeverity::Critical))
            .count() as u64,
        by_type,
        by_severity,
        by_status,
    })
}
