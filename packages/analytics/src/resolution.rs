//! Heuristic resolution-time estimation.
//!
//! No model behind this: base days come from the severity band and get
//! scaled by a per-type multiplier reflecting how much coordination each
//! category historically needs (infrastructure work is slow, safety
//! responses are fast).

use civic_map_analytics_models::{ResolutionEstimate, ResolutionPriority};
use civic_map_issue_models::{IssueSeverity, IssueType};

/// Base resolution days by severity; missing severity is treated as
/// Medium.
const fn base_days(severity: Option<IssueSeverity>) -> u32 {
    match severity {
        Some(IssueSeverity::Low) => 7,
        Some(IssueSeverity::Medium) | None => 5,
        Some(IssueSeverity::High) => 3,
        Some(IssueSeverity::Critical) => 1,
    }
}

/// Per-type effort multiplier.
const fn type_multiplier(issue_type: IssueType) -> f64 {
    match issue_type {
        IssueType::AirQuality => 1.5,
        IssueType::WaterPollution => 1.3,
        IssueType::WasteManagement => 0.8,
        IssueType::Infrastructure => 2.0,
        IssueType::HealthcareAccess => 1.8,
        IssueType::PublicSafety => 0.7,
        IssueType::Transportation => 1.2,
        IssueType::NoisePollution | IssueType::Other => 1.0,
    }
}

/// Estimates the resolution time for a single issue from its type and
/// severity.
#[must_use]
pub fn estimate_resolution_time(
    issue_type: IssueType,
    severity: Option<IssueSeverity>,
) -> ResolutionEstimate {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let estimated_days = (f64::from(base_days(severity)) * type_multiplier(issue_type)) as u32;

    let priority = if estimated_days <= 2 {
        ResolutionPriority::High
    } else if estimated_days <= 5 {
        ResolutionPriority::Medium
    } else {
        ResolutionPriority::Normal
    };

    ResolutionEstimate {
        estimated_days,
        priority,
        confidence: "Moderate".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_public_safety_is_high_priority() {
        let estimate =
            estimate_resolution_time(IssueType::PublicSafety, Some(IssueSeverity::Critical));
        // 1 day * 0.7 truncates to 0.
        assert_eq!(estimate.estimated_days, 0);
        assert_eq!(estimate.priority, ResolutionPriority::High);
    }

    #[test]
    fn low_severity_infrastructure_is_slowest() {
        let estimate =
            estimate_resolution_time(IssueType::Infrastructure, Some(IssueSeverity::Low));
        assert_eq!(estimate.estimated_days, 14);
        assert_eq!(estimate.priority, ResolutionPriority::Normal);
    }

    #[test]
    fn missing_severity_defaults_to_medium_base() {
        let estimate = estimate_resolution_time(IssueType::WasteManagement, None);
        // 5 days * 0.8 = 4.
        assert_eq!(estimate.estimated_days, 4);
        assert_eq!(estimate.priority, ResolutionPriority::Medium);
    }

    #[test]
    fn unit_multiplier_types_keep_base_days() {
        let estimate = estimate_resolution_time(IssueType::Other, Some(IssueSeverity::High));
        assert_eq!(estimate.estimated_days, 3);
        assert_eq!(estimate.confidence, "Moderate");
    }
}
