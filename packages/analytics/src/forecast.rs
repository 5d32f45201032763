//! Short-horizon daily issue-volume forecast.
//!
//! Aggregates reports per calendar day, takes a trailing moving average,
//! classifies the trend by comparing the two most recent windows, and
//! extrapolates with a small per-day drift. Deliberately simple: the
//! dashboard needs "roughly how busy will the next weeks be", not a
//! seasonal model.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use civic_map_analytics_models::{ForecastParams, ForecastPoint, TrendDirection, TrendForecast};
use civic_map_issue_models::IssueRecord;

use crate::round1;

/// Forecasts daily issue volume for `horizon_days` days starting at the
/// evaluation date.
///
/// Returns `None` when fewer than `params.min_records` records are
/// supplied or no record has a parseable date (insufficient signal).
#[must_use]
pub fn forecast_trend(
    records: &[IssueRecord],
    evaluated_at: NaiveDateTime,
    horizon_days: u32,
    params: &ForecastParams,
) -> Option<TrendForecast> {
    if records.len() < params.min_records {
        return None;
    }

    let mut daily_counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        if let Some(dt) = record.reported_at() {
            *daily_counts.entry(dt.date()).or_insert(0) += 1;
        }
    }
    if daily_counts.is_empty() {
        log::debug!("no parseable report dates; skipping forecast");
        return None;
    }

    let counts: Vec<u64> = daily_counts.values().copied().collect();
    let recent_avg = window_mean(&counts, counts.len().saturating_sub(params.window_days));
    let trend_direction = classify_direction(&counts, params);

    let points = (0..horizon_days)
        .map(|i| {
            let date = evaluated_at
                .date()
                .checked_add_days(Days::new(u64::from(i)))
                .unwrap_or_else(|| evaluated_at.date());
            ForecastPoint {
                date,
                predicted_issues: predict(recent_avg, trend_direction, i, params.drift_per_day),
                trend: trend_direction,
            }
        })
        .collect();

    Some(TrendForecast {
        points,
        current_avg: round1(recent_avg),
        trend_direction,
    })
}

/// Mean of `counts[start..]`.
fn window_mean(counts: &[u64], start: usize) -> f64 {
    let window = &counts[start..];
    #[allow(clippy::cast_precision_loss)]
    let mean = window.iter().sum::<u64>() as f64 / window.len() as f64;
    mean
}

/// Compares the most recent window against the one before it. Defaults
/// to stable until two full windows of history exist.
fn classify_direction(counts: &[u64], params: &ForecastParams) -> TrendDirection {
    let w = params.window_days;
    if counts.len() < 2 * w {
        return TrendDirection::Stable;
    }

    let recent = window_mean(counts, counts.len() - w);
    let previous = window_mean(&counts[..counts.len() - w], counts.len() - 2 * w);

    if recent >= previous * params.increase_ratio {
        TrendDirection::Increasing
    } else if recent <= previous * params.decrease_ratio {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Applies the per-day drift for forecast day `i`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn predict(recent_avg: f64, direction: TrendDirection, i: u32, drift: f64) -> u64 {
    let day = f64::from(i);
    match direction {
        TrendDirection::Increasing => (recent_avg * (1.0 + drift * day)).round() as u64,
        TrendDirection::Decreasing => (recent_avg * (1.0 - drift * day)).round().max(1.0) as u64,
        TrendDirection::Stable => recent_avg.round() as u64,
    }
}
