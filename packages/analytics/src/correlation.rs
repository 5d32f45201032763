//! Issue-type co-occurrence over a coordinate grid.
//!
//! Buckets reports into grid cells by rounding coordinates (2 decimals
//! is roughly a 1.1 km cell at this latitude), then measures how often
//! two types appear in the same cells. Correlation is the co-occurrence
//! share of the rarer type, as a percentage.

use std::collections::{BTreeMap, BTreeSet};

use civic_map_analytics_models::{CorrelationPair, CorrelationParams};
use civic_map_issue_models::{IssueRecord, IssueType};

use crate::round1;

/// Grid cell key: coordinates scaled to integers so they can key a map.
type CellKey = (i64, i64);

/// Finds type pairs whose proximity co-occurrence exceeds the threshold.
///
/// Returns an empty list when fewer than `params.min_records` records
/// are supplied.
#[must_use]
pub fn correlate_issue_types(
    records: &[IssueRecord],
    params: &CorrelationParams,
) -> Vec<CorrelationPair> {
    if records.len() < params.min_records {
        return Vec::new();
    }

    let scale = 10f64.powi(i32::from(params.cell_decimals));
    let mut cells: BTreeMap<CellKey, BTreeSet<IssueType>> = BTreeMap::new();
    for record in records {
        if !record.has_finite_coordinates() {
            log::debug!("skipping record {} with non-finite coordinates", record.id);
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let key = (
            (record.lat * scale).round() as i64,
            (record.lon * scale).round() as i64,
        );
        cells.entry(key).or_default().insert(record.issue_type);
    }

    let mut cells_per_type: BTreeMap<IssueType, u64> = BTreeMap::new();
    let mut co_occurrences: BTreeMap<(IssueType, IssueType), u64> = BTreeMap::new();
    for types in cells.values() {
        for &issue_type in types {
            *cells_per_type.entry(issue_type).or_insert(0) += 1;
        }
        for &a in types {
            for &b in types {
                if a < b {
                    *co_occurrences.entry((a, b)).or_insert(0) += 1;
                }
            }
        }
    }

    let all = IssueType::all();
    let mut pairs = Vec::new();
    for (i, &type_a) in all.iter().enumerate() {
        for &type_b in &all[i + 1..] {
            let count_a = cells_per_type.get(&type_a).copied().unwrap_or(0);
            let count_b = cells_per_type.get(&type_b).copied().unwrap_or(0);
            if count_a == 0 || count_b == 0 {
                continue;
            }

            let both = co_occurrences
                .get(&(type_a, type_b))
                .copied()
                .unwrap_or(0);
            #[allow(clippy::cast_precision_loss)]
            let correlation = both as f64 / count_a.min(count_b) as f64 * 100.0;
            if correlation > params.correlation_threshold_pct {
                pairs.push(CorrelationPair {
                    type_a,
                    type_b,
                    correlation: round1(correlation),
                    co_occurrences: both,
                });
            }
        }
    }

    // Stable sort keeps enumeration-order pairs on correlation ties.
    pairs.sort_by(|a, b| {
        b.correlation
            .partial_cmp(&a.correlation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
}
