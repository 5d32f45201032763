//! Density-based hotspot detection over report coordinates.
//!
//! Runs DBSCAN in (lat, lon) space: points that are mutually reachable
//! within a fixed neighborhood radius form a cluster when a core point
//! has enough neighbors; everything else is noise and excluded. The
//! radius queries go through an R-tree so detection stays near-linear in
//! the report count.

use std::collections::{BTreeMap, VecDeque};

use civic_map_analytics_models::{Hotspot, HotspotParams};
use civic_map_issue_models::{IssueRecord, IssueType};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::round2;

/// A report coordinate stored in the R-tree with its record index.
struct ReportPoint {
    record_index: usize,
    position: [f64; 2],
}

impl RTreeObject for ReportPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for ReportPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Detects spatial hotspots among the given records.
///
/// Returns an empty list when fewer than `params.min_records` records are
/// supplied (insufficient signal) and absorbs any internal failure into
/// an empty list with a warning; detection never errors out to the
/// caller.
#[must_use]
pub fn detect_hotspots(records: &[IssueRecord], params: &HotspotParams) -> Vec<Hotspot> {
    if records.len() < params.min_records {
        return Vec::new();
    }

    match cluster_and_score(records, params) {
        Some(hotspots) => hotspots,
        None => {
            log::warn!("hotspot detection hit a degenerate cluster; returning no hotspots");
            Vec::new()
        }
    }
}

/// Clusters finite-coordinate records and scores each dense group.
/// Returns `None` only if aggregation produces a non-finite center or
/// score, which the public entry point absorbs.
fn cluster_and_score(records: &[IssueRecord], params: &HotspotParams) -> Option<Vec<Hotspot>> {
    let points: Vec<ReportPoint> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            if r.has_finite_coordinates() {
                true
            } else {
                log::debug!("skipping record {} with non-finite coordinates", r.id);
                false
            }
        })
        .map(|(record_index, r)| ReportPoint {
            record_index,
            position: [r.lat, r.lon],
        })
        .collect();

    let labels = dbscan(&points, params.epsilon_degrees, params.min_neighbors);

    let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (point_index, label) in labels.iter().enumerate() {
        if let Some(cluster_id) = label {
            clusters
                .entry(*cluster_id)
                .or_default()
                .push(points[point_index].record_index);
        }
    }

    let mut hotspots = Vec::new();
    for members in clusters.values() {
        if members.len() < params.min_cluster_size {
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let size = members.len() as f64;
        let lat = members.iter().map(|&i| records[i].lat).sum::<f64>() / size;
        let lon = members.iter().map(|&i| records[i].lon).sum::<f64>() / size;

        let avg_severity = members
            .iter()
            .map(|&i| f64::from(records[i].severity_score()))
            .sum::<f64>()
            / size;

        let risk_score = (size * 0.4 + avg_severity * 0.6) * 10.0;
        if !lat.is_finite() || !lon.is_finite() || !risk_score.is_finite() {
            return None;
        }

        hotspots.push(Hotspot {
            lat,
            lon,
            issue_count: members.len() as u64,
            risk_score: round2(risk_score),
            primary_type: dominant_type(records, members),
            avg_severity: round2(avg_severity),
        });
    }

    hotspots.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.primary_type.code().cmp(&b.primary_type.code()))
    });

    Some(hotspots)
}

/// Most frequent issue type among cluster members; enumeration order
/// breaks ties.
fn dominant_type(records: &[IssueRecord], members: &[usize]) -> IssueType {
    let mut counts: BTreeMap<IssueType, u64> = BTreeMap::new();
    for &i in members {
        *counts.entry(records[i].issue_type).or_insert(0) += 1;
    }

    let mut best = IssueType::Other;
    let mut best_count = 0;
    for issue_type in IssueType::all() {
        let count = counts.get(issue_type).copied().unwrap_or(0);
        if count > best_count {
            best = *issue_type;
            best_count = count;
        }
    }
    best
}

/// Classic DBSCAN over the point set. Returns one label per point:
/// `Some(cluster_id)` for clustered points, `None` for noise.
///
/// `min_neighbors` counts the point itself, matching the usual
/// `min_samples` convention.
fn dbscan(points: &[ReportPoint], epsilon: f64, min_neighbors: usize) -> Vec<Option<usize>> {
    let tree: RTree<ReportPoint> = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| ReportPoint {
                record_index: i,
                position: p.position,
            })
            .collect(),
    );
    let epsilon_2 = epsilon * epsilon;
    let neighbors_of = |i: usize| -> Vec<usize> {
        tree.locate_within_distance(points[i].position, epsilon_2)
            .map(|p| p.record_index)
            .collect()
    };

    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    let mut visited = vec![false; points.len()];
    let mut next_cluster = 0;

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let neighbors = neighbors_of(i);
        if neighbors.len() < min_neighbors {
            continue; // noise unless later claimed as a border point
        }

        let cluster_id = next_cluster;
        next_cluster += 1;
        labels[i] = Some(cluster_id);

        let mut queue: VecDeque<usize> = neighbors.into_iter().collect();
        while let Some(j) = queue.pop_front() {
            if !visited[j] {
                visited[j] = true;
                let expansion = neighbors_of(j);
                if expansion.len() >= min_neighbors {
                    queue.extend(expansion);
                }
            }
            if labels[j].is_none() {
                labels[j] = Some(cluster_id);
            }
        }
    }

    labels
}
