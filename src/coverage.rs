//! Coverage gap analysis: competitor locations unserved by the owner.

use crate::index::GridIndex;
use crate::types::{GapRecord, LocationRecord};
use rayon::prelude::*;
use serde::Serialize;

/// Find competitor locations with no owner point within `gap_radius_km`.
///
/// A competitor is a gap iff its nearest-owner distance is *strictly*
/// greater than the radius; a point at exactly the radius is served. With an
/// empty owner set every competitor is a gap at infinite distance.
///
/// `local_density` counts competitor points (all sources) within
/// `density_radius_km` of the gap. The count runs over the entire competitor
/// set, so the gap location itself is included and the density is always at
/// least 1. Intentional; do not subtract the self-count.
///
/// Output preserves competitor input order; callers sort by density or score
/// as needed.
pub fn find_gaps<'a>(
    competitors: &[&'a LocationRecord],
    owners: &[&'a LocationRecord],
    gap_radius_km: f64,
    density_radius_km: f64,
) -> Vec<GapRecord> {
    let owner_index = GridIndex::build(owners);
    let density_index = GridIndex::with_cell_km(competitors, density_radius_km.max(0.1));

    competitors
        .par_iter()
        .filter_map(|comp| {
            let nearest_owner_distance_km = owner_index
                .nearest(&comp.point)
                .map_or(f64::INFINITY, |(_, d)| d);

            if nearest_owner_distance_km > gap_radius_km {
                Some(GapRecord {
                    location: (*comp).clone(),
                    nearest_owner_distance_km,
                    local_density: density_index.count_within(&comp.point, density_radius_km),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Aggregate statistics over a gap list, for the dashboard metric strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapSummary {
    pub total: usize,
    pub avg_distance_km: f64,
    pub max_distance_km: f64,
    pub avg_density: f64,
}

/// Summarize a gap list. An empty list yields all-zero statistics.
pub fn summarize_gaps(gaps: &[GapRecord]) -> GapSummary {
    if gaps.is_empty() {
        return GapSummary {
            total: 0,
            avg_distance_km: 0.0,
            max_distance_km: 0.0,
            avg_density: 0.0,
        };
    }

    let n = gaps.len() as f64;
    let sum_distance: f64 = gaps.iter().map(|g| g.nearest_owner_distance_km).sum();
    let max_distance = gaps
        .iter()
        .map(|g| g.nearest_owner_distance_km)
        .fold(0.0, f64::max);
    let sum_density: usize = gaps.iter().map(|g| g.local_density).sum();

    GapSummary {
        total: gaps.len(),
        avg_distance_km: sum_distance / n,
        max_distance_km: max_distance,
        avg_density: sum_density as f64 / n,
    }
}
