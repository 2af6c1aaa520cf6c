//! Opportunity scoring.
//!
//! Two related but deliberately separate formulas live here:
//!
//! - the **coverage-ROI score** for gaps, whose independently clamped
//!   components keep the total inside `[0, 100]` with no clamp in code;
//! - the **retail-opportunity score** for candidate placement sites, which
//!   has no upper bound at all.
//!
//! They share structure but not range, so they stay independently named and
//! independently tested: do not merge them.

use crate::index::GridIndex;
use crate::types::{GapRecord, LocationRecord, RetailOpportunity, ScoreBreakdown};
use rayon::prelude::*;

/// Distance assumed to the nearest retail anchor when the retail set is
/// empty; far enough to zero the retail component.
const EMPTY_RETAIL_DISTANCE_KM: f64 = 10.0;

/// A retail site closer to the owner than this is not worth evaluating.
const MIN_OWNER_DISTANCE_KM: f64 = 1.0;

/// Score one gap against the retail reference set.
///
/// Components: distance to owner (30%), competitor density (40%), retail
/// proximity (30%). Each is clamped into its own sub-range, so the total is
/// mathematically bounded to `[0, 100]`; an infinite owner distance still
/// contributes exactly 30.
pub fn roi_breakdown(gap: &GapRecord, retail_index: &GridIndex<'_>) -> ScoreBreakdown {
    let gap_component = (gap.nearest_owner_distance_km / 10.0).min(1.0) * 30.0;
    let demand_component = (gap.local_density as f64 / 10.0).min(1.0) * 40.0;

    let nearest_retail = retail_index
        .nearest(&gap.location.point)
        .map_or(EMPTY_RETAIL_DISTANCE_KM, |(_, d)| d);
    let retail_component = ((2.0 - nearest_retail) / 2.0).max(0.0) * 30.0;

    ScoreBreakdown {
        gap_component,
        demand_component,
        retail_component,
        total: gap_component + demand_component + retail_component,
    }
}

/// Score every gap, keyed by position to the input list.
pub fn score_gaps(gaps: &[GapRecord], retail: &[&LocationRecord]) -> Vec<ScoreBreakdown> {
    let retail_index = GridIndex::build(retail);
    gaps.par_iter()
        .map(|gap| roi_breakdown(gap, &retail_index))
        .collect()
}

/// Evaluate retail sites as candidate owner placements.
///
/// Sites within 1 km of the owner network are already covered and are
/// skipped (strictly-greater eligibility). The score
/// `(distance / 10) * 50 + (competitors / 10) * 50` is intentionally
/// unclamped: a site 30 km from the owner with ten nearby competitors scores
/// 200. Results are sorted by score descending, ties keeping input order.
///
/// With an empty owner set there is no network to place against and the
/// result is empty.
pub fn retail_opportunities(
    retail: &[&LocationRecord],
    owners: &[&LocationRecord],
    competitors: &[&LocationRecord],
    colocation_radius_km: f64,
) -> Vec<RetailOpportunity> {
    if owners.is_empty() {
        return Vec::new();
    }

    let owner_index = GridIndex::build(owners);
    let competitor_index = GridIndex::with_cell_km(competitors, colocation_radius_km.max(0.1));

    let mut opportunities: Vec<RetailOpportunity> = retail
        .par_iter()
        .filter_map(|site| {
            let distance_to_owner_km = owner_index
                .nearest(&site.point)
                .map_or(f64::INFINITY, |(_, d)| d);
            if distance_to_owner_km <= MIN_OWNER_DISTANCE_KM {
                return None;
            }

            let nearby_competitors =
                competitor_index.count_within(&site.point, colocation_radius_km);

            Some(RetailOpportunity {
                source: site.source.clone(),
                address: site.address.clone(),
                latitude: site.latitude(),
                longitude: site.longitude(),
                distance_to_owner_km,
                nearby_competitors,
                opportunity_score: (distance_to_owner_km / 10.0) * 50.0
                    + (nearby_competitors as f64 / 10.0) * 50.0,
            })
        })
        .collect();

    opportunities.sort_by(|a, b| {
        b.opportunity_score
            .partial_cmp(&a.opportunity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    opportunities
}
