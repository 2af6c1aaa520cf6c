//! Flat tabular export of ROI-ranked expansion opportunities.
//!
//! The engine owns no file surface; it produces ranked rows and a CSV string
//! for the presentation layer's download path.

use crate::types::{GapRecord, RankedOpportunity, ScoreBreakdown};

/// Pair gaps with their scores and rank them by ROI, best first.
///
/// `scores` must be keyed by position to `gaps`, as produced by
/// [`score_gaps`](crate::scoring::score_gaps). The sort is stable: equal
/// totals keep gap order, so identical inputs rank identically.
pub fn ranked_opportunities(
    gaps: &[GapRecord],
    scores: &[ScoreBreakdown],
) -> Vec<RankedOpportunity> {
    let mut rows: Vec<RankedOpportunity> = gaps
        .iter()
        .zip(scores)
        .map(|(gap, score)| RankedOpportunity {
            rank: 0,
            address: gap.location.address.clone(),
            source: gap.location.source.clone(),
            roi_score: score.total,
            distance_to_owner_km: gap.nearest_owner_distance_km,
            local_density: gap.local_density,
            latitude: gap.location.latitude(),
            longitude: gap.location.longitude(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.roi_score
            .partial_cmp(&a.roi_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

/// Render ranked rows as CSV with a header line.
pub fn to_csv(rows: &[RankedOpportunity]) -> String {
    let mut out = String::from(
        "rank,address,source,roi_score,distance_to_owner_km,local_density,latitude,longitude\n",
    );
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            row.rank,
            csv_field(&row.address),
            csv_field(&row.source),
            row.roi_score,
            row.distance_to_owner_km,
            row.local_density,
            row.latitude,
            row.longitude
        ));
    }
    out
}

/// Quote a field if it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
