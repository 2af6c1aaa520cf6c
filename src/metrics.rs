//! Headline market-position metrics for the owner network.

use crate::types::{LocationRecord, NetworkSummary};
use rustc_hash::FxHashMap;

/// Summarize the owner's position in the ATM market.
///
/// The leader is the source with the most ATMs; ties resolve to the
/// lexicographically smaller name so repeated runs agree. An empty market
/// reports leader `"N/A"` with zero counts.
pub fn network_summary(atms: &[&LocationRecord], owner: &str) -> NetworkSummary {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for atm in atms {
        *counts.entry(atm.source.as_str()).or_default() += 1;
    }

    let owner_atm_count = counts.get(owner).copied().unwrap_or(0);
    let total_atm_count = atms.len();

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let (leader_source, leader_count) = ranked
        .first()
        .map_or(("N/A", 0), |&(source, count)| (source, count));

    NetworkSummary {
        owner_atm_count,
        total_atm_count,
        market_share_pct: if total_atm_count > 0 {
            owner_atm_count as f64 / total_atm_count as f64 * 100.0
        } else {
            0.0
        },
        leader_source: leader_source.to_string(),
        leader_count,
        gap_to_leader: leader_count.saturating_sub(owner_atm_count),
    }
}
