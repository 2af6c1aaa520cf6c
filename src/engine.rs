//! Analysis facade over a shared location snapshot.
//!
//! An [`Engine`] pairs an immutable [`LocationStore`] with an
//! [`AnalysisConfig`] and exposes each analysis as a pure read. Engines are
//! cheap to construct; dashboards typically hold one per (owner, radius)
//! selection and share the store behind an `Arc`.

use crate::cancel::CancelToken;
use crate::colocation::CoLocationMatrix;
use crate::coverage::{self, GapSummary};
use crate::efficiency;
use crate::error::{EngineError, Result};
use crate::export;
use crate::metrics;
use crate::scoring;
use crate::store::LocationStore;
use crate::types::{
    AnalysisConfig, GapRecord, LocationRecord, NetworkSummary, RankedOpportunity,
    RetailOpportunity, ScoreBreakdown, SourceEfficiency,
};
use std::sync::Arc;

/// Read-only analysis engine over one snapshot and one parameter set.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use netgap::{AnalysisConfig, Category, Engine, LocationRecord, LocationStore};
///
/// let store = LocationStore::new(vec![
///     LocationRecord::new("o1", "Bank of Baku", Category::Atm, 40.40, 49.85, "HQ"),
///     LocationRecord::new("c1", "Kapital Bank", Category::Atm, 40.60, 50.10, "Far"),
/// ])?;
///
/// let engine = Engine::new(Arc::new(store), AnalysisConfig::new("Bank of Baku"))?;
/// let gaps = engine.coverage_gaps();
/// assert_eq!(gaps.len(), 1);
/// # Ok::<(), netgap::EngineError>(())
/// ```
pub struct Engine {
    store: Arc<LocationStore>,
    config: AnalysisConfig,
}

impl Engine {
    /// Create an engine, validating the configuration.
    pub fn new(store: Arc<LocationStore>, config: AnalysisConfig) -> Result<Self> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Owner market position across the whole ATM market.
    pub fn network_summary(&self) -> NetworkSummary {
        metrics::network_summary(&self.store.atms(), &self.config.owner_source)
    }

    /// Competitor locations with no owner ATM within the gap radius.
    pub fn coverage_gaps(&self) -> Vec<GapRecord> {
        coverage::find_gaps(
            &self.store.competitor_atms(&self.config.owner_source),
            &self.store.owner_atms(&self.config.owner_source),
            self.config.gap_radius_km,
            self.config.density_radius_km,
        )
    }

    /// Aggregate statistics over the current gap set.
    pub fn gap_summary(&self) -> GapSummary {
        coverage::summarize_gaps(&self.coverage_gaps())
    }

    /// ROI score breakdowns keyed by position to `gaps`.
    pub fn score_gaps(&self, gaps: &[GapRecord]) -> Vec<ScoreBreakdown> {
        scoring::score_gaps(gaps, &self.store.retail())
    }

    /// Gaps scored and ranked best-first for the export path.
    pub fn roi_rankings(&self) -> Vec<RankedOpportunity> {
        let gaps = self.coverage_gaps();
        let scores = self.score_gaps(&gaps);
        export::ranked_opportunities(&gaps, &scores)
    }

    /// ROI rankings rendered as CSV.
    pub fn roi_rankings_csv(&self) -> String {
        export::to_csv(&self.roi_rankings())
    }

    /// Retail sites worth evaluating for owner placement, best-first.
    pub fn retail_opportunities(&self) -> Vec<RetailOpportunity> {
        scoring::retail_opportunities(
            &self.store.retail(),
            &self.store.owner_atms(&self.config.owner_source),
            &self.store.competitor_atms(&self.config.owner_source),
            self.config.colocation_radius_km,
        )
    }

    /// Co-location matrix over the competitor ATM sources, sorted by name.
    pub fn colocation_matrix(&self, cancel: &CancelToken) -> Result<CoLocationMatrix> {
        let sources: Vec<String> = self
            .store
            .atm_sources()
            .into_iter()
            .filter(|s| s != &self.config.owner_source)
            .collect();
        CoLocationMatrix::build(
            &self.atm_groups(&sources),
            self.config.colocation_radius_km,
            cancel,
        )
    }

    /// Spacing efficiency for every ATM source, owner included.
    ///
    /// Rows are ordered by ATM count descending, the biggest networks first;
    /// equal counts fall back to source name so repeated runs agree.
    pub fn network_efficiency(&self, cancel: &CancelToken) -> Result<Vec<SourceEfficiency>> {
        let mut rows = efficiency::compute(&self.atm_groups(&self.store.atm_sources()), cancel)?;
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
        Ok(rows)
    }

    fn atm_groups(&self, sources: &[String]) -> Vec<(String, Vec<&LocationRecord>)> {
        let atms = self.store.atms();
        sources
            .iter()
            .map(|source| {
                let points: Vec<&LocationRecord> = atms
                    .iter()
                    .copied()
                    .filter(|r| &r.source == source)
                    .collect();
                (source.clone(), points)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn store() -> Arc<LocationStore> {
        Arc::new(
            LocationStore::new(vec![
                LocationRecord::new("o1", "Bank of Baku", Category::Atm, 40.40, 49.85, "HQ"),
                LocationRecord::new("k1", "Kapital Bank", Category::Atm, 40.41, 49.86, "Near"),
                LocationRecord::new("k2", "Kapital Bank", Category::Atm, 40.60, 50.10, "Far"),
                LocationRecord::new("a1", "ABB", Category::Atm, 40.61, 50.11, "Far too"),
                LocationRecord::new("r1", "Bravo Supermarket", Category::Retail, 40.60, 50.09, "Mall"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn rejects_invalid_config() {
        let config = AnalysisConfig::new("Bank of Baku").with_gap_radius_km(99.0);
        assert!(matches!(
            Engine::new(store(), config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn gaps_scores_and_rankings_line_up() {
        let engine = Engine::new(store(), AnalysisConfig::new("Bank of Baku")).unwrap();

        let gaps = engine.coverage_gaps();
        // k1 is ~1.4 km from the owner: served. k2 and a1 are ~30 km out.
        assert_eq!(gaps.len(), 2);

        let scores = engine.score_gaps(&gaps);
        assert_eq!(scores.len(), gaps.len());
        for score in &scores {
            assert!(score.total >= 0.0 && score.total <= 100.0);
        }

        let rankings = engine.roi_rankings();
        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0].rank, 1);
        assert!(rankings[0].roi_score >= rankings[1].roi_score);
    }

    #[test]
    fn colocation_excludes_the_owner() {
        let engine = Engine::new(store(), AnalysisConfig::new("Bank of Baku")).unwrap();
        let matrix = engine.colocation_matrix(&CancelToken::new()).unwrap();
        assert_eq!(matrix.sources(), ["ABB", "Kapital Bank"]);
    }

    #[test]
    fn efficiency_covers_every_atm_source_biggest_first() {
        let engine = Engine::new(store(), AnalysisConfig::new("Bank of Baku")).unwrap();
        let rows = engine.network_efficiency(&CancelToken::new()).unwrap();
        // Kapital Bank has two ATMs, the single-ATM sources tie on name.
        let sources: Vec<&str> = rows.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, ["Kapital Bank", "ABB", "Bank of Baku"]);
        assert!(rows.windows(2).all(|p| p[0].count >= p[1].count));
    }

    #[test]
    fn identical_runs_are_identical() {
        let engine = Engine::new(store(), AnalysisConfig::new("Bank of Baku")).unwrap();
        assert_eq!(engine.coverage_gaps(), engine.coverage_gaps());
        assert_eq!(engine.roi_rankings_csv(), engine.roi_rankings_csv());
        assert_eq!(engine.retail_opportunities(), engine.retail_opportunities());
    }
}
