//! Competitor co-location analysis.
//!
//! For every ordered pair of sources, counts the cross-source point pairs
//! within a fixed proximity threshold. All source pairs times all point
//! pairs makes this one of the two super-linear analyses, so it takes a
//! cancel token and checks it at every source pair and every point.

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::index::GridIndex;
use crate::types::LocationRecord;
use serde::Serialize;

/// Proximity counts for every ordered pair of sources.
///
/// `count(i, j)` is the number of pairs `(a, b)` with `a` from source `i`,
/// `b` from source `j`, and `distance(a, b) <= radius`. On the diagonal each
/// point is counted against the full same-source set *including itself*
/// (distance zero always passes), so `count(s, s)` for `k` mutually-close
/// points is `k * k`, not `k * (k - 1)`. The inflation is intentional; do
/// not exclude the self-pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoLocationMatrix {
    sources: Vec<String>,
    counts: Vec<Vec<usize>>,
    radius_km: f64,
}

impl CoLocationMatrix {
    /// Build the matrix over sources in the given order.
    ///
    /// One [`GridIndex`] is built per source, then every point of source `i`
    /// is counted against source `j`'s index, `O(n log n)`-ish per source
    /// pair instead of a full `O(n * m)` rescan.
    ///
    /// # Errors
    ///
    /// [`EngineError::Cancelled`](crate::EngineError::Cancelled) if the token
    /// fires; no partial matrix is ever returned.
    pub fn build(
        points_by_source: &[(String, Vec<&LocationRecord>)],
        radius_km: f64,
        cancel: &CancelToken,
    ) -> Result<Self> {
        let indexes: Vec<GridIndex<'_>> = points_by_source
            .iter()
            .map(|(_, points)| GridIndex::with_cell_km(points, radius_km.max(0.1)))
            .collect();

        let n = points_by_source.len();
        let mut counts = vec![vec![0usize; n]; n];

        for (i, (_, points)) in points_by_source.iter().enumerate() {
            for (j, index) in indexes.iter().enumerate() {
                cancel.checkpoint()?;
                let mut count = 0;
                for point in points {
                    cancel.checkpoint()?;
                    count += index.count_within(&point.point, radius_km);
                }
                counts[i][j] = count;
            }
        }

        Ok(Self {
            sources: points_by_source
                .iter()
                .map(|(source, _)| source.clone())
                .collect(),
            counts,
            radius_km,
        })
    }

    /// Sources in matrix order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Cell count by position.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn count(&self, i: usize, j: usize) -> usize {
        self.counts[i][j]
    }

    /// Cell count by source names, `None` for unknown sources.
    pub fn count_by_name(&self, source_i: &str, source_j: &str) -> Option<usize> {
        let i = self.sources.iter().position(|s| s == source_i)?;
        let j = self.sources.iter().position(|s| s == source_j)?;
        Some(self.counts[i][j])
    }

    /// Row-major view of the counts grid.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }
}
