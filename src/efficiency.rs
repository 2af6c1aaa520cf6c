//! Network spacing efficiency.
//!
//! For each source, the mean great-circle distance over all unordered point
//! pairs and the derived density figure `count / avg_spacing`. The pair
//! enumeration is intentionally exhaustive rather than sampled, which makes
//! this the second super-linear analysis: it takes a cancel token and checks
//! it per source and per outer point.

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::spatial::haversine_km;
use crate::types::{LocationRecord, SourceEfficiency};

/// Compute spacing and efficiency per source, in input order.
///
/// Sources with fewer than two points are reported with zero spacing and
/// zero efficiency rather than omitted, so callers always get one row per
/// source under comparison. A source whose points all coincide has zero
/// spacing and, by the division guard, zero efficiency.
///
/// # Errors
///
/// [`EngineError::Cancelled`](crate::EngineError::Cancelled) if the token
/// fires mid-computation; no partial rows are returned.
pub fn compute(
    points_by_source: &[(String, Vec<&LocationRecord>)],
    cancel: &CancelToken,
) -> Result<Vec<SourceEfficiency>> {
    let mut rows = Vec::with_capacity(points_by_source.len());

    for (source, points) in points_by_source {
        cancel.checkpoint()?;
        let count = points.len();

        if count <= 1 {
            rows.push(SourceEfficiency {
                source: source.clone(),
                count,
                avg_spacing_km: 0.0,
                efficiency: 0.0,
            });
            continue;
        }

        let mut sum = 0.0;
        for (i, a) in points.iter().enumerate() {
            cancel.checkpoint()?;
            for b in &points[i + 1..] {
                sum += haversine_km(&a.point, &b.point);
            }
        }

        let pairs = (count * (count - 1) / 2) as f64;
        let avg_spacing_km = sum / pairs;
        let efficiency = if avg_spacing_km > 0.0 {
            count as f64 / avg_spacing_km
        } else {
            0.0
        };

        rows.push(SourceEfficiency {
            source: source.clone(),
            count,
            avg_spacing_km,
            efficiency,
        });
    }

    Ok(rows)
}
