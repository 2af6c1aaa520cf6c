//! Bucket-grid spatial index over location records.
//!
//! Points are partitioned into fixed-size latitude/longitude cells sized so
//! that a query at the expected radius only has to visit a 3×3-ish
//! neighborhood of cells. Candidates from the coarse cells are then filtered
//! by exact haversine distance, so pruning can change the cost of a query
//! but never its result. Where the degree arithmetic would have to get
//! lossy (high latitudes, spans wider than the occupied grid) queries fall
//! back to an exact linear scan instead.
//!
//! The index is read-only after construction and safe to share across
//! parallel readers.

use crate::spatial::{EARTH_RADIUS_KM, KM_PER_DEG_LAT, haversine_km, max_distance_km};
use crate::types::LocationRecord;
use geo::Point;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Default cell edge when callers don't size the grid to a query radius.
pub const DEFAULT_CELL_KM: f64 = 1.0;

/// Grid cell key: (latitude band, wrapped longitude band).
type CellKey = (i64, i64);

/// A spatial index built once per analysis over a borrowed point set.
///
/// Build order is significant: `nearest` ties resolve to the earliest point,
/// and `within_radius` returns survivors in build order, which is what makes
/// repeated analyses byte-identical.
///
/// # Examples
///
/// ```rust
/// use geo::Point;
/// use netgap::{Category, GridIndex, LocationRecord};
///
/// let records = vec![
///     LocationRecord::new("1", "Bank A", Category::Atm, 40.40, 49.85, "a"),
///     LocationRecord::new("2", "Bank A", Category::Atm, 40.41, 49.86, "b"),
/// ];
/// let refs: Vec<&LocationRecord> = records.iter().collect();
/// let index = GridIndex::build(&refs);
///
/// let (nearest, d) = index.nearest(&Point::new(49.85, 40.40)).unwrap();
/// assert_eq!(nearest.id, "1");
/// assert_eq!(d, 0.0);
/// ```
pub struct GridIndex<'a> {
    points: Vec<&'a LocationRecord>,
    cells: FxHashMap<CellKey, Vec<usize>>,
    /// Cell edge in degrees of latitude.
    cell_deg: f64,
    cell_km: f64,
    /// Longitude cells spanning the full 360 degrees, for wraparound.
    n_lon: i64,
}

impl<'a> GridIndex<'a> {
    /// Build an index with the default cell size.
    pub fn build(points: &[&'a LocationRecord]) -> Self {
        Self::with_cell_km(points, DEFAULT_CELL_KM)
    }

    /// Build an index with cells sized to a specific query radius.
    ///
    /// A cell edge of at least the radius keeps `within_radius` at that
    /// radius inside a 3×3 cell neighborhood.
    ///
    /// # Panics
    ///
    /// Panics if `cell_km` is not a positive finite number.
    pub fn with_cell_km(points: &[&'a LocationRecord], cell_km: f64) -> Self {
        assert!(
            cell_km.is_finite() && cell_km > 0.0,
            "Cell size must be a positive finite number of kilometres"
        );

        let cell_deg = cell_km / KM_PER_DEG_LAT;
        let n_lon = ((360.0 / cell_deg).ceil() as i64).max(1);

        let mut cells: FxHashMap<CellKey, Vec<usize>> = FxHashMap::default();
        for (i, rec) in points.iter().enumerate() {
            let y = ((rec.latitude() + 90.0) / cell_deg).floor() as i64;
            let x = (((rec.longitude() + 180.0) / cell_deg).floor() as i64).rem_euclid(n_lon);
            cells.entry((y, x)).or_default().push(i);
        }

        Self {
            points: points.to_vec(),
            cells,
            cell_deg,
            cell_km,
            n_lon,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find the closest indexed point to `q`, or `None` on an empty index.
    ///
    /// Callers that need a sentinel map `None` to an infinite distance.
    /// Equal minimal distances resolve to the point that entered the index
    /// first.
    pub fn nearest(&self, q: &Point<f64>) -> Option<(&'a LocationRecord, f64)> {
        if self.points.is_empty() {
            return None;
        }

        // Expanding search: everything within r is exact, so once any hit
        // exists the closest of them is the global minimum.
        let mut r = self.cell_km;
        loop {
            let hits = self.within_radius(q, r);
            if let Some(best) = Self::closest(&hits) {
                return Some(best);
            }
            if r >= max_distance_km() {
                // Unreachable for a non-empty index; the full-sphere radius
                // includes every point.
                return Self::closest(&self.scan_all(q, max_distance_km()));
            }
            r = (r * 4.0).min(max_distance_km());
        }
    }

    /// All indexed points within `radius_km` of `q`, boundary inclusive.
    ///
    /// A point at exactly the radius is included. Results are in build
    /// order with their exact distances.
    pub fn within_radius(&self, q: &Point<f64>, radius_km: f64) -> Vec<(&'a LocationRecord, f64)> {
        if self.points.is_empty() || !(radius_km >= 0.0) {
            return Vec::new();
        }

        match self.candidate_indices(q, radius_km) {
            Some(candidates) => candidates
                .into_iter()
                .filter_map(|i| {
                    let rec = self.points[i];
                    let d = haversine_km(q, &rec.point);
                    (d <= radius_km).then_some((rec, d))
                })
                .collect(),
            None => self.scan_all(q, radius_km),
        }
    }

    /// Count of points within `radius_km` of `q`, boundary inclusive.
    pub fn count_within(&self, q: &Point<f64>, radius_km: f64) -> usize {
        self.within_radius(q, radius_km).len()
    }

    /// Exact linear scan, used when cell enumeration would cost more than
    /// visiting every point.
    fn scan_all(&self, q: &Point<f64>, radius_km: f64) -> Vec<(&'a LocationRecord, f64)> {
        self.points
            .iter()
            .filter_map(|rec| {
                let d = haversine_km(q, &rec.point);
                (d <= radius_km).then_some((*rec, d))
            })
            .collect()
    }

    /// Candidate point indices in build order, or `None` when a linear scan
    /// is the better (or only safe) plan.
    fn candidate_indices(&self, q: &Point<f64>, radius_km: f64) -> Option<Vec<usize>> {
        // No haversine distance exceeds the antipodal one, so a radius at or
        // past it covers every point and the cell walk below (whose spans
        // would also overflow for such radii) has nothing left to prune.
        if radius_km >= max_distance_km() {
            return None;
        }

        // Angular radius never exceeds the latitude span it can cause.
        let dlat_deg = radius_km / KM_PER_DEG_LAT;
        let y_lo = self.cell_y(q.y() - dlat_deg);
        let y_hi = self.cell_y(q.y() + dlat_deg);
        // Saturating casts can leave the bounds at the i64 extremes for
        // degenerate cell sizes; widen before counting.
        let y_count = (y_hi as i128 - y_lo as i128 + 1) as u128;

        let x_range = self.lon_cell_range(q, radius_km, dlat_deg);
        let x_count = match &x_range {
            Some((x_lo, x_hi)) => (*x_hi as i128 - *x_lo as i128 + 1) as u128,
            None => self.n_lon as u128,
        };

        // Enumerating more cells than there are points defeats the prune.
        if y_count * x_count > self.points.len() as u128 {
            return None;
        }

        let mut keys: SmallVec<[CellKey; 9]> = SmallVec::new();
        for y in y_lo..=y_hi {
            match x_range {
                Some((x_lo, x_hi)) => {
                    for x in x_lo..=x_hi {
                        keys.push((y, self.wrap_x(x)));
                    }
                }
                None => {
                    for x in 0..self.n_lon {
                        keys.push((y, x));
                    }
                }
            }
        }
        // Wrapping can fold distinct unwrapped columns onto one cell.
        keys.sort_unstable();
        keys.dedup();

        let mut indices: Vec<usize> = keys
            .iter()
            .filter_map(|key| self.cells.get(key))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        Some(indices)
    }

    /// Unwrapped longitude cell range guaranteed to contain every point
    /// within the radius, or `None` when the whole longitude ring must be
    /// considered.
    fn lon_cell_range(&self, q: &Point<f64>, radius_km: f64, dlat_deg: f64) -> Option<(i64, i64)> {
        // Smallest cosine of latitude across the band reachable within the
        // radius; the band touching a pole leaves longitude unbounded.
        let band_lo = (q.y() - dlat_deg).max(-90.0);
        let band_hi = (q.y() + dlat_deg).min(90.0);
        let cos_band = band_lo.abs().max(band_hi.abs()).to_radians().cos();
        let cos_q = q.y().to_radians().cos();

        let denom = (cos_q * cos_band).max(0.0).sqrt();
        if denom <= f64::EPSILON {
            return None;
        }

        // From the haversine formula: a point within distance r satisfies
        // sin(dlon/2) <= sin(r / 2R) / sqrt(cos(lat_q) * cos(lat_p)).
        let ratio = (radius_km / (2.0 * EARTH_RADIUS_KM)).sin() / denom;
        if ratio >= 1.0 {
            return None;
        }
        let dlon_deg = (2.0 * ratio.asin()).to_degrees();

        Some((
            self.cell_x_unwrapped(q.x() - dlon_deg),
            self.cell_x_unwrapped(q.x() + dlon_deg),
        ))
    }

    fn closest(hits: &[(&'a LocationRecord, f64)]) -> Option<(&'a LocationRecord, f64)> {
        // Hits arrive in build order; strict < keeps the earliest on ties.
        let mut best: Option<(&'a LocationRecord, f64)> = None;
        for &(rec, d) in hits {
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((rec, d)),
            }
        }
        best
    }

    fn cell_y(&self, lat: f64) -> i64 {
        ((lat + 90.0) / self.cell_deg).floor() as i64
    }

    fn cell_x_unwrapped(&self, lon: f64) -> i64 {
        ((lon + 180.0) / self.cell_deg).floor() as i64
    }

    fn wrap_x(&self, x: i64) -> i64 {
        x.rem_euclid(self.n_lon)
    }
}
