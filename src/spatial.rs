//! Great-circle distance and the degree/kilometre conversions used by the
//! grid index.
//!
//! The haversine formula with a spherical Earth of radius 6371 km is the sole
//! notion of distance in this crate. Every analyzer, index query, and score
//! goes through [`haversine_km`], so two runs over identical input produce
//! byte-identical distances.

use geo::Point;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude on the 6371 km sphere.
pub const KM_PER_DEG_LAT: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Calculate the great-circle distance between two points in kilometres.
///
/// Points are `(x = longitude, y = latitude)` in degrees, following the
/// `geo` crate convention.
///
/// # Examples
///
/// ```rust
/// use geo::Point;
/// use netgap::spatial::haversine_km;
///
/// let baku = Point::new(49.8671, 40.4093);
/// let ganja = Point::new(46.3606, 40.6828);
/// let d = haversine_km(&baku, &ganja);
/// assert!(d > 290.0 && d < 310.0);
/// ```
pub fn haversine_km(a: &Point<f64>, b: &Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = (b.y() - a.y()).to_radians();
    let dlon = (b.x() - a.x()).to_radians();

    // Rounding can push h a hair past 1.0 for near-antipodal pairs, which
    // would make sqrt(1 - h) NaN.
    let h = ((dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Maximum possible great-circle distance on the 6371 km sphere (antipodes).
pub fn max_distance_km() -> f64 {
    EARTH_RADIUS_KM * std::f64::consts::PI
}
