//! Canonical records and analysis output types.
//!
//! The engine consumes a validated snapshot of [`LocationRecord`]s produced
//! by an external ingestion layer and emits plain structured collections:
//! gap records, score breakdowns, the co-location grid, and efficiency rows.
//! Everything here is serializable so the presentation layer can consume it
//! directly.

use geo::Point;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Coarse category a raw type tag maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Cash machine, owned or competitor.
    Atm,
    /// Bank branch or retail store (candidate placement site).
    Retail,
}

/// Fixed alias table from the raw free-text type tags seen in source data.
///
/// Tags not listed here belong to neither category and are excluded from
/// every analysis.
static TYPE_TAG_ALIASES: Lazy<FxHashMap<&'static str, Category>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    for tag in ["ATM", "A", "atm", "network_atm"] {
        m.insert(tag, Category::Atm);
    }
    for tag in ["Branch", "branch", "Store", "store"] {
        m.insert(tag, Category::Retail);
    }
    m
});

impl Category {
    /// Map a raw type tag to a category, or `None` for unrecognized tags.
    ///
    /// The match is exact (case-sensitive): the alias table reproduces the
    /// tag variants the source feeds actually emit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netgap::Category;
    ///
    /// assert_eq!(Category::from_type_tag("network_atm"), Some(Category::Atm));
    /// assert_eq!(Category::from_type_tag("Store"), Some(Category::Retail));
    /// assert_eq!(Category::from_type_tag("kiosk"), None);
    /// ```
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        TYPE_TAG_ALIASES.get(tag).copied()
    }
}

/// A single canonical location: one ATM, branch, or store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Stable identifier from the ingestion layer.
    pub id: String,
    /// Operator or chain this location belongs to.
    pub source: String,
    pub category: Category,
    /// `(x = longitude, y = latitude)` in degrees.
    pub point: Point<f64>,
    pub address: String,
}

impl LocationRecord {
    /// Create a record from latitude/longitude in degrees.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        category: Category,
        latitude: f64,
        longitude: f64,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            category,
            point: Point::new(longitude, latitude),
            address: address.into(),
        }
    }

    /// Create a record from a raw type tag, or `None` if the tag maps to
    /// neither category.
    pub fn from_tagged(
        id: impl Into<String>,
        source: impl Into<String>,
        type_tag: &str,
        latitude: f64,
        longitude: f64,
        address: impl Into<String>,
    ) -> Option<Self> {
        Category::from_type_tag(type_tag)
            .map(|category| Self::new(id, source, category, latitude, longitude, address))
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.point.x()
    }
}

/// A competitor location unserved by the owner network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapRecord {
    pub location: LocationRecord,
    /// Minimum distance to any owner point, `f64::INFINITY` when the owner
    /// set is empty.
    pub nearest_owner_distance_km: f64,
    /// Competitor points (all sources) within the density radius.
    ///
    /// The count runs over the whole competitor set and so includes the gap
    /// location itself; it is always >= 1. Intentional, not a bug to correct.
    pub local_density: usize,
}

/// Component-wise coverage-ROI score for a gap.
///
/// Each component is clamped into its own sub-range (<= 30, <= 40, <= 30),
/// so `total` is mathematically bounded to `[0, 100]` without any clamp in
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Distance-to-owner component, at most 30.
    pub gap_component: f64,
    /// Competitor-density component, at most 40.
    pub demand_component: f64,
    /// Retail-proximity component, at most 30.
    pub retail_component: f64,
    pub total: f64,
}

/// A retail site evaluated for owner placement.
///
/// Unlike [`ScoreBreakdown::total`], `opportunity_score` has no upper bound:
/// sites far from the owner with many nearby competitors score above 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetailOpportunity {
    pub source: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_to_owner_km: f64,
    /// Competitor ATMs within the co-location radius of the retail site.
    pub nearby_competitors: usize,
    pub opportunity_score: f64,
}

/// Per-source network spacing summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEfficiency {
    pub source: String,
    pub count: usize,
    /// Mean distance over all unordered point pairs, 0 for sources with
    /// fewer than two points.
    pub avg_spacing_km: f64,
    /// `count / avg_spacing_km`, 0 when the spacing is zero.
    pub efficiency: f64,
}

/// Headline market-position metrics for the owner network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub owner_atm_count: usize,
    pub total_atm_count: usize,
    pub market_share_pct: f64,
    /// Source with the most ATMs, `"N/A"` on an empty market.
    pub leader_source: String,
    pub leader_count: usize,
    /// How many ATMs the owner trails the leader by, clamped at 0.
    pub gap_to_leader: usize,
}

/// One row of the flat ranked-opportunity export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOpportunity {
    pub rank: usize,
    pub address: String,
    pub source: String,
    pub roi_score: f64,
    pub distance_to_owner_km: f64,
    pub local_density: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// Analysis parameters.
///
/// Serializable with defaults so dashboards can persist and reload the
/// caller-facing knobs.
///
/// # Example
///
/// ```rust
/// use netgap::AnalysisConfig;
///
/// let json = r#"{ "owner_source": "Bank of Baku", "gap_radius_km": 3.0 }"#;
/// let config = AnalysisConfig::from_json(json).unwrap();
/// assert_eq!(config.gap_radius_km, 3.0);
/// assert_eq!(config.density_radius_km, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// The operator whose coverage is being evaluated.
    pub owner_source: String,

    /// Radius beyond which a competitor location counts as a gap.
    /// Caller-supplied, domain 0.5–5.0 km.
    #[serde(default = "AnalysisConfig::default_gap_radius_km")]
    pub gap_radius_km: f64,

    /// Proximity threshold for the co-location matrix.
    #[serde(default = "AnalysisConfig::default_colocation_radius_km")]
    pub colocation_radius_km: f64,

    /// Radius for the self-inclusive local density count.
    #[serde(default = "AnalysisConfig::default_density_radius_km")]
    pub density_radius_km: f64,
}

impl AnalysisConfig {
    const fn default_gap_radius_km() -> f64 {
        2.0
    }

    const fn default_colocation_radius_km() -> f64 {
        0.5
    }

    const fn default_density_radius_km() -> f64 {
        1.0
    }

    /// Create a config with default radii for the given owner.
    pub fn new(owner_source: impl Into<String>) -> Self {
        Self {
            owner_source: owner_source.into(),
            gap_radius_km: Self::default_gap_radius_km(),
            colocation_radius_km: Self::default_colocation_radius_km(),
            density_radius_km: Self::default_density_radius_km(),
        }
    }

    pub fn with_gap_radius_km(mut self, radius: f64) -> Self {
        self.gap_radius_km = radius;
        self
    }

    pub fn with_colocation_radius_km(mut self, radius: f64) -> Self {
        self.colocation_radius_km = radius;
        self
    }

    pub fn with_density_radius_km(mut self, radius: f64) -> Self {
        self.density_radius_km = radius;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.owner_source.is_empty() {
            return Err("Owner source must not be empty".to_string());
        }
        if !self.gap_radius_km.is_finite() || !(0.5..=5.0).contains(&self.gap_radius_km) {
            return Err(format!(
                "Gap radius must be within 0.5–5.0 km, got {}",
                self.gap_radius_km
            ));
        }
        for (name, value) in [
            ("Co-location radius", self.colocation_radius_km),
            ("Density radius", self.density_radius_km),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive finite number, got {value}"));
            }
        }
        Ok(())
    }

    /// Load a config from a JSON string, validating it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let config: Self = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Serialize the config as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_table_covers_known_tags() {
        assert_eq!(Category::from_type_tag("ATM"), Some(Category::Atm));
        assert_eq!(Category::from_type_tag("A"), Some(Category::Atm));
        assert_eq!(Category::from_type_tag("atm"), Some(Category::Atm));
        assert_eq!(Category::from_type_tag("network_atm"), Some(Category::Atm));
        assert_eq!(Category::from_type_tag("Branch"), Some(Category::Retail));
        assert_eq!(Category::from_type_tag("branch"), Some(Category::Retail));
        assert_eq!(Category::from_type_tag("Store"), Some(Category::Retail));
        assert_eq!(Category::from_type_tag("store"), Some(Category::Retail));
    }

    #[test]
    fn alias_table_is_case_sensitive_and_closed() {
        assert_eq!(Category::from_type_tag("Atm"), None);
        assert_eq!(Category::from_type_tag("STORE"), None);
        assert_eq!(Category::from_type_tag("kiosk"), None);
        assert_eq!(Category::from_type_tag(""), None);
    }

    #[test]
    fn from_tagged_excludes_unknown_tags() {
        let rec = LocationRecord::from_tagged("1", "Bank A", "ATM", 40.4, 49.85, "Main St");
        assert!(rec.is_some());
        assert_eq!(rec.unwrap().category, Category::Atm);

        let none = LocationRecord::from_tagged("2", "Bank A", "office", 40.4, 49.85, "Main St");
        assert!(none.is_none());
    }

    #[test]
    fn record_axis_order() {
        let rec = LocationRecord::new("1", "Bank A", Category::Atm, 40.40, 49.85, "Main St");
        assert_eq!(rec.latitude(), 40.40);
        assert_eq!(rec.longitude(), 49.85);
        assert_eq!(rec.point.x(), 49.85);
        assert_eq!(rec.point.y(), 40.40);
    }

    #[test]
    fn config_defaults() {
        let config = AnalysisConfig::new("Bank of Baku");
        assert_eq!(config.gap_radius_km, 2.0);
        assert_eq!(config.colocation_radius_km, 0.5);
        assert_eq!(config.density_radius_km, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_gap_radius_domain() {
        let config = AnalysisConfig::new("Bank of Baku").with_gap_radius_km(0.25);
        assert!(config.validate().is_err());

        let config = AnalysisConfig::new("Bank of Baku").with_gap_radius_km(5.5);
        assert!(config.validate().is_err());

        let config = AnalysisConfig::new("Bank of Baku").with_gap_radius_km(0.5);
        assert!(config.validate().is_ok());

        let config = AnalysisConfig::new("Bank of Baku").with_gap_radius_km(5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_empty_owner() {
        let config = AnalysisConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_json_round_trip() {
        let config = AnalysisConfig::new("Bank of Baku")
            .with_gap_radius_km(3.5)
            .with_colocation_radius_km(0.25);

        let json = config.to_json().unwrap();
        let restored = AnalysisConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn config_json_rejects_invalid() {
        let json = r#"{ "owner_source": "Bank of Baku", "gap_radius_km": 50.0 }"#;
        assert!(AnalysisConfig::from_json(json).is_err());
    }
}
