//! Coverage-gap and expansion analytics for competing geolocated networks.
//!
//! Given a snapshot of canonical location records (ATMs, branches, retail
//! stores from multiple chains), the engine finds where one operator lacks
//! coverage relative to competitors, ranks candidate expansion sites by a
//! weighted opportunity score, measures competitor co-location, and measures
//! network spacing efficiency. Ingestion and rendering live elsewhere; this
//! crate is pure computation over an immutable store.
//!
//! ```rust
//! use std::sync::Arc;
//! use netgap::{AnalysisConfig, Category, Engine, LocationRecord, LocationStore};
//!
//! let store = LocationStore::new(vec![
//!     LocationRecord::new("o1", "Bank of Baku", Category::Atm, 40.40, 49.85, "HQ"),
//!     LocationRecord::new("c1", "Kapital Bank", Category::Atm, 40.60, 50.10, "Suburb"),
//! ])?;
//!
//! let engine = Engine::new(Arc::new(store), AnalysisConfig::new("Bank of Baku"))?;
//! for row in engine.roi_rankings() {
//!     println!("#{} {} ({:.1} pts)", row.rank, row.address, row.roi_score);
//! }
//! # Ok::<(), netgap::EngineError>(())
//! ```

pub mod cancel;
pub mod colocation;
pub mod coverage;
pub mod efficiency;
pub mod engine;
pub mod error;
pub mod export;
pub mod index;
pub mod metrics;
pub mod scoring;
pub mod spatial;
pub mod store;
pub mod types;

pub use cancel::CancelToken;
pub use colocation::CoLocationMatrix;
pub use coverage::{GapSummary, find_gaps, summarize_gaps};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use export::{ranked_opportunities, to_csv};
pub use index::GridIndex;
pub use metrics::network_summary;
pub use scoring::{retail_opportunities, roi_breakdown, score_gaps};
pub use spatial::haversine_km;
pub use store::LocationStore;

pub use types::{
    AnalysisConfig, Category, GapRecord, LocationRecord, NetworkSummary, RankedOpportunity,
    RetailOpportunity, ScoreBreakdown, SourceEfficiency,
};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{AnalysisConfig, Engine, EngineError, Result};

    pub use crate::{Category, LocationRecord, LocationStore};

    pub use crate::{CancelToken, CoLocationMatrix, GapRecord, ScoreBreakdown};

    pub use crate::spatial::haversine_km;

    pub use geo::Point;
}
