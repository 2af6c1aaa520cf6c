//! Immutable, queryable snapshot of canonical location records.
//!
//! A [`LocationStore`] is built once from ingested records and never mutated,
//! so shared references can be handed to concurrent analyses without any
//! locking. All query methods are simple predicate filters returning borrowed
//! records in load order, which keeps every downstream computation
//! deterministic.

use crate::error::{EngineError, Result};
use crate::types::{Category, LocationRecord};

/// Read-only collection of validated [`LocationRecord`]s.
#[derive(Debug, Clone)]
pub struct LocationStore {
    records: Vec<LocationRecord>,
}

impl LocationStore {
    /// Build a store from canonical records, rejecting malformed coordinates.
    ///
    /// Ingestion is responsible for dropping unparseable rows before they
    /// reach the engine; a coordinate outside `[-90, 90]` / `[-180, 180]` or
    /// a non-finite value here is a defect and fails the whole load.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidCoordinate`] naming the first offending record.
    pub fn new(records: Vec<LocationRecord>) -> Result<Self> {
        for rec in &records {
            let (lat, lon) = (rec.latitude(), rec.longitude());
            if !lat.is_finite()
                || !lon.is_finite()
                || !(-90.0..=90.0).contains(&lat)
                || !(-180.0..=180.0).contains(&lon)
            {
                log::warn!(
                    "rejecting record '{}' with invalid coordinates ({lat}, {lon})",
                    rec.id
                );
                return Err(EngineError::InvalidCoordinate {
                    id: rec.id.clone(),
                    latitude: lat,
                    longitude: lon,
                });
            }
        }
        Ok(Self { records })
    }

    /// All records in load order.
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All ATM records, any source.
    pub fn atms(&self) -> Vec<&LocationRecord> {
        self.filter(|r| r.category == Category::Atm)
    }

    /// All retail records (branches and stores), any source.
    pub fn retail(&self) -> Vec<&LocationRecord> {
        self.filter(|r| r.category == Category::Retail)
    }

    /// ATM records belonging to the owner.
    pub fn owner_atms(&self, owner: &str) -> Vec<&LocationRecord> {
        self.filter(|r| r.category == Category::Atm && r.source == owner)
    }

    /// ATM records belonging to anyone but the owner.
    pub fn competitor_atms(&self, owner: &str) -> Vec<&LocationRecord> {
        self.filter(|r| r.category == Category::Atm && r.source != owner)
    }

    /// All records of one source, any category.
    pub fn by_source(&self, source: &str) -> Vec<&LocationRecord> {
        self.filter(|r| r.source == source)
    }

    /// Distinct ATM sources, sorted for deterministic iteration.
    pub fn atm_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.category == Category::Atm)
            .map(|r| r.source.clone())
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }

    fn filter(&self, pred: impl Fn(&LocationRecord) -> bool) -> Vec<&LocationRecord> {
        self.records.iter().filter(|r| pred(r)).collect()
    }
}
