//! Canonical trace: the deduplicated, sorted, per-entity output of ingestion.
//!
//! # Delta model
//!
//! For each entity the locations and time deltas are aligned 1:1:
//!
//! ```text
//! deltas[0]   = time[0] - start          (global start point)
//! deltas[i>0] = time[i] - time[i-1]      (same entity)
//! ```
//!
//! A zero delta after the first sample always repeats the previous location;
//! ingestion rejects anything else.

use em_core::{Coord, Seconds, TimeFormat, Timestamp};

/// One entity's canonical time series.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityTrace {
    pub entity_id: String,
    pub locations: Vec<Coord>,
    pub deltas:    Vec<Seconds>,
}

impl EntityTrace {
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// All entities of one trace, sorted ascending by raw id string.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalTrace {
    /// Simulation time zero.
    pub start:       Timestamp,
    /// `start` as written in the settings or the trace.
    pub start_raw:   String,
    pub time_format: TimeFormat,
    entities:        Vec<EntityTrace>,
}

impl CanonicalTrace {
    pub(crate) fn new(
        start:       Timestamp,
        start_raw:   String,
        time_format: TimeFormat,
        entities:    Vec<EntityTrace>,
    ) -> Self {
        debug_assert!(entities.windows(2).all(|w| w[0].entity_id < w[1].entity_id));
        Self { start, start_raw, time_format, entities }
    }

    /// Entities in ascending id order.
    pub fn entities(&self) -> &[EntityTrace] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<EntityTrace> {
        self.entities
    }

    /// Look up one entity by its raw id.
    pub fn get(&self, entity_id: &str) -> Option<&EntityTrace> {
        self.entities
            .binary_search_by(|e| e.entity_id.as_str().cmp(entity_id))
            .ok()
            .map(|i| &self.entities[i])
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Total canonical samples across all entities.
    pub fn sample_count(&self) -> usize {
        self.entities.iter().map(EntityTrace::len).sum()
    }
}
