//! Catalogue row schemas and the target bookkeeping state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::sky::SkyPosition;

pub type TargetId = i64;

/// `type` value for galaxies; every other value is reserved.
pub const GALAXY_TYPE: i32 = 1;

/// One row of the input target catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    #[serde(rename = "ID")]
    pub id: TargetId,
    #[serde(rename = "RA")]
    pub ra: f64,
    #[serde(rename = "Dec")]
    pub dec: f64,
    pub r_mag: f32,
    pub priority: i32,
    pub remaining_observations: f32,
    #[serde(rename = "N_observations_to_complete")]
    pub n_observations_to_complete: f32,
    #[serde(rename = "type", default = "default_type")]
    pub kind: i32,
}

fn default_type() -> i32 {
    GALAXY_TYPE
}

impl TargetRecord {
    pub fn position(&self) -> SkyPosition {
        SkyPosition::new(self.ra, self.dec)
    }
}

/// One row of a guide-star or standard-star catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    #[serde(rename = "ID")]
    pub id: TargetId,
    #[serde(rename = "RA")]
    pub ra: f64,
    #[serde(rename = "Dec")]
    pub dec: f64,
    pub r_mag: f32,
}

impl StarRecord {
    pub fn position(&self) -> SkyPosition {
        SkyPosition::new(self.ra, self.dec)
    }
}

/// A target row plus the bookkeeping the tiling run writes into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetState {
    pub record: TargetRecord,
    pub completed: bool,
    /// Tile that last observed this target.
    pub tile_number: Option<usize>,
    /// Global order in which the target was first selected.
    pub selection_index: Option<usize>,
}

impl TargetState {
    fn new(record: TargetRecord) -> Self {
        let completed = record.remaining_observations <= 0.0;
        Self {
            record,
            completed,
            tile_number: None,
            selection_index: None,
        }
    }

    pub fn id(&self) -> TargetId {
        self.record.id
    }

    pub fn position(&self) -> SkyPosition {
        self.record.position()
    }
}

/// Targets keyed by ID. Iteration order is ascending ID, which keeps every
/// pass over the catalogue deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetCatalogue {
    rows: BTreeMap<TargetId, TargetState>,
}

impl TargetCatalogue {
    /// Build a catalogue, rejecting duplicate IDs.
    pub fn from_records(records: Vec<TargetRecord>) -> PipelineResult<Self> {
        let mut rows = BTreeMap::new();
        for record in records {
            let id = record.id;
            if rows.insert(id, TargetState::new(record)).is_some() {
                return Err(PipelineError::catalogue(format!("duplicate target ID {}", id)));
            }
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&TargetState> {
        self.rows.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetState> {
        self.rows.values()
    }

    pub fn uncompleted(&self) -> impl Iterator<Item = &TargetState> {
        self.rows.values().filter(|t| !t.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.rows.values().filter(|t| t.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        self.rows.values().all(|t| t.completed)
    }

    /// Record one observation of `id` on `tile`.
    ///
    /// Decrements `remaining_observations` (never below zero) and flips
    /// `completed` once it reaches zero. Completion never reverts.
    pub fn record_observation(
        &mut self,
        id: TargetId,
        tile: usize,
        selection_index: usize,
    ) -> PipelineResult<()> {
        let state = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| PipelineError::catalogue(format!("unknown target ID {}", id)))?;

        state.tile_number = Some(tile);
        state.selection_index.get_or_insert(selection_index);
        if !state.completed {
            let remaining = state.record.remaining_observations - 1.0;
            state.record.remaining_observations = remaining.max(0.0);
            if state.record.remaining_observations <= 0.0 {
                state.completed = true;
            }
        }
        Ok(())
    }

    /// Input rows in ID order.
    pub fn records(&self) -> impl Iterator<Item = &TargetRecord> {
        self.rows.values().map(|t| &t.record)
    }
}

/// Guide or standard stars, kept in ascending ID order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarCatalogue {
    stars: Vec<StarRecord>,
}

impl StarCatalogue {
    pub fn new(mut stars: Vec<StarRecord>) -> Self {
        stars.sort_by_key(|s| s.id);
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StarRecord> {
        self.stars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: TargetId, remaining: f32) -> TargetRecord {
        TargetRecord {
            id,
            ra: 10.0,
            dec: -5.0,
            r_mag: 17.0,
            priority: 1,
            remaining_observations: remaining,
            n_observations_to_complete: remaining,
            kind: GALAXY_TYPE,
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = TargetCatalogue::from_records(vec![record(1, 1.0), record(1, 1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_observation_completes_target() {
        let mut cat = TargetCatalogue::from_records(vec![record(7, 2.0)]).unwrap();
        cat.record_observation(7, 0, 0).unwrap();
        assert!(!cat.get(7).unwrap().completed);
        cat.record_observation(7, 1, 5).unwrap();

        let state = cat.get(7).unwrap();
        assert!(state.completed);
        assert_eq!(state.record.remaining_observations, 0.0);
        assert_eq!(state.tile_number, Some(1));
        assert_eq!(state.selection_index, Some(0));
    }

    #[test]
    fn test_repeat_observation_never_goes_negative() {
        let mut cat = TargetCatalogue::from_records(vec![record(3, 1.0)]).unwrap();
        cat.record_observation(3, 0, 0).unwrap();
        cat.record_observation(3, 1, 1).unwrap();
        let state = cat.get(3).unwrap();
        assert!(state.completed);
        assert_eq!(state.record.remaining_observations, 0.0);
    }

    #[test]
    fn test_zero_remaining_starts_completed() {
        let cat = TargetCatalogue::from_records(vec![record(1, 0.0), record(2, 1.0)]).unwrap();
        assert_eq!(cat.completed_count(), 1);
        assert_eq!(cat.uncompleted().count(), 1);
    }

    #[test]
    fn test_unknown_target_observation_is_an_error() {
        let mut cat = TargetCatalogue::default();
        assert!(cat.record_observation(99, 0, 0).is_err());
    }
}
