//! Completeness statistics for a tiling run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::engine::AcceptedTile;
use crate::catalogue::TargetCatalogue;

/// Completion per priority class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityCompletion {
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TilingSummary {
    pub tiles: usize,
    pub targets_total: usize,
    pub targets_completed: usize,
    /// `targets_completed / targets_total`, or 1 for an empty catalogue.
    pub completion_fraction: f64,
    pub completion_by_priority: BTreeMap<i32, PriorityCompletion>,
    /// New (non-repeat) targets per tile.
    pub mean_targets_per_tile: f64,
    /// Spare fibres filled with already completed targets.
    pub repeats: usize,
}

impl TilingSummary {
    pub fn compute(tiles: &[AcceptedTile], catalogue: &TargetCatalogue) -> Self {
        let targets_total = catalogue.len();
        let targets_completed = catalogue.completed_count();

        let mut completion_by_priority: BTreeMap<i32, PriorityCompletion> = BTreeMap::new();
        for state in catalogue.iter() {
            let entry = completion_by_priority
                .entry(state.record.priority)
                .or_default();
            entry.total += 1;
            if state.completed {
                entry.completed += 1;
            }
        }

        let (fresh, repeats) = tiles
            .iter()
            .flat_map(|t| t.tile.members.iter())
            .filter(|m| m.kind == crate::plate::MemberKind::Target)
            .fold((0usize, 0usize), |(fresh, repeats), m| {
                if m.is_repeat {
                    (fresh, repeats + 1)
                } else {
                    (fresh + 1, repeats)
                }
            });

        Self {
            tiles: tiles.len(),
            targets_total,
            targets_completed,
            completion_fraction: if targets_total == 0 {
                1.0
            } else {
                targets_completed as f64 / targets_total as f64
            },
            completion_by_priority,
            mean_targets_per_tile: if tiles.is_empty() {
                0.0
            } else {
                fresh as f64 / tiles.len() as f64
            },
            repeats,
        }
    }
}
