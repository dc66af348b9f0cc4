//! Pairwise conflict detection between magnets of one tile.
//!
//! For every ordered pair (A, B) of magnets from different hexabundles, A's
//! body is tested against each pickup area of B. A hit is recorded as a
//! [`ConflictedMagnet`] and removes that area from B's entry in the
//! [`ConflictTable`]. Removal is monotone within a pass.

use serde::Serialize;

use super::instrument::InstrumentConfig;
use super::magnet::{Magnet, MagnetIndex, MagnetKind};
use super::pickup::{PickupArea, PickupSet};
use crate::geometry::GeometryError;

/// `blocking` covers the `area` pickup region of `blocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConflictedMagnet {
    pub blocking: MagnetIndex,
    pub blocked: MagnetIndex,
    pub area: PickupArea,
}

/// Two magnet bodies from different hexabundles share area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BodyCollision {
    pub first: MagnetIndex,
    pub second: MagnetIndex,
}

/// A magnet that lost every pickup direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockedMagnet {
    pub index: MagnetIndex,
    pub kind: MagnetKind,
}

impl BlockedMagnet {
    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickupState {
    Unconstrained,
    PartiallyBlocked,
    FullyBlocked,
}

/// Surviving pickup areas per magnet, plus every conflict seen on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictTable {
    kinds: Vec<MagnetKind>,
    remaining: Vec<PickupSet>,
    conflicts: Vec<ConflictedMagnet>,
    collisions: Vec<BodyCollision>,
}

impl ConflictTable {
    /// Run the pairwise pass over `magnets`, which must be indexed `0..n`.
    pub fn detect(magnets: &[Magnet], cfg: &InstrumentConfig) -> Result<Self, GeometryError> {
        let tol = cfg.tolerance();
        let kinds: Vec<MagnetKind> = magnets.iter().map(Magnet::kind).collect();
        let mut remaining: Vec<PickupSet> = kinds.iter().map(MagnetKind::all_pickups).collect();
        let mut conflicts = Vec::new();
        let mut collisions = Vec::new();

        let footprints = magnets
            .iter()
            .map(|m| m.pickup_areas(cfg))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, blocking) in magnets.iter().enumerate() {
            for (j, blocked) in magnets.iter().enumerate() {
                if i == j || blocking.hexabundle == blocked.hexabundle {
                    continue;
                }
                if i < j && blocking.body_overlaps(blocked, tol) {
                    collisions.push(BodyCollision {
                        first: blocking.index,
                        second: blocked.index,
                    });
                }
                for (area, rect) in &footprints[j] {
                    if blocking.body_overlaps_rectangle(rect, tol) {
                        conflicts.push(ConflictedMagnet {
                            blocking: blocking.index,
                            blocked: blocked.index,
                            area: *area,
                        });
                        remaining[j].remove(*area);
                    }
                }
            }
        }

        Ok(Self {
            kinds,
            remaining,
            conflicts,
            collisions,
        })
    }

    pub fn remaining(&self, index: MagnetIndex) -> Option<PickupSet> {
        self.remaining.get(index).copied()
    }

    pub fn state(&self, index: MagnetIndex) -> Option<PickupState> {
        let remaining = self.remaining.get(index)?;
        let full = self.kinds[index].all_pickups();
        Some(if remaining.is_empty() {
            PickupState::FullyBlocked
        } else if *remaining == full {
            PickupState::Unconstrained
        } else {
            PickupState::PartiallyBlocked
        })
    }

    /// Magnets whose pickup set is empty, in index order.
    pub fn fully_blocked(&self) -> Vec<BlockedMagnet> {
        self.remaining
            .iter()
            .enumerate()
            .filter(|(_, set)| set.is_empty())
            .map(|(index, _)| BlockedMagnet {
                index,
                kind: self.kinds[index],
            })
            .collect()
    }

    pub fn conflicts(&self) -> &[ConflictedMagnet] {
        &self.conflicts
    }

    pub fn collisions(&self) -> &[BodyCollision] {
        &self.collisions
    }

    pub fn is_feasible(&self) -> bool {
        self.collisions.is_empty() && self.remaining.iter().all(|set| !set.is_empty())
    }
}
