//! Hexabundles and the per-tile arena that owns them and their magnets.
//!
//! A hexabundle refers to its two magnets by index and each magnet refers
//! back to its hexabundle by index; the [`PlateLayout`] owns both vectors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::instrument::InstrumentConfig;
use super::magnet::{HexabundleIndex, Magnet, MagnetIndex};
use crate::catalogue::TargetId;
use crate::error::{PipelineError, PipelineResult};
use crate::geometry::Point;

/// Bundle label: science bundles `A`..`U`, guide bundles `GS1`..`GS6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HexabundleLabel {
    Science(char),
    Guide(u8),
}

impl HexabundleLabel {
    /// The `n`-th science label (0 -> `A`).
    pub fn science(n: usize) -> Option<Self> {
        (n < 21).then(|| HexabundleLabel::Science((b'A' + n as u8) as char))
    }

    /// The `n`-th guide label (0 -> `GS1`).
    pub fn guide(n: usize) -> Option<Self> {
        (n < 6).then(|| HexabundleLabel::Guide(n as u8 + 1))
    }
}

impl fmt::Display for HexabundleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexabundleLabel::Science(c) => write!(f, "{}", c),
            HexabundleLabel::Guide(n) => write!(f, "GS{}", n),
        }
    }
}

/// What a tile member is observed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Target,
    Standard,
    Guide,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Target => "target",
            MemberKind::Standard => "standard",
            MemberKind::Guide => "guide",
        }
    }
}

/// A member to be placed on the plate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub label: HexabundleLabel,
    pub member_id: TargetId,
    pub kind: MemberKind,
    /// Corrected plate position of the bundle.
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hexabundle {
    pub label: HexabundleLabel,
    pub member_id: TargetId,
    pub kind: MemberKind,
    pub circular: MagnetIndex,
    pub rectangular: MagnetIndex,
}

/// Arena of hexabundles and magnets for one tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlateLayout {
    hexabundles: Vec<Hexabundle>,
    magnets: Vec<Magnet>,
}

impl PlateLayout {
    /// Place every member: a circular magnet on its position and a
    /// rectangular magnet radially outward of it.
    pub fn build(placements: &[Placement], cfg: &InstrumentConfig) -> PipelineResult<Self> {
        let mut layout = PlateLayout::default();
        for placement in placements {
            if layout.hexabundles.iter().any(|h| h.label == placement.label) {
                return Err(PipelineError::configuration(format!(
                    "hexabundle {} assigned twice",
                    placement.label
                )));
            }
            let hexabundle: HexabundleIndex = layout.hexabundles.len();
            // Bundles at the plate centre have no radial direction; they
            // point along +x.
            let orientation = placement.position.angle();
            let circular = layout.magnets.len();
            layout.magnets.push(Magnet::circular(
                circular,
                hexabundle,
                placement.position,
                orientation,
                cfg,
            )?);
            let rectangular = layout.magnets.len();
            layout.magnets.push(Magnet::rectangular(
                rectangular,
                hexabundle,
                placement.position,
                orientation,
                cfg,
            )?);
            layout.hexabundles.push(Hexabundle {
                label: placement.label,
                member_id: placement.member_id,
                kind: placement.kind,
                circular,
                rectangular,
            });
        }
        Ok(layout)
    }

    pub fn magnets(&self) -> &[Magnet] {
        &self.magnets
    }

    pub fn hexabundles(&self) -> &[Hexabundle] {
        &self.hexabundles
    }

    pub fn magnet(&self, index: MagnetIndex) -> Option<&Magnet> {
        self.magnets.get(index)
    }

    /// Owning hexabundle of a magnet.
    pub fn hexabundle_of(&self, magnet: &Magnet) -> Option<&Hexabundle> {
        self.hexabundles.get(magnet.hexabundle)
    }
}
