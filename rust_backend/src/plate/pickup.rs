//! Pickup areas: the regions next to a magnet the robot gripper enters.
//!
//! Circular magnets can be approached from four directions, rectangular
//! magnets from either end of their long axis. Each direction is an explicit
//! variant; a magnet's surviving directions are tracked in a [`PickupSet`].

use std::fmt;

use qtty::Degrees;
use serde::{Deserialize, Serialize};

/// Approach directions for a circular magnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircularPickup {
    RadialInward,
    TangentialLeft,
    TangentialRight,
    RadialOutward,
}

/// Approach directions for a rectangular magnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectangularPickup {
    Inward,
    Outward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupArea {
    Circular(CircularPickup),
    Rectangular(RectangularPickup),
}

impl PickupArea {
    /// Circular directions in the order the robot prefers them.
    pub const CIRCULAR: [PickupArea; 4] = [
        PickupArea::Circular(CircularPickup::RadialInward),
        PickupArea::Circular(CircularPickup::TangentialLeft),
        PickupArea::Circular(CircularPickup::TangentialRight),
        PickupArea::Circular(CircularPickup::RadialOutward),
    ];

    /// Rectangular directions in the order the robot prefers them.
    pub const RECTANGULAR: [PickupArea; 2] = [
        PickupArea::Rectangular(RectangularPickup::Outward),
        PickupArea::Rectangular(RectangularPickup::Inward),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PickupArea::Circular(CircularPickup::RadialInward) => "radial_inward",
            PickupArea::Circular(CircularPickup::TangentialLeft) => "tangential_left",
            PickupArea::Circular(CircularPickup::TangentialRight) => "tangential_right",
            PickupArea::Circular(CircularPickup::RadialOutward) => "radial_outward",
            PickupArea::Rectangular(RectangularPickup::Inward) => "inward",
            PickupArea::Rectangular(RectangularPickup::Outward) => "outward",
        }
    }

    /// Direction of the area relative to the magnet orientation, which is
    /// also the gripper's holding angle (`rot_holdingPosition`).
    pub fn holding_angle(&self) -> Degrees {
        let deg = match self {
            PickupArea::Circular(CircularPickup::RadialOutward) => 0.0,
            PickupArea::Circular(CircularPickup::TangentialLeft) => 90.0,
            PickupArea::Circular(CircularPickup::RadialInward) => 180.0,
            PickupArea::Circular(CircularPickup::TangentialRight) => 270.0,
            PickupArea::Rectangular(RectangularPickup::Outward) => 0.0,
            PickupArea::Rectangular(RectangularPickup::Inward) => 180.0,
        };
        Degrees::new(deg)
    }

    fn bit(&self) -> u8 {
        match self {
            PickupArea::Circular(CircularPickup::RadialInward) => 1 << 0,
            PickupArea::Circular(CircularPickup::TangentialLeft) => 1 << 1,
            PickupArea::Circular(CircularPickup::TangentialRight) => 1 << 2,
            PickupArea::Circular(CircularPickup::RadialOutward) => 1 << 3,
            PickupArea::Rectangular(RectangularPickup::Inward) => 1 << 4,
            PickupArea::Rectangular(RectangularPickup::Outward) => 1 << 5,
        }
    }
}

impl fmt::Display for PickupArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The pickup directions still usable for one magnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickupSet(u8);

impl PickupSet {
    pub fn empty() -> Self {
        PickupSet(0)
    }

    pub fn from_areas(areas: &[PickupArea]) -> Self {
        PickupSet(areas.iter().fold(0, |bits, a| bits | a.bit()))
    }

    pub fn contains(&self, area: PickupArea) -> bool {
        self.0 & area.bit() != 0
    }

    /// Returns true when `area` was present.
    pub fn remove(&mut self, area: PickupArea) -> bool {
        let present = self.contains(area);
        self.0 &= !area.bit();
        present
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Remaining areas in preference order.
    pub fn iter(self) -> impl Iterator<Item = PickupArea> {
        PickupArea::CIRCULAR
            .iter()
            .chain(PickupArea::RECTANGULAR.iter())
            .copied()
            .filter(move |a| self.contains(*a))
    }
}
