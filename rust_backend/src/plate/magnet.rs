//! Magnets: the circular and rectangular bodies a hexabundle places on the
//! plate, together with the pickup-area geometry around them.
//!
//! Magnets are immutable. Which pickup areas survive a tile is tracked by
//! [`ConflictTable`](super::conflicts::ConflictTable), keyed by magnet index.

use std::fmt;

use qtty::{Degree, Degrees, Radian, Radians};
use serde::{Deserialize, Serialize};

use super::instrument::InstrumentConfig;
use super::pickup::{PickupArea, PickupSet};
use crate::geometry::{
    circle_overlaps_rectangle, circles_overlap, rectangles_overlap, Circle, GeometryError, Point,
    Rectangle, Tolerance,
};

/// Position of a magnet in its tile's magnet arena.
pub type MagnetIndex = usize;

/// Position of a hexabundle in its tile's hexabundle arena.
pub type HexabundleIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnetKind {
    Circular,
    Rectangular,
}

impl MagnetKind {
    /// Name used in robot files and the conflicts record.
    pub fn class_name(&self) -> &'static str {
        match self {
            MagnetKind::Circular => "circular_magnet",
            MagnetKind::Rectangular => "rectangular_magnet",
        }
    }

    /// Every pickup area this kind of magnet starts with.
    pub fn all_pickups(&self) -> PickupSet {
        match self {
            MagnetKind::Circular => PickupSet::from_areas(&PickupArea::CIRCULAR),
            MagnetKind::Rectangular => PickupSet::from_areas(&PickupArea::RECTANGULAR),
        }
    }
}

impl fmt::Display for MagnetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MagnetBody {
    Circle(Circle),
    Rectangle(Rectangle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Magnet {
    pub index: MagnetIndex,
    pub hexabundle: HexabundleIndex,
    pub body: MagnetBody,
}

impl Magnet {
    /// Circular magnet centred on `center`.
    pub fn circular(
        index: MagnetIndex,
        hexabundle: HexabundleIndex,
        center: Point,
        orientation: Radians,
        cfg: &InstrumentConfig,
    ) -> Result<Self, GeometryError> {
        let circle = Circle::new(center, cfg.circular_magnet_radius_mm, orientation)?;
        Ok(Self {
            index,
            hexabundle,
            body: MagnetBody::Circle(circle),
        })
    }

    /// Rectangular magnet sitting against a circular magnet centred on
    /// `circle_center`, long axis along `orientation`.
    pub fn rectangular(
        index: MagnetIndex,
        hexabundle: HexabundleIndex,
        circle_center: Point,
        orientation: Radians,
        cfg: &InstrumentConfig,
    ) -> Result<Self, GeometryError> {
        let axis = Point::from_angle(orientation);
        let offset = cfg.circular_magnet_radius_mm + cfg.rectangular_magnet_length_mm / 2.0;
        let rect = Rectangle::new(
            circle_center + axis * offset,
            cfg.rectangular_magnet_length_mm,
            cfg.rectangular_magnet_width_mm,
            orientation,
        )?;
        Ok(Self {
            index,
            hexabundle,
            body: MagnetBody::Rectangle(rect),
        })
    }

    pub fn kind(&self) -> MagnetKind {
        match self.body {
            MagnetBody::Circle(_) => MagnetKind::Circular,
            MagnetBody::Rectangle(_) => MagnetKind::Rectangular,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.kind().class_name()
    }

    pub fn center(&self) -> Point {
        match &self.body {
            MagnetBody::Circle(c) => c.center,
            MagnetBody::Rectangle(r) => r.center,
        }
    }

    pub fn orientation(&self) -> Radians {
        match &self.body {
            MagnetBody::Circle(c) => c.orientation,
            MagnetBody::Rectangle(r) => r.orientation,
        }
    }

    /// Orientation in `[0, 360)` degrees, written as `rot_platePlacing`.
    pub fn placing_angle(&self) -> Degrees {
        self.orientation().to::<Degree>().wrap_pos()
    }

    /// Distance from the centre to the body edge along the orientation axis.
    fn reach(&self) -> f64 {
        match &self.body {
            MagnetBody::Circle(c) => c.radius,
            MagnetBody::Rectangle(r) => r.width / 2.0,
        }
    }

    /// Plate footprint of one pickup area.
    pub fn pickup_rectangle(
        &self,
        area: PickupArea,
        cfg: &InstrumentConfig,
    ) -> Result<Rectangle, GeometryError> {
        let direction = Radians::new(
            self.orientation().value() + area.holding_angle().to::<Radian>().value(),
        );
        let offset = self.reach() + cfg.pickup_gap_mm + cfg.pickup_length_mm / 2.0;
        Rectangle::new(
            self.center() + Point::from_angle(direction) * offset,
            cfg.pickup_length_mm,
            cfg.pickup_width_mm,
            direction,
        )
    }

    /// Every pickup area of this magnet with its footprint, in preference
    /// order.
    pub fn pickup_areas(
        &self,
        cfg: &InstrumentConfig,
    ) -> Result<Vec<(PickupArea, Rectangle)>, GeometryError> {
        self.kind()
            .all_pickups()
            .iter()
            .map(|area| Ok((area, self.pickup_rectangle(area, cfg)?)))
            .collect()
    }

    /// Whether this magnet's body covers any part of `rect`.
    pub fn body_overlaps_rectangle(&self, rect: &Rectangle, tol: Tolerance) -> bool {
        match &self.body {
            MagnetBody::Circle(c) => circle_overlaps_rectangle(c, rect, tol),
            MagnetBody::Rectangle(r) => rectangles_overlap(r, rect, tol),
        }
    }

    /// Whether two magnet bodies share any area.
    pub fn body_overlaps(&self, other: &Magnet, tol: Tolerance) -> bool {
        match (&self.body, &other.body) {
            (MagnetBody::Circle(a), MagnetBody::Circle(b)) => circles_overlap(a, b, tol),
            (MagnetBody::Circle(c), MagnetBody::Rectangle(r))
            | (MagnetBody::Rectangle(r), MagnetBody::Circle(c)) => {
                circle_overlaps_rectangle(c, r, tol)
            }
            (MagnetBody::Rectangle(a), MagnetBody::Rectangle(b)) => rectangles_overlap(a, b, tol),
        }
    }
}
