//! Plate configuration engine.
//!
//! Builds the magnets for one tile, detects which pickup areas each magnet
//! blocks for its neighbours, and decides whether the robot can place and
//! collect every magnet.
//!
//! # Components
//!
//! - [`instrument`]: plate and magnet dimensions
//! - [`pickup`]: approach directions and the per-magnet [`PickupSet`]
//! - [`magnet`]: magnet bodies and pickup-area footprints
//! - [`hexabundle`]: the per-tile arena of hexabundles and magnets
//! - [`conflicts`]: the pairwise conflict pass
//! - [`configuration`]: the feasibility verdict, robot rows and conflicts record

pub mod configuration;
pub mod conflicts;
pub mod hexabundle;
pub mod instrument;
pub mod magnet;
pub mod pickup;

pub use configuration::{
    check_magnets, configure_plate, ConflictsLog, PickupAssignment, PlateConfiguration, RobotRow,
};
pub use conflicts::{BlockedMagnet, BodyCollision, ConflictTable, ConflictedMagnet, PickupState};
pub use hexabundle::{Hexabundle, HexabundleLabel, MemberKind, Placement, PlateLayout};
pub use instrument::InstrumentConfig;
pub use magnet::{HexabundleIndex, Magnet, MagnetBody, MagnetIndex, MagnetKind};
pub use pickup::{CircularPickup, PickupArea, PickupSet, RectangularPickup};
