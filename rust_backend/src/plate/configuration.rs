//! Per-tile feasibility verdict, pickup assignment and the conflicts record.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error};
use qtty::{Degrees, Radian, Radians};
use serde::Serialize;

use super::conflicts::{BlockedMagnet, ConflictTable};
use super::hexabundle::{HexabundleLabel, PlateLayout};
use super::instrument::InstrumentConfig;
use super::magnet::{Magnet, MagnetIndex};
use super::pickup::PickupArea;
use crate::error::{PipelineError, PipelineResult};

/// Pickup direction chosen for one magnet of a feasible tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PickupAssignment {
    pub magnet: MagnetIndex,
    pub pickup: PickupArea,
    pub rot_holding_position: Degrees,
    pub rot_plate_placing: Degrees,
}

impl PickupAssignment {
    /// Gripper angle in the robot frame: `270° - holding - placing`.
    pub fn robot_angle(&self) -> Radians {
        Degrees::new(270.0 - self.rot_holding_position.value() - self.rot_plate_placing.value())
            .to::<Radian>()
    }
}

/// One row of the robot file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotRow {
    pub hexabundle: HexabundleLabel,
    pub magnet_class: &'static str,
    pub center_x: f64,
    pub center_y: f64,
    pub rot_holding_position: f64,
    pub rot_plate_placing: f64,
}

/// A tile whose magnets can all be placed and picked up.
#[derive(Debug, Clone)]
pub struct PlateConfiguration {
    pub tile_file: String,
    pub layout: PlateLayout,
    pub table: ConflictTable,
    pub assignments: Vec<PickupAssignment>,
}

impl PlateConfiguration {
    /// Robot rows, one per magnet, centres in the robot's viewing frame.
    pub fn robot_rows(&self, cfg: &InstrumentConfig) -> Vec<RobotRow> {
        self.assignments
            .iter()
            .filter_map(|assignment| {
                let magnet = self.layout.magnet(assignment.magnet)?;
                let bundle = self.layout.hexabundle_of(magnet)?;
                let view = magnet.center().view();
                Some(RobotRow {
                    hexabundle: bundle.label,
                    magnet_class: magnet.class_name(),
                    center_x: view.x + cfg.robot_offset_x_mm,
                    center_y: view.y + cfg.robot_offset_y_mm,
                    rot_holding_position: assignment.rot_holding_position.value(),
                    rot_plate_placing: assignment.rot_plate_placing.value(),
                })
            })
            .collect()
    }
}

/// Check a tile's layout and pick a pickup direction for every magnet.
///
/// Fully blocked magnets are logged, appended to `conflicts_log` when one is
/// given, and returned inside [`PipelineError::InfeasibleTile`]. Body
/// collisions make the tile infeasible as well.
pub fn configure_plate(
    tile_file: &str,
    layout: PlateLayout,
    cfg: &InstrumentConfig,
    conflicts_log: Option<&ConflictsLog>,
) -> PipelineResult<PlateConfiguration> {
    let table = ConflictTable::detect(layout.magnets(), cfg)?;
    debug!(
        "{}: {} pickup conflicts among {} magnets",
        tile_file,
        table.conflicts().len(),
        layout.magnets().len()
    );
    verdict(tile_file, &table, conflicts_log)?;

    let mut assignments = Vec::with_capacity(layout.magnets().len());
    for magnet in layout.magnets() {
        let pickup = table
            .remaining(magnet.index)
            .and_then(|set| set.iter().next())
            .ok_or_else(|| {
                PipelineError::configuration(format!(
                    "magnet {} has no pickup table entry",
                    magnet.index
                ))
            })?;
        assignments.push(PickupAssignment {
            magnet: magnet.index,
            pickup,
            rot_holding_position: pickup.holding_angle(),
            rot_plate_placing: magnet.placing_angle(),
        });
    }

    Ok(PlateConfiguration {
        tile_file: tile_file.to_string(),
        layout,
        table,
        assignments,
    })
}

/// Append-only record of fully blocked magnets, one
/// `<class_name> <index> <tile_filename>` line each.
///
/// The file is opened for every append and closed before returning.
#[derive(Debug, Clone)]
pub struct ConflictsLog {
    path: PathBuf,
}

impl ConflictsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, tile_file: &str, blocked: &[BlockedMagnet]) -> std::io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for b in blocked {
            writeln!(writer, "{} {} {}", b.class_name(), b.index, tile_file)?;
        }
        writer.flush()
    }
}

/// Verdict for a bare set of magnets, without hexabundle bookkeeping.
///
/// # Returns
/// * `Ok(ConflictTable)` when every magnet keeps a pickup area and no bodies
///   collide
/// * `Err(PipelineError::InfeasibleTile)` otherwise, after logging and
///   appending the fully blocked magnets to `conflicts_log`
pub fn check_magnets(
    tile_file: &str,
    magnets: &[Magnet],
    cfg: &InstrumentConfig,
    conflicts_log: Option<&ConflictsLog>,
) -> PipelineResult<ConflictTable> {
    let table = ConflictTable::detect(magnets, cfg)?;
    verdict(tile_file, &table, conflicts_log)?;
    Ok(table)
}

fn verdict(
    tile_file: &str,
    table: &ConflictTable,
    conflicts_log: Option<&ConflictsLog>,
) -> PipelineResult<()> {
    if table.is_feasible() {
        return Ok(());
    }
    let blocked = table.fully_blocked();
    for b in &blocked {
        error!("{} {} is fully blocked in {}", b.class_name(), b.index, tile_file);
    }
    for c in table.collisions() {
        error!("magnets {} and {} collide in {}", c.first, c.second, tile_file);
    }
    if let Some(log) = conflicts_log {
        log.append(tile_file, &blocked)?;
    }
    let conflicts = table
        .conflicts()
        .iter()
        .filter(|c| blocked.iter().any(|b| b.index == c.blocked))
        .copied()
        .collect();
    Err(PipelineError::infeasible(
        tile_file,
        blocked,
        table.collisions().to_vec(),
        conflicts,
    ))
}
