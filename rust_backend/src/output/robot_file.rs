//! Robot file: one CSV row per magnet, in the robot's viewing frame.

use std::io::Write;

use crate::plate::{InstrumentConfig, PlateConfiguration};

pub const ROBOT_HEADER: &str =
    "Hexabundle,#Magnet,Center_x,Center_y,rot_holdingPosition,rot_platePlacing";

pub fn write_robot_file<W: Write>(
    out: &mut W,
    plate: &PlateConfiguration,
    cfg: &InstrumentConfig,
) -> std::io::Result<()> {
    writeln!(out, "{}", ROBOT_HEADER)?;
    for row in plate.robot_rows(cfg) {
        writeln!(
            out,
            "{},{},{:.4},{:.4},{:.4},{:.4}",
            row.hexabundle,
            row.magnet_class,
            row.center_x,
            row.center_y,
            row.rot_holding_position,
            row.rot_plate_placing
        )?;
    }
    Ok(())
}
