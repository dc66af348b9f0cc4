//! Text outputs of a tiling run.
//!
//! # Components
//!
//! - [`tile_file`]: per-tile member list with plate positions
//! - [`robot_file`]: per-magnet placement rows for the configuration robot
//!
//! [`write_run_outputs`] writes both files for every accepted tile plus a
//! `summary.json` into one directory. A run that stopped on an infeasible
//! plate also gets that tile's file, marked as such, and no robot file for
//! it.

pub mod robot_file;
pub mod tile_file;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::PipelineResult;
use crate::plate::InstrumentConfig;
use crate::tiling::{Termination, TilingRun, TilingSummary};

pub use robot_file::{write_robot_file, ROBOT_HEADER};
pub use tile_file::{write_infeasible_tile, write_tile, TILE_COLUMNS};

pub const SUMMARY_FILE: &str = "summary.json";

/// Write tile files, robot files and the run summary into `dir`.
///
/// # Returns
/// The paths written, tile and robot file of each tile in order, then the
/// infeasible tile if the run ended on one, then the summary.
pub fn write_run_outputs(
    dir: &Path,
    run: &TilingRun,
    cfg: &InstrumentConfig,
) -> PipelineResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(run.tiles.len() * 2 + 1);

    for accepted in &run.tiles {
        let tile_path = dir.join(accepted.tile.file_name());
        let mut out = BufWriter::new(File::create(&tile_path)?);
        write_tile(&mut out, &accepted.tile, &run.fingerprint)?;
        out.flush()?;
        written.push(tile_path);

        let robot_path = dir.join(accepted.tile.robot_file_name());
        let mut out = BufWriter::new(File::create(&robot_path)?);
        write_robot_file(&mut out, &accepted.plate, cfg)?;
        out.flush()?;
        written.push(robot_path);
    }

    if let (
        Some(tile),
        Termination::Infeasible {
            blocked,
            collisions,
            ..
        },
    ) = (&run.infeasible, &run.termination)
    {
        let tile_path = dir.join(tile.file_name());
        let mut out = BufWriter::new(File::create(&tile_path)?);
        write_infeasible_tile(&mut out, tile, &run.fingerprint, blocked, collisions)?;
        out.flush()?;
        written.push(tile_path);
    }

    let summary_path = dir.join(SUMMARY_FILE);
    write_summary(&summary_path, &run.summary)?;
    written.push(summary_path);

    info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &TilingSummary) -> PipelineResult<()> {
    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::from)?;
    fs::write(path, json + "\n")?;
    Ok(())
}
