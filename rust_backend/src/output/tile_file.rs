//! Tile file: centre, input fingerprint and one row per member.
//!
//! Numbers are written at fixed precision so two runs with the same seed and
//! inputs produce identical bytes.

use std::io::Write;

use crate::plate::{BlockedMagnet, BodyCollision, MemberKind};
use crate::tiling::{MemberRow, Tile};

pub const TILE_COLUMNS: &str = "ID RA Dec r_mag priority remaining_observations \
N_observations_to_complete type kind Hexabundle repeat MagnetX MagnetY MagnetX_noDC MagnetY_noDC";

/// Placeholder for catalogue columns stars do not carry.
const MISSING: &str = "-";

/// Write one tile file.
///
/// # Arguments
/// * `out` - Destination
/// * `tile` - The accepted tile
/// * `fingerprint` - SHA-256 of the input target catalogue
pub fn write_tile<W: Write>(out: &mut W, tile: &Tile, fingerprint: &str) -> std::io::Result<()> {
    write_with_notes(out, tile, fingerprint, &[])
}

/// Write the tile that ended a run, with one `#` line per blocked magnet and
/// per collision after the usual header.
pub fn write_infeasible_tile<W: Write>(
    out: &mut W,
    tile: &Tile,
    fingerprint: &str,
    blocked: &[BlockedMagnet],
    collisions: &[BodyCollision],
) -> std::io::Result<()> {
    let notes: Vec<String> = std::iter::once("infeasible".to_string())
        .chain(
            blocked
                .iter()
                .map(|b| format!("blocked {} {}", b.class_name(), b.index)),
        )
        .chain(
            collisions
                .iter()
                .map(|c| format!("collision {} {}", c.first, c.second)),
        )
        .collect();
    write_with_notes(out, tile, fingerprint, &notes)
}

fn write_with_notes<W: Write>(
    out: &mut W,
    tile: &Tile,
    fingerprint: &str,
    notes: &[String],
) -> std::io::Result<()> {
    writeln!(out, "# Hector tile {}", tile.number)?;
    writeln!(out, "# centre_ra {:.6}", tile.centre.ra.value())?;
    writeln!(out, "# centre_dec {:.6}", tile.centre.dec.value())?;
    writeln!(out, "# catalogue_sha256 {}", fingerprint)?;
    writeln!(
        out,
        "# members {} targets, {} standards, {} guides",
        tile.members_of(MemberKind::Target).count(),
        tile.members_of(MemberKind::Standard).count(),
        tile.members_of(MemberKind::Guide).count()
    )?;
    for note in notes {
        writeln!(out, "# {}", note)?;
    }
    writeln!(out, "{}", TILE_COLUMNS)?;

    for member in &tile.members {
        let (catalogue_columns, r_mag) = match &member.row {
            MemberRow::Target(r) => (
                format!(
                    "{} {:.4} {:.4} {}",
                    r.priority, r.remaining_observations, r.n_observations_to_complete, r.kind
                ),
                r.r_mag,
            ),
            MemberRow::Star(s) => ([MISSING; 4].join(" "), s.r_mag),
        };
        let position = member.row.position();
        writeln!(
            out,
            "{} {:.8} {:.8} {:.4} {} {} {} {} {:.4} {:.4} {:.4} {:.4}",
            member.row.id(),
            position.ra.value(),
            position.dec.value(),
            r_mag,
            catalogue_columns,
            member.kind.as_str(),
            member.label,
            u8::from(member.is_repeat),
            member.magnet.x,
            member.magnet.y,
            member.magnet_no_dc.x,
            member.magnet_no_dc.y,
        )?;
    }
    Ok(())
}
