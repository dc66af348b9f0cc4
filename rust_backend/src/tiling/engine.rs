//! The tiling loop: choose a centre, assemble the field, configure the plate,
//! record the observations, repeat.
//!
//! A field whose plate is infeasible is amended before its centre is given
//! up: for every fully blocked magnet and every body collision one target is
//! dropped from the clash (repeats before new targets, then the lowest
//! priority, then the latest member) and the field is drawn again without
//! it. A clash made only of guides and standards cannot be amended.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::centre::{chooser_for, CentreSearch};
use super::config::PipelineConfig;
use super::selection::{assemble_tile, FieldOfView, TileSelection};
use super::summary::TilingSummary;
use crate::catalogue::{
    catalogue_fingerprint, StarCatalogue, StarRecord, TargetCatalogue, TargetId, TargetRecord,
};
use crate::error::{PipelineError, PipelineResult};
use crate::geometry::Point;
use crate::plate::{
    configure_plate, BlockedMagnet, BodyCollision, ConflictedMagnet, ConflictsLog,
    HexabundleIndex, HexabundleLabel, MagnetIndex, MemberKind, Placement, PlateConfiguration,
    PlateLayout,
};
use crate::sky::{DistortionCorrection, NoDistortion, SkyPosition};

/// Input row behind a tile member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MemberRow {
    Target(TargetRecord),
    Star(StarRecord),
}

impl MemberRow {
    pub fn id(&self) -> TargetId {
        match self {
            MemberRow::Target(r) => r.id,
            MemberRow::Star(r) => r.id,
        }
    }

    pub fn position(&self) -> SkyPosition {
        match self {
            MemberRow::Target(r) => r.position(),
            MemberRow::Star(r) => r.position(),
        }
    }

    /// Target priority; stars carry none.
    pub fn priority(&self) -> i32 {
        match self {
            MemberRow::Target(r) => r.priority,
            MemberRow::Star(_) => 0,
        }
    }
}

/// One hexabundle's worth of tile content.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMember {
    pub label: HexabundleLabel,
    pub kind: MemberKind,
    pub row: MemberRow,
    pub is_repeat: bool,
    /// Plate position before distortion correction.
    pub magnet_no_dc: Point,
    /// Plate position after distortion correction.
    pub magnet: Point,
}

/// An accepted pointing.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// 1-based tile number.
    pub number: usize,
    pub centre: SkyPosition,
    pub members: Vec<TileMember>,
}

impl Tile {
    /// Name of the tile file; also the key of conflicts-record lines.
    pub fn file_name(&self) -> String {
        tile_file_name(self.number)
    }

    pub fn robot_file_name(&self) -> String {
        format!("robot_{:03}.txt", self.number)
    }

    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &TileMember> {
        self.members.iter().filter(move |m| m.kind == kind)
    }

    pub fn target_ids(&self) -> Vec<TargetId> {
        self.members_of(MemberKind::Target).map(|m| m.row.id()).collect()
    }
}

pub fn tile_file_name(number: usize) -> String {
    format!("tile_{:03}.txt", number)
}

#[derive(Debug, Clone)]
pub struct AcceptedTile {
    pub tile: Tile,
    pub plate: PlateConfiguration,
    /// Targets taken off this field so its plate could be configured, in the
    /// order they were dropped.
    pub dropped: Vec<TargetId>,
}

/// Centre given up on in best-effort mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTile {
    pub number: usize,
    pub centre: SkyPosition,
    pub reason: String,
}

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    AllCompleted,
    TileLimit,
    SelectionLimit,
    CandidatesExhausted {
        detail: String,
    },
    /// A plate could not be configured or amended and best-effort mode is
    /// off.
    Infeasible {
        tile_file: String,
        blocked: Vec<BlockedMagnet>,
        collisions: Vec<BodyCollision>,
    },
}

/// Outcome of a run. Accepted tiles are kept even when the run stops early.
#[derive(Debug, Clone)]
pub struct TilingRun {
    pub tiles: Vec<AcceptedTile>,
    pub catalogue: TargetCatalogue,
    pub termination: Termination,
    /// The tile that ended the run under [`Termination::Infeasible`].
    pub infeasible: Option<Tile>,
    pub skipped: Vec<SkippedTile>,
    /// SHA-256 of the input catalogue.
    pub fingerprint: String,
    pub summary: TilingSummary,
}

enum Attempt {
    Accepted(Box<AcceptedTile>),
    Exhausted(String),
    Infeasible {
        tile: Box<Tile>,
        blocked: Vec<BlockedMagnet>,
        collisions: Vec<BodyCollision>,
    },
}

/// Where a centre attempt ended when it produced no plate.
enum FieldOutcome {
    Recentre,
    Stuck {
        tile: Tile,
        blocked: Vec<BlockedMagnet>,
        collisions: Vec<BodyCollision>,
    },
}

/// Owns the star catalogues and the run configuration; each [`run`] takes
/// exclusive ownership of a target catalogue.
///
/// [`run`]: TilingEngine::run
pub struct TilingEngine {
    config: PipelineConfig,
    guides: StarCatalogue,
    standards: StarCatalogue,
    distortion: Box<dyn DistortionCorrection>,
    conflicts_log: Option<ConflictsLog>,
}

impl TilingEngine {
    pub fn new(config: PipelineConfig, guides: StarCatalogue, standards: StarCatalogue) -> Self {
        Self {
            config,
            guides,
            standards,
            distortion: Box::new(NoDistortion),
            conflicts_log: None,
        }
    }

    pub fn with_distortion(mut self, distortion: Box<dyn DistortionCorrection>) -> Self {
        self.distortion = distortion;
        self
    }

    pub fn with_conflicts_log(mut self, log: ConflictsLog) -> Self {
        self.conflicts_log = Some(log);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Tile the catalogue until every target is complete or a limit is hit.
    ///
    /// # Returns
    /// * `Ok(TilingRun)` with every accepted tile and the final catalogue,
    ///   including runs that stop on [`Termination::Infeasible`]
    /// * `Err(PipelineError)` for invalid configuration, catalogue
    ///   bookkeeping failures, or a failing conflicts record
    pub fn run(&self, mut catalogue: TargetCatalogue) -> PipelineResult<TilingRun> {
        self.config.validate()?;
        let settings = &self.config.tiling;
        let fingerprint = catalogue_fingerprint(&catalogue)?;
        let mut rng = StdRng::seed_from_u64(settings.seed);

        info!(
            "Tiling {} targets ({} already complete): {} tiling, {} selection, seed {}",
            catalogue.len(),
            catalogue.completed_count(),
            settings.tiling_type,
            settings.selection_type,
            settings.seed
        );

        let mut tiles: Vec<AcceptedTile> = Vec::new();
        let mut skipped = Vec::new();
        let mut infeasible = None;
        let mut selections = 0usize;

        let termination = loop {
            if catalogue.all_completed() {
                break Termination::AllCompleted;
            }
            if tiles.len() >= settings.n_tiles {
                break Termination::TileLimit;
            }
            let target_limit = match settings.nsel {
                Some(nsel) if selections >= nsel => break Termination::SelectionLimit,
                Some(nsel) => settings.n_targets_per_field.min(nsel - selections),
                None => settings.n_targets_per_field,
            };

            let number = tiles.len() + 1;
            match self.next_tile(number, &catalogue, target_limit, &mut rng, &mut skipped)? {
                Attempt::Accepted(accepted) => {
                    for member in accepted.tile.members_of(MemberKind::Target) {
                        catalogue.record_observation(member.row.id(), number, selections)?;
                        if !member.is_repeat {
                            selections += 1;
                        }
                    }
                    info!(
                        "Accepted {} at ({:.4}, {:.4}) with {} members; {}/{} targets complete",
                        accepted.tile.file_name(),
                        accepted.tile.centre.ra.value(),
                        accepted.tile.centre.dec.value(),
                        accepted.tile.members.len(),
                        catalogue.completed_count(),
                        catalogue.len()
                    );
                    tiles.push(*accepted);
                }
                Attempt::Exhausted(detail) => {
                    warn!("Stopping after {} tiles: {}", tiles.len(), detail);
                    break Termination::CandidatesExhausted { detail };
                }
                Attempt::Infeasible {
                    tile,
                    blocked,
                    collisions,
                } => {
                    error!(
                        "Stopping after {} tiles: {} cannot be configured",
                        tiles.len(),
                        tile.file_name()
                    );
                    let tile_file = tile.file_name();
                    infeasible = Some(*tile);
                    break Termination::Infeasible {
                        tile_file,
                        blocked,
                        collisions,
                    };
                }
            }
        };

        let summary = TilingSummary::compute(&tiles, &catalogue);
        info!(
            "Tiling finished ({:?}): {} tiles, {:.1}% complete",
            termination,
            summary.tiles,
            summary.completion_fraction * 100.0
        );

        Ok(TilingRun {
            tiles,
            catalogue,
            termination,
            infeasible,
            skipped,
            fingerprint,
            summary,
        })
    }

    /// Try centres for tile `number` until one yields a configured plate.
    fn next_tile(
        &self,
        number: usize,
        catalogue: &TargetCatalogue,
        target_limit: usize,
        rng: &mut StdRng,
        skipped: &mut Vec<SkippedTile>,
    ) -> PipelineResult<Attempt> {
        let settings = &self.config.tiling;
        let chooser = chooser_for(settings.tiling_type);
        let mut excluded: Vec<SkyPosition> = Vec::new();

        for attempt in 0..=settings.max_centre_retries {
            let search = CentreSearch::new(catalogue, &self.config.footprint, settings, &excluded);
            let Some(centre) = chooser.choose(&search, rng) else {
                return Ok(Attempt::Exhausted(
                    "no admissible tile centre remains".to_string(),
                ));
            };
            let fov = FieldOfView::new(centre, settings);
            let mut rejected: BTreeSet<TargetId> = BTreeSet::new();
            let mut dropped: Vec<TargetId> = Vec::new();

            let outcome = loop {
                let selection = match assemble_tile(
                    catalogue,
                    &self.guides,
                    &self.standards,
                    &fov,
                    settings,
                    target_limit,
                    &rejected,
                    rng,
                ) {
                    Ok(selection) => selection,
                    Err(e) if e.is_recoverable() => {
                        warn!(
                            "Tile {} attempt {}: {}; re-centring",
                            number,
                            attempt + 1,
                            e
                        );
                        break FieldOutcome::Recentre;
                    }
                    Err(e) => return Err(e.with_tile(number)),
                };

                let tile = self.place(number, centre, selection)?;
                let layout = self.layout(&tile).map_err(|e| e.with_tile(number))?;
                let owners: Vec<HexabundleIndex> =
                    layout.magnets().iter().map(|m| m.hexabundle).collect();
                match configure_plate(
                    &tile.file_name(),
                    layout,
                    &self.config.instrument,
                    self.conflicts_log.as_ref(),
                ) {
                    Ok(plate) => {
                        return Ok(Attempt::Accepted(Box::new(AcceptedTile {
                            tile,
                            plate,
                            dropped,
                        })));
                    }
                    Err(PipelineError::InfeasibleTile {
                        blocked,
                        collisions,
                        conflicts,
                        ..
                    }) => match victims(&tile, &owners, &blocked, &collisions, &conflicts) {
                        Some(ids) => {
                            info!(
                                "Tile {}: dropping target(s) {:?} to clear {} blocked magnet(s) \
                                 and {} collision(s)",
                                number,
                                ids,
                                blocked.len(),
                                collisions.len()
                            );
                            dropped.extend(ids.iter().copied());
                            rejected.extend(ids);
                        }
                        None => {
                            break FieldOutcome::Stuck {
                                tile,
                                blocked,
                                collisions,
                            }
                        }
                    },
                    Err(e) => return Err(e.with_tile(number)),
                }
            };

            match outcome {
                FieldOutcome::Recentre => excluded.push(centre),
                FieldOutcome::Stuck {
                    tile,
                    blocked,
                    collisions,
                } if settings.best_effort => {
                    let reason = format!(
                        "{} fully blocked magnet(s), {} collision(s), no target to drop",
                        blocked.len(),
                        collisions.len()
                    );
                    warn!("Skipping centre for {}: {}", tile.file_name(), reason);
                    skipped.push(SkippedTile {
                        number,
                        centre,
                        reason,
                    });
                    excluded.push(centre);
                }
                FieldOutcome::Stuck {
                    tile,
                    blocked,
                    collisions,
                } => {
                    return Ok(Attempt::Infeasible {
                        tile: Box::new(tile),
                        blocked,
                        collisions,
                    })
                }
            }
        }

        Ok(Attempt::Exhausted(format!(
            "no acceptable centre for tile {} after {} attempts",
            number,
            settings.max_centre_retries + 1
        )))
    }

    /// Label members and project them onto the plate.
    fn place(
        &self,
        number: usize,
        centre: SkyPosition,
        selection: TileSelection,
    ) -> PipelineResult<Tile> {
        let scale = self.config.instrument.plate_scale_arcsec_per_mm;
        let mut members = Vec::new();

        let science = selection
            .targets
            .into_iter()
            .map(|t| (MemberKind::Target, MemberRow::Target(t.record), t.is_repeat))
            .chain(
                selection
                    .standards
                    .into_iter()
                    .map(|s| (MemberKind::Standard, MemberRow::Star(s), false)),
            );
        let guides = selection
            .guides
            .into_iter()
            .map(|g| (MemberKind::Guide, MemberRow::Star(g), false));

        let mut science_count = 0;
        let mut guide_count = 0;
        for (kind, row, is_repeat) in science.chain(guides) {
            let label = match kind {
                MemberKind::Guide => {
                    guide_count += 1;
                    HexabundleLabel::guide(guide_count - 1)
                }
                _ => {
                    science_count += 1;
                    HexabundleLabel::science(science_count - 1)
                }
            }
            .ok_or_else(|| {
                PipelineError::configuration(format!(
                    "tile {} has more {} than hexabundles",
                    number,
                    kind.as_str()
                ))
            })?;

            let magnet_no_dc = row.position().to_plate(&centre, scale).ok_or_else(|| {
                PipelineError::configuration(format!(
                    "member {} of tile {} does not project onto the plate",
                    row.id(),
                    number
                ))
            })?;
            members.push(TileMember {
                label,
                kind,
                row,
                is_repeat,
                magnet_no_dc,
                magnet: self.distortion.correct(magnet_no_dc),
            });
        }

        Ok(Tile {
            number,
            centre,
            members,
        })
    }

    fn layout(&self, tile: &Tile) -> PipelineResult<PlateLayout> {
        let placements: Vec<Placement> = tile
            .members
            .iter()
            .map(|m| Placement {
                label: m.label,
                member_id: m.row.id(),
                kind: m.kind,
                position: m.magnet,
            })
            .collect();
        PlateLayout::build(&placements, &self.config.instrument)
    }
}

/// Targets to drop so that every reported clash loses a member.
///
/// A clash is a body collision, or a fully blocked magnet together with the
/// magnets covering its pickup areas. Returns `None` when some clash has no
/// target in it, or when there is nothing to drop.
fn victims(
    tile: &Tile,
    owners: &[HexabundleIndex],
    blocked: &[BlockedMagnet],
    collisions: &[BodyCollision],
    conflicts: &[ConflictedMagnet],
) -> Option<BTreeSet<TargetId>> {
    let owner = |m: &MagnetIndex| owners.get(*m).copied();
    let mut clashes: Vec<BTreeSet<HexabundleIndex>> = collisions
        .iter()
        .map(|c| [c.first, c.second].iter().filter_map(owner).collect())
        .collect();
    for b in blocked {
        let covering = conflicts
            .iter()
            .filter(|c| c.blocked == b.index)
            .map(|c| &c.blocking);
        clashes.push(std::iter::once(&b.index).chain(covering).filter_map(owner).collect());
    }

    let mut chosen = BTreeSet::new();
    for clash in &clashes {
        let (_, member) = clash
            .iter()
            .filter_map(|h| tile.members.get(*h).map(|m| (*h, m)))
            .filter(|(_, m)| m.kind == MemberKind::Target)
            .min_by_key(|(h, m)| (!m.is_repeat, m.row.priority(), Reverse(*h)))?;
        chosen.insert(member.row.id());
    }
    (!chosen.is_empty()).then_some(chosen)
}
