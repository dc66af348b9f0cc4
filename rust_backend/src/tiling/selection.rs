//! Per-tile assembly: which targets, guides and standards a field receives.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use log::debug;
use qtty::Degrees;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::config::{SelectionType, TilingSettings};
use crate::catalogue::{StarCatalogue, StarRecord, TargetCatalogue, TargetId, TargetRecord};
use crate::error::{CandidateKind, PipelineError, PipelineResult};
use crate::sky::SkyPosition;

/// Annular field of view around a tile centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    pub centre: SkyPosition,
    pub inner: Degrees,
    pub outer: Degrees,
}

impl FieldOfView {
    pub fn new(centre: SkyPosition, settings: &TilingSettings) -> Self {
        Self {
            centre,
            inner: Degrees::new(settings.fov_inner_radius),
            outer: Degrees::new(settings.fov_outer_radius),
        }
    }

    /// Inclusive annulus test.
    pub fn contains(&self, position: &SkyPosition) -> bool {
        let d = self.centre.separation(position);
        d >= self.inner && d <= self.outer
    }
}

/// A target drawn into a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTarget {
    pub record: TargetRecord,
    /// Already completed before this tile; fills a spare fibre.
    pub is_repeat: bool,
}

/// Members chosen for one field, before plate placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileSelection {
    pub targets: Vec<SelectedTarget>,
    pub guides: Vec<StarRecord>,
    pub standards: Vec<StarRecord>,
}

impl TileSelection {
    pub fn new_targets(&self) -> usize {
        self.targets.iter().filter(|t| !t.is_repeat).count()
    }

    pub fn repeats(&self) -> usize {
        self.targets.iter().filter(|t| t.is_repeat).count()
    }
}

fn far_enough(position: &SkyPosition, taken: &[SkyPosition], proximity: f64) -> bool {
    taken
        .iter()
        .all(|p| p.separation_arcsec(position).value() >= proximity)
}

/// Order candidates for the proximity draw.
fn order_candidates(
    candidates: &mut [&TargetRecord],
    fov: &FieldOfView,
    selection_type: SelectionType,
    rng: &mut StdRng,
) {
    match selection_type {
        SelectionType::PriorityWeighted => candidates.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| {
                    let da = fov.centre.separation(&a.position()).value();
                    let db = fov.centre.separation(&b.position()).value();
                    da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.id.cmp(&b.id))
        }),
        SelectionType::Random => candidates.shuffle(rng),
    }
}

/// Greedily accept candidates that keep `proximity` from everything taken.
fn draw<'a>(
    candidates: &[&'a TargetRecord],
    taken: &mut Vec<SkyPosition>,
    limit: usize,
    proximity: f64,
) -> Vec<&'a TargetRecord> {
    let mut chosen = Vec::new();
    for record in candidates {
        if chosen.len() >= limit {
            break;
        }
        let position = record.position();
        if far_enough(&position, taken, proximity) {
            taken.push(position);
            chosen.push(*record);
        }
    }
    chosen
}

/// Draw at most `limit` targets for the field.
///
/// Uncompleted targets come first. When `fill_spares_with_repeats` is set,
/// fibres left over are filled with completed targets under the same rules.
/// Every accepted target keeps `proximity` from every other one. Targets in
/// `rejected` are never drawn.
pub fn select_targets(
    catalogue: &TargetCatalogue,
    fov: &FieldOfView,
    settings: &TilingSettings,
    limit: usize,
    rejected: &BTreeSet<TargetId>,
    rng: &mut StdRng,
) -> Vec<SelectedTarget> {
    let mut fresh: Vec<&TargetRecord> = catalogue
        .uncompleted()
        .map(|t| &t.record)
        .filter(|r| !rejected.contains(&r.id) && fov.contains(&r.position()))
        .collect();
    order_candidates(&mut fresh, fov, settings.selection_type, rng);

    let mut taken = Vec::new();
    let mut selected: Vec<SelectedTarget> = draw(&fresh, &mut taken, limit, settings.proximity)
        .into_iter()
        .map(|record| SelectedTarget {
            record: record.clone(),
            is_repeat: false,
        })
        .collect();

    if settings.fill_spares_with_repeats && selected.len() < limit {
        let mut repeats: Vec<&TargetRecord> = catalogue
            .iter()
            .filter(|t| t.completed)
            .map(|t| &t.record)
            .filter(|r| !rejected.contains(&r.id) && fov.contains(&r.position()))
            .collect();
        order_candidates(&mut repeats, fov, settings.selection_type, rng);
        let spare = limit - selected.len();
        selected.extend(
            draw(&repeats, &mut taken, spare, settings.proximity)
                .into_iter()
                .map(|record| SelectedTarget {
                    record: record.clone(),
                    is_repeat: true,
                }),
        );
    }

    debug!(
        "field at ({:.4}, {:.4}): {} candidates, {} selected",
        fov.centre.ra.value(),
        fov.centre.dec.value(),
        fresh.len(),
        selected.len()
    );
    selected
}

/// Draw exactly `count` stars, brightest first, keeping `proximity` from
/// every position already on the tile.
///
/// # Returns
/// * `Err(PipelineError::InsufficientCandidates)` if fewer than `count`
///   stars qualify
pub fn select_stars(
    stars: &StarCatalogue,
    fov: &FieldOfView,
    taken: &mut Vec<SkyPosition>,
    count: usize,
    proximity: f64,
    kind: CandidateKind,
) -> PipelineResult<Vec<StarRecord>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let mut candidates: Vec<&StarRecord> = stars
        .iter()
        .filter(|s| fov.contains(&s.position()))
        .collect();
    candidates.sort_by(|a, b| {
        a.r_mag
            .partial_cmp(&b.r_mag)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut chosen = Vec::with_capacity(count);
    for star in candidates {
        if chosen.len() == count {
            break;
        }
        let position = star.position();
        if far_enough(&position, taken, proximity) {
            taken.push(position);
            chosen.push(star.clone());
        }
    }

    if chosen.len() < count {
        return Err(PipelineError::insufficient(kind, chosen.len(), count));
    }
    Ok(chosen)
}

/// Assemble the members of one field.
///
/// `target_limit` is the per-tile target count, already reduced by any
/// remaining run-wide selection cap. `rejected` holds targets dropped from
/// earlier layouts of the same field.
#[allow(clippy::too_many_arguments)]
pub fn assemble_tile(
    catalogue: &TargetCatalogue,
    guides: &StarCatalogue,
    standards: &StarCatalogue,
    fov: &FieldOfView,
    settings: &TilingSettings,
    target_limit: usize,
    rejected: &BTreeSet<TargetId>,
    rng: &mut StdRng,
) -> PipelineResult<TileSelection> {
    let targets = select_targets(catalogue, fov, settings, target_limit, rejected, rng);
    let fresh = targets.iter().filter(|t| !t.is_repeat).count();
    if fresh == 0 {
        return Err(PipelineError::insufficient(CandidateKind::Targets, 0, 1));
    }

    let mut taken: Vec<SkyPosition> = targets.iter().map(|t| t.record.position()).collect();
    let standards = select_stars(
        standards,
        fov,
        &mut taken,
        settings.nsel_standards,
        settings.proximity,
        CandidateKind::Standards,
    )?;
    let guides = select_stars(
        guides,
        fov,
        &mut taken,
        settings.nsel_guides,
        settings.proximity,
        CandidateKind::Guides,
    )?;

    Ok(TileSelection {
        targets,
        guides,
        standards,
    })
}
