//! Tile centre choice.
//!
//! Candidate centres are the positions of uncompleted targets inside the
//! survey footprint. With a non-zero inner radius a target never falls in a
//! field centred on itself, so each target also contributes four centres
//! offset north, east, south and west to the middle of the annulus. A
//! centre's score is the number of uncompleted targets in
//! its field, or their summed priority under `priority_weighted` selection.
//! Ties go to the lowest RA, then the lowest Dec.

use std::cmp::Ordering;

use log::debug;
use qtty::{Degree, Degrees, Radians};
use rand::rngs::StdRng;
use rand::Rng;

use super::config::{SelectionType, TilingSettings, TilingType};
use super::selection::FieldOfView;
use crate::catalogue::TargetCatalogue;
use crate::sky::{Footprint, SkyPosition};

/// Share of the best score a centre needs to enter the random draw.
const RANDOM_SCORE_FRACTION: f64 = 0.9;

/// Bearings of the annulus offsets, degrees north through east.
const OFFSET_BEARINGS: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Everything a chooser needs to score centres for the next tile.
#[derive(Debug, Clone)]
pub struct CentreSearch<'a> {
    pub footprint: &'a Footprint,
    pub settings: &'a TilingSettings,
    /// Centres already rejected for this tile.
    pub excluded: &'a [SkyPosition],
    targets: Vec<(SkyPosition, f64)>,
}

impl<'a> CentreSearch<'a> {
    pub fn new(
        catalogue: &TargetCatalogue,
        footprint: &'a Footprint,
        settings: &'a TilingSettings,
        excluded: &'a [SkyPosition],
    ) -> Self {
        let targets = catalogue
            .uncompleted()
            .map(|t| {
                let weight = match settings.selection_type {
                    SelectionType::Random => 1.0,
                    SelectionType::PriorityWeighted => f64::from(t.record.priority.max(0)),
                };
                (t.position(), weight)
            })
            .collect();
        Self {
            footprint,
            settings,
            excluded,
            targets,
        }
    }

    /// Score of a field centred on `centre`.
    pub fn score(&self, centre: SkyPosition) -> f64 {
        let fov = FieldOfView::new(centre, self.settings);
        self.targets
            .iter()
            .filter(|(p, _)| fov.contains(p))
            .map(|(_, w)| w)
            .sum()
    }

    fn admissible(&self, centre: &SkyPosition) -> bool {
        self.footprint.contains(centre) && !self.excluded.contains(centre)
    }

    /// Admissible candidate centres with their scores, in catalogue order.
    pub fn candidates(&self) -> Vec<(SkyPosition, f64)> {
        let inner = self.settings.fov_inner_radius;
        let ring = Degrees::new((inner + self.settings.fov_outer_radius) / 2.0);
        self.targets
            .iter()
            .flat_map(|(p, _)| {
                let offsets = OFFSET_BEARINGS
                    .iter()
                    .filter(move |_| inner > 0.0)
                    .map(move |b| p.offset(Degrees::new(*b), ring));
                std::iter::once(*p).chain(offsets)
            })
            .filter(|p| self.admissible(p))
            .map(|p| (p, self.score(p)))
            .collect()
    }

    /// Unit-vector mean of the targets in the field around `centre`.
    fn centroid(&self, centre: SkyPosition) -> Option<SkyPosition> {
        let fov = FieldOfView::new(centre, self.settings);
        let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
        for (p, _) in self.targets.iter().filter(|(p, _)| fov.contains(p)) {
            let (sin_dec, cos_dec) = p.dec.sin_cos();
            let (sin_ra, cos_ra) = p.ra.sin_cos();
            x += cos_dec * cos_ra;
            y += cos_dec * sin_ra;
            z += sin_dec;
        }
        let norm = (x * x + y * y + z * z).sqrt();
        if norm == 0.0 {
            return None;
        }
        let ra: Degrees = Radians::new(y.atan2(x)).to::<Degree>().wrap_pos();
        let dec: Degrees = Radians::new((z / norm).clamp(-1.0, 1.0).asin()).to::<Degree>();
        Some(SkyPosition { ra, dec })
    }
}

/// Higher score wins; ties go to lower RA, then lower Dec.
fn better(a: &(SkyPosition, f64), b: &(SkyPosition, f64)) -> Ordering {
    a.1.partial_cmp(&b.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.0.ra
                .value()
                .partial_cmp(&a.0.ra.value())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| {
            b.0.dec
                .value()
                .partial_cmp(&a.0.dec.value())
                .unwrap_or(Ordering::Equal)
        })
}

/// Strategy for picking the next tile centre.
pub trait CentreChooser {
    /// Returns `None` when no admissible centre remains.
    fn choose(&self, search: &CentreSearch<'_>, rng: &mut StdRng) -> Option<SkyPosition>;
}

/// Best-scoring candidate, then one centroid step kept only if it scores
/// strictly higher.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyChooser;

impl CentreChooser for GreedyChooser {
    fn choose(&self, search: &CentreSearch<'_>, _rng: &mut StdRng) -> Option<SkyPosition> {
        let best = search.candidates().into_iter().max_by(better)?;

        if let Some(refined) = search.centroid(best.0) {
            if search.admissible(&refined) {
                let score = search.score(refined);
                if score > best.1 {
                    debug!(
                        "centroid ({:.4}, {:.4}) improves score {} -> {}",
                        refined.ra.value(),
                        refined.dec.value(),
                        best.1,
                        score
                    );
                    return Some(refined);
                }
            }
        }
        Some(best.0)
    }
}

/// Uniform draw among candidates scoring at least 90% of the best.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChooser;

impl CentreChooser for RandomChooser {
    fn choose(&self, search: &CentreSearch<'_>, rng: &mut StdRng) -> Option<SkyPosition> {
        let candidates = search.candidates();
        let max = candidates
            .iter()
            .map(|(_, s)| *s)
            .fold(f64::NEG_INFINITY, f64::max);
        let dense: Vec<SkyPosition> = candidates
            .iter()
            .filter(|(_, s)| *s >= max * RANDOM_SCORE_FRACTION)
            .map(|(p, _)| *p)
            .collect();
        if dense.is_empty() {
            return None;
        }
        Some(dense[rng.random_range(0..dense.len())])
    }
}

/// Chooser for the configured tiling type.
pub fn chooser_for(tiling_type: TilingType) -> Box<dyn CentreChooser> {
    match tiling_type {
        TilingType::Greedy => Box::new(GreedyChooser),
        TilingType::Random => Box::new(RandomChooser),
    }
}
