//! Pipeline configuration file support.
//!
//! A run is configured from a TOML file with three tables: `[tiling]` for the
//! survey parameters (keys keep the survey's historical names such as
//! `N_targets_per_Hector_field`), `[instrument]` for plate dimensions and
//! `[footprint]` for the RA/Dec box tile centres must fall in.
//!
//! ```toml
//! [tiling]
//! proximity = 360.0
//! N_targets_per_Hector_field = 19
//! Nsel_guides = 6
//! Nsel_standards = 2
//! Hector_FOV_outer_radius = 1.0
//! tiling_type = "greedy"
//! selection_type = "priority_weighted"
//! seed = 42
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, PipelineError, PipelineResult};
use crate::plate::InstrumentConfig;
use crate::sky::Footprint;

/// How tile centres are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilingType {
    /// Best-scoring centre with a centroid refinement step.
    #[default]
    Greedy,
    /// Uniform draw among the densest candidate centres.
    Random,
}

impl FromStr for TilingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(TilingType::Greedy),
            "random" => Ok(TilingType::Random),
            other => Err(format!(
                "Unknown tiling_type: {}. Use 'greedy' or 'random'",
                other
            )),
        }
    }
}

impl fmt::Display for TilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilingType::Greedy => f.write_str("greedy"),
            TilingType::Random => f.write_str("random"),
        }
    }
}

/// How targets inside a field are ordered before the proximity filter, and
/// how centres are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    /// Seeded shuffle; centres scored by target count.
    Random,
    /// Priority first, then distance to centre; centres scored by priority sum.
    #[default]
    PriorityWeighted,
}

impl FromStr for SelectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(SelectionType::Random),
            "priority_weighted" | "priority" => Ok(SelectionType::PriorityWeighted),
            other => Err(format!(
                "Unknown selection_type: {}. Use 'random' or 'priority_weighted'",
                other
            )),
        }
    }
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionType::Random => f.write_str("random"),
            SelectionType::PriorityWeighted => f.write_str("priority_weighted"),
        }
    }
}

/// Survey tiling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilingSettings {
    /// Minimum separation between fibres on one tile, arcseconds.
    #[serde(default = "default_proximity")]
    pub proximity: f64,
    /// Cap on new target selections over the whole run.
    #[serde(rename = "Nsel", default)]
    pub nsel: Option<usize>,
    #[serde(rename = "N_targets_per_Hector_field", default = "default_targets_per_field")]
    pub n_targets_per_field: usize,
    #[serde(rename = "Nsel_guides", default = "default_guides")]
    pub nsel_guides: usize,
    #[serde(rename = "Nsel_standards", default = "default_standards")]
    pub nsel_standards: usize,
    /// Outer FoV radius, degrees.
    #[serde(rename = "Hector_FOV_outer_radius", default = "default_outer_radius")]
    pub fov_outer_radius: f64,
    /// Inner FoV radius, degrees.
    #[serde(rename = "Hector_FOV_inner_radius", default)]
    pub fov_inner_radius: f64,
    #[serde(default)]
    pub fill_spares_with_repeats: bool,
    #[serde(default)]
    pub tiling_type: TilingType,
    #[serde(default)]
    pub selection_type: SelectionType,
    /// Maximum number of tiles (`N_tiles`).
    #[serde(rename = "N_tiles", default = "default_n_tiles")]
    pub n_tiles: usize,
    #[serde(default)]
    pub seed: u64,
    /// Re-centring attempts per tile before the run gives up.
    #[serde(default = "default_max_centre_retries")]
    pub max_centre_retries: usize,
    /// Skip plates that cannot be amended instead of ending the run there.
    #[serde(default)]
    pub best_effort: bool,
}

fn default_proximity() -> f64 {
    360.0
}

fn default_targets_per_field() -> usize {
    19
}

fn default_guides() -> usize {
    6
}

fn default_standards() -> usize {
    2
}

fn default_outer_radius() -> f64 {
    1.0
}

fn default_n_tiles() -> usize {
    100
}

fn default_max_centre_retries() -> usize {
    10
}

impl Default for TilingSettings {
    fn default() -> Self {
        Self {
            proximity: default_proximity(),
            nsel: None,
            n_targets_per_field: default_targets_per_field(),
            nsel_guides: default_guides(),
            nsel_standards: default_standards(),
            fov_outer_radius: default_outer_radius(),
            fov_inner_radius: 0.0,
            fill_spares_with_repeats: false,
            tiling_type: TilingType::default(),
            selection_type: SelectionType::default(),
            n_tiles: default_n_tiles(),
            seed: 0,
            max_centre_retries: default_max_centre_retries(),
            best_effort: false,
        }
    }
}

/// Complete configuration of a tiling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub tiling: TilingSettings,
    #[serde(default)]
    pub instrument: InstrumentConfig,
    #[serde(default)]
    pub footprint: Footprint,
}

impl PipelineConfig {
    /// Load the configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(PipelineConfig)` if the file was read and parsed
    /// * `Err(PipelineError::Io)` if the file cannot be read
    /// * `Err(PipelineError::Configuration)` if it cannot be parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content).map_err(|e| {
            e.with_operation(format!("load_config {}", path.as_ref().display()))
        })
    }

    /// Parse the configuration from TOML text.
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        toml::from_str(content).map_err(|e| PipelineError::Configuration {
            message: format!("Failed to parse config file: {}", e),
            context: ErrorContext::new("parse_config"),
        })
    }

    /// Load the configuration from the default location.
    ///
    /// Searches for `hector.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> PipelineResult<Self> {
        let search_paths = [
            PathBuf::from("hector.toml"),
            PathBuf::from("rust_backend/hector.toml"),
            PathBuf::from("../hector.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(PipelineError::configuration(
            "No hector.toml found in standard locations",
        ))
    }

    /// Check parameter consistency before a run.
    pub fn validate(&self) -> PipelineResult<()> {
        self.instrument.validate()?;
        let t = &self.tiling;

        if t.proximity.is_nan() || t.proximity < 0.0 {
            return Err(PipelineError::configuration(format!(
                "tiling.proximity must not be negative, got {}",
                t.proximity
            )));
        }
        if t.n_targets_per_field == 0 {
            return Err(PipelineError::configuration(
                "tiling.N_targets_per_Hector_field must be at least 1",
            ));
        }
        if t.n_targets_per_field + t.nsel_standards > self.instrument.science_bundles {
            return Err(PipelineError::configuration(format!(
                "{} targets and {} standards exceed the {} science hexabundles",
                t.n_targets_per_field, t.nsel_standards, self.instrument.science_bundles
            )));
        }
        if t.nsel_guides > self.instrument.guide_bundles {
            return Err(PipelineError::configuration(format!(
                "{} guides exceed the {} guide hexabundles",
                t.nsel_guides, self.instrument.guide_bundles
            )));
        }
        if t.fov_inner_radius.is_nan() || t.fov_inner_radius < 0.0 {
            return Err(PipelineError::configuration(
                "tiling.Hector_FOV_inner_radius must not be negative",
            ));
        }
        if t.fov_outer_radius.is_nan() || t.fov_outer_radius <= t.fov_inner_radius {
            return Err(PipelineError::configuration(format!(
                "tiling.Hector_FOV_outer_radius ({}) must exceed the inner radius ({})",
                t.fov_outer_radius, t.fov_inner_radius
            )));
        }
        if t.fov_outer_radius > self.instrument.plate_radius_deg() {
            return Err(PipelineError::configuration(format!(
                "FoV radius {} deg does not fit the {:.4} deg plate",
                t.fov_outer_radius,
                self.instrument.plate_radius_deg()
            )));
        }
        let fp = &self.footprint;
        if fp.ra_min > fp.ra_max || fp.dec_min > fp.dec_max {
            return Err(PipelineError::configuration("footprint bounds are inverted"));
        }
        Ok(())
    }
}
