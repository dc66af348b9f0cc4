//! Hector tiling command-line driver.
//!
//! Loads the catalogues and configuration, runs the tiling engine and writes
//! tile files, robot files and a run summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hector-tile -- \
//!   --targets targets.json --guides guides.json --standards standards.json \
//!   --config hector.toml --output tiles/
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter directives (default: info)
//!
//! # Exit status
//!
//! Non-zero when a plate cannot be configured or amended. Tiles accepted
//! before it are still written, along with the offending tile file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hector_obs::catalogue::{
    load_stars_json, load_targets_json, validate_targets, StarCatalogue, TargetCatalogue,
};
use hector_obs::output::write_run_outputs;
use hector_obs::plate::ConflictsLog;
use hector_obs::tiling::{PipelineConfig, SelectionType, Termination, TilingEngine, TilingType};

#[derive(Debug, Parser)]
#[command(name = "hector-tile", version, about = "Tile a Hector survey catalogue")]
struct Args {
    /// Target catalogue (JSON array of rows)
    #[arg(long)]
    targets: PathBuf,

    /// Guide-star catalogue (JSON array of rows)
    #[arg(long)]
    guides: PathBuf,

    /// Standard-star catalogue (JSON array of rows)
    #[arg(long)]
    standards: PathBuf,

    /// Pipeline configuration; defaults to hector.toml in the usual places
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving tile files, robot files and summary.json
    #[arg(long, default_value = "tiles")]
    output: PathBuf,

    /// Conflicts record; defaults to <output>/conflicts.txt
    #[arg(long)]
    conflicts: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured tile limit
    #[arg(long)]
    n_tiles: Option<usize>,

    /// Override the tiling type (greedy or random)
    #[arg(long)]
    tiling_type: Option<TilingType>,

    /// Override the selection type (random or priority_weighted)
    #[arg(long)]
    selection_type: Option<SelectionType>,

    /// Skip infeasible plates instead of stopping
    #[arg(long)]
    best_effort: bool,
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::from_default_location().unwrap_or_else(|e| {
            warn!("{}; using built-in defaults", e);
            PipelineConfig::default()
        }),
    };
    if let Some(seed) = args.seed {
        config.tiling.seed = seed;
    }
    if let Some(n_tiles) = args.n_tiles {
        config.tiling.n_tiles = n_tiles;
    }
    if let Some(tiling_type) = args.tiling_type {
        config.tiling.tiling_type = tiling_type;
    }
    if let Some(selection_type) = args.selection_type {
        config.tiling.selection_type = selection_type;
    }
    config.tiling.best_effort |= args.best_effort;
    config.validate().context("Invalid configuration")?;

    let rows = load_targets_json(&args.targets)
        .with_context(|| format!("Failed to load targets {}", args.targets.display()))?;
    let report = validate_targets(&rows);
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    if !report.is_valid {
        bail!(
            "Target catalogue failed validation:\n  {}",
            report.errors.join("\n  ")
        );
    }
    let catalogue = TargetCatalogue::from_records(rows)?;
    let guides = StarCatalogue::new(
        load_stars_json(&args.guides)
            .with_context(|| format!("Failed to load guides {}", args.guides.display()))?,
    );
    let standards = StarCatalogue::new(
        load_stars_json(&args.standards)
            .with_context(|| format!("Failed to load standards {}", args.standards.display()))?,
    );
    info!(
        "Loaded {} targets, {} guides, {} standards",
        catalogue.len(),
        guides.len(),
        standards.len()
    );

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let conflicts = args
        .conflicts
        .clone()
        .unwrap_or_else(|| args.output.join("conflicts.txt"));

    let instrument = config.instrument.clone();
    let engine = TilingEngine::new(config, guides, standards)
        .with_conflicts_log(ConflictsLog::new(conflicts));
    let run = engine.run(catalogue).context("Tiling failed")?;

    let written = write_run_outputs(&args.output, &run, &instrument)?;
    info!(
        "{} tiles, {}/{} targets complete, {} files written, stopped: {:?}",
        run.summary.tiles,
        run.summary.targets_completed,
        run.summary.targets_total,
        written.len(),
        run.termination
    );

    if let Termination::Infeasible {
        tile_file,
        blocked,
        collisions,
    } = &run.termination
    {
        error!(
            "{} cannot be configured: {} fully blocked magnet(s), {} collision(s)",
            tile_file,
            blocked.len(),
            collisions.len()
        );
        bail!("Tiling stopped at infeasible {}", tile_file);
    }

    Ok(())
}
