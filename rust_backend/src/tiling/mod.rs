//! Tiling engine.
//!
//! # Components
//!
//! - [`config`]: run parameters loaded from TOML
//! - [`selection`]: field-of-view filter and the per-tile member draw
//! - [`centre`]: tile centre strategies
//! - [`engine`]: the tiling loop and its bookkeeping
//! - [`summary`]: completeness statistics

pub mod centre;
pub mod config;
pub mod engine;
pub mod selection;
pub mod summary;

pub use centre::{chooser_for, CentreChooser, CentreSearch, GreedyChooser, RandomChooser};
pub use config::{PipelineConfig, SelectionType, TilingSettings, TilingType};
pub use engine::{
    tile_file_name, AcceptedTile, MemberRow, SkippedTile, Termination, Tile, TileMember,
    TilingEngine, TilingRun,
};
pub use selection::{
    assemble_tile, select_stars, select_targets, FieldOfView, SelectedTarget, TileSelection,
};
pub use summary::{PriorityCompletion, TilingSummary};
