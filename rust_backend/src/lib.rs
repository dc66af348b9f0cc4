//! Hector observations pipeline core.
//!
//! Turns a galaxy survey catalogue into a sequence of telescope pointings
//! (tiles) and checks, for each tile, that the robot can place and collect
//! every hexabundle magnet on the plate.
//!
//! # Modules
//!
//! - [`geometry`]: planar shapes, intersections and overlap predicates
//! - [`sky`]: angular separation and projection onto the plate
//! - [`catalogue`]: target and star catalogues, loading and validation
//! - [`plate`]: magnets, pickup areas, conflict detection and robot rows
//! - [`tiling`]: centre choice, field assembly and the tiling loop
//! - [`output`]: tile files, robot files and the run summary
//! - [`error`]: the pipeline error type
//!
//! # Example
//!
//! ```
//! use hector_obs::catalogue::{StarCatalogue, TargetCatalogue, TargetRecord};
//! use hector_obs::tiling::{PipelineConfig, Termination, TilingEngine};
//!
//! let mut config = PipelineConfig::default();
//! config.tiling.nsel_guides = 0;
//! config.tiling.nsel_standards = 0;
//!
//! let catalogue = TargetCatalogue::from_records(vec![TargetRecord {
//!     id: 1,
//!     ra: 150.0,
//!     dec: 2.0,
//!     r_mag: 17.5,
//!     priority: 3,
//!     remaining_observations: 1.0,
//!     n_observations_to_complete: 1.0,
//!     kind: 1,
//! }])
//! .unwrap();
//!
//! let engine = TilingEngine::new(config, StarCatalogue::default(), StarCatalogue::default());
//! let run = engine.run(catalogue).unwrap();
//! assert_eq!(run.tiles.len(), 1);
//! assert_eq!(run.termination, Termination::AllCompleted);
//! ```

pub mod catalogue;
pub mod error;
pub mod geometry;
pub mod output;
pub mod plate;
pub mod sky;
pub mod tiling;

pub use error::{PipelineError, PipelineResult};
