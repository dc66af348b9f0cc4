//! Target, guide-star and standard-star catalogues.
//!
//! # Components
//!
//! - [`records`]: row schemas and the mutable [`TargetCatalogue`] the tiling engine owns
//! - [`loaders`]: JSON loading and catalogue fingerprints
//! - [`validator`]: data-quality checks run before tiling

pub mod loaders;
pub mod records;
pub mod validator;

pub use loaders::{
    catalogue_fingerprint, load_stars_json, load_targets_json, parse_stars_json_str,
    parse_targets_json_str,
};
pub use records::{
    StarCatalogue, StarRecord, TargetCatalogue, TargetId, TargetRecord, TargetState,
    GALAXY_TYPE,
};
pub use validator::{validate_targets, ValidationResult, ValidationStats};
