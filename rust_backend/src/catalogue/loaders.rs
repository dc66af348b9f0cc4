//! Catalogue loading from JSON and input fingerprints.
//!
//! Catalogues arrive as JSON arrays of rows using the survey column names
//! (`ID`, `RA`, `Dec`, ...). Deserialization errors carry the JSON path of
//! the offending value.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use super::records::{StarRecord, TargetCatalogue, TargetRecord};
use crate::error::{ErrorContext, PipelineError, PipelineResult};

fn parse_rows<T: DeserializeOwned>(json: &str, what: &str) -> PipelineResult<Vec<T>> {
    let de = &mut serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(de).map_err(|e| PipelineError::Catalogue {
        message: format!("failed to parse {} at '{}': {}", what, e.path(), e.inner()),
        context: ErrorContext::new("parse_catalogue").with_details(what.to_string()),
    })
}

/// Parse target rows from a JSON string.
pub fn parse_targets_json_str(json: &str) -> PipelineResult<Vec<TargetRecord>> {
    parse_rows(json, "targets")
}

/// Parse guide or standard rows from a JSON string.
pub fn parse_stars_json_str(json: &str) -> PipelineResult<Vec<StarRecord>> {
    parse_rows(json, "stars")
}

/// Load target rows from a JSON file.
pub fn load_targets_json<P: AsRef<Path>>(path: P) -> PipelineResult<Vec<TargetRecord>> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_targets_json_str(&content)
}

/// Load guide or standard rows from a JSON file.
pub fn load_stars_json<P: AsRef<Path>>(path: P) -> PipelineResult<Vec<StarRecord>> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_stars_json_str(&content)
}

/// SHA-256 of the catalogue's canonical JSON (rows in ID order).
///
/// Written into tile headers so a tile can be traced back to its input.
pub fn catalogue_fingerprint(catalogue: &TargetCatalogue) -> PipelineResult<String> {
    let rows: Vec<&TargetRecord> = catalogue.records().collect();
    let canonical = serde_json::to_string(&rows)
        .map_err(|e| PipelineError::catalogue(format!("failed to serialise catalogue: {}", e)))?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
