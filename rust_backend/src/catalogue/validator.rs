//! Target catalogue validation with error and warning reporting.
//!
//! Errors make a catalogue unusable for tiling; warnings are informational.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::records::{TargetRecord, GALAXY_TYPE};

/// Validation outcome for a target catalogue.
///
/// # Examples
///
/// ```
/// use hector_obs::catalogue::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("duplicate ID 4".to_string());
/// assert!(!result.is_valid);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Counts gathered while validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_targets: usize,
    pub already_completed: usize,
    pub duplicate_ids: usize,
    pub invalid_coordinates: usize,
    pub negative_remaining: usize,
    pub reserved_types: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            ..Default::default()
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Check target rows before they enter a tiling run.
///
/// Errors: duplicate IDs, RA outside `[0, 360)`, Dec outside `[-90, 90]`,
/// negative `remaining_observations`. Warnings: reserved `type` values and
/// zero priority.
pub fn validate_targets(records: &[TargetRecord]) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.stats.total_targets = records.len();

    let mut seen = HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id) {
            result.stats.duplicate_ids += 1;
            result.add_error(format!("Duplicate target ID {}", r.id));
        }

        if !(0.0..360.0).contains(&r.ra) || !(-90.0..=90.0).contains(&r.dec) {
            result.stats.invalid_coordinates += 1;
            result.add_error(format!(
                "Target {} has invalid coordinates RA={} Dec={}",
                r.id, r.ra, r.dec
            ));
        }

        if r.remaining_observations < 0.0 {
            result.stats.negative_remaining += 1;
            result.add_error(format!(
                "Target {} has negative remaining_observations {}",
                r.id, r.remaining_observations
            ));
        } else if r.remaining_observations == 0.0 {
            result.stats.already_completed += 1;
        }

        if r.kind != GALAXY_TYPE {
            result.stats.reserved_types += 1;
            result.add_warning(format!("Target {} has reserved type {}", r.id, r.kind));
        }

        if r.priority == 0 {
            result.add_warning(format!("Target {} has zero priority", r.id));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, ra: f64, dec: f64, remaining: f32) -> TargetRecord {
        TargetRecord {
            id,
            ra,
            dec,
            r_mag: 18.0,
            priority: 3,
            remaining_observations: remaining,
            n_observations_to_complete: 1.0,
            kind: GALAXY_TYPE,
        }
    }

    #[test]
    fn test_clean_catalogue_is_valid() {
        let result = validate_targets(&[record(1, 10.0, 0.0, 1.0), record(2, 11.0, 0.5, 0.0)]);
        assert!(result.is_valid);
        assert_eq!(result.stats.total_targets, 2);
        assert_eq!(result.stats.already_completed, 1);
    }

    #[test]
    fn test_errors_are_counted() {
        let result = validate_targets(&[
            record(1, 10.0, 0.0, 1.0),
            record(1, 400.0, 0.0, 1.0),
            record(2, 10.0, -95.0, -1.0),
        ]);
        assert!(!result.is_valid);
        assert_eq!(result.stats.duplicate_ids, 1);
        assert_eq!(result.stats.invalid_coordinates, 2);
        assert_eq!(result.stats.negative_remaining, 1);
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn test_reserved_type_is_only_a_warning() {
        let mut r = record(5, 10.0, 0.0, 1.0);
        r.kind = 4;
        let result = validate_targets(&[r]);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.stats.reserved_types, 1);
    }
}
