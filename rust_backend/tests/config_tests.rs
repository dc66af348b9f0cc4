mod support;

use std::fs;

use hector_obs::tiling::{PipelineConfig, SelectionType, TilingType};
use hector_obs::PipelineError;

#[test]
fn test_from_file_reads_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.toml");
    fs::write(
        &path,
        r#"
[tiling]
N_targets_per_Hector_field = 12
tiling_type = "random"
selection_type = "random"
best_effort = true

[instrument]
pickup_gap_mm = 1.0

[footprint]
ra_min = 120.0
ra_max = 240.0
"#,
    )
    .unwrap();

    let config = PipelineConfig::from_file(&path).unwrap();
    assert_eq!(config.tiling.n_targets_per_field, 12);
    assert_eq!(config.tiling.tiling_type, TilingType::Random);
    assert_eq!(config.tiling.selection_type, SelectionType::Random);
    assert!(config.tiling.best_effort);
    assert_eq!(config.instrument.pickup_gap_mm, 1.0);
    assert_eq!(config.footprint.ra_min, 120.0);
    assert_eq!(config.footprint.dec_min, -90.0);
    config.validate().unwrap();
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PipelineConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[tiling\nproximity = ").unwrap();
    let err = PipelineConfig::from_file(&path).unwrap_err();
    let operation = err.context().and_then(|c| c.operation.clone()).unwrap();
    assert!(operation.contains("broken.toml"));
}

#[test]
fn test_default_location_lookup() {
    let dir = tempfile::tempdir().unwrap();
    support::with_current_dir(dir.path(), || {
        assert!(PipelineConfig::from_default_location().is_err());
    });

    fs::write(dir.path().join("hector.toml"), "[tiling]\nseed = 99\n").unwrap();
    let config =
        support::with_current_dir(dir.path(), PipelineConfig::from_default_location).unwrap();
    assert_eq!(config.tiling.seed, 99);
}
