#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use hector_obs::catalogue::{StarRecord, TargetRecord};
use hector_obs::tiling::PipelineConfig;

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the working directory switched to `dir`.
///
/// Restores the previous directory on unwind and serializes access, since the
/// working directory is process-global and tests run in parallel.
pub fn with_current_dir<F, R>(dir: &Path, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedDir::new(dir);
    f()
}

struct ScopedDir {
    previous: std::path::PathBuf,
}

impl ScopedDir {
    fn new(dir: &Path) -> Self {
        let previous = std::env::current_dir().expect("current dir");
        std::env::set_current_dir(dir).expect("switch dir");
        Self { previous }
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}

pub fn target(id: i64, ra: f64, dec: f64, priority: i32) -> TargetRecord {
    TargetRecord {
        id,
        ra,
        dec,
        r_mag: 17.0,
        priority,
        remaining_observations: 1.0,
        n_observations_to_complete: 1.0,
        kind: 1,
    }
}

pub fn star(id: i64, ra: f64, dec: f64, r_mag: f32) -> StarRecord {
    StarRecord { id, ra, dec, r_mag }
}

/// Targets on a square grid, `step` degrees apart, starting at (ra0, dec0).
pub fn target_grid(n: usize, ra0: f64, dec0: f64, step: f64) -> Vec<TargetRecord> {
    (0..n * n)
        .map(|i| {
            target(
                i as i64 + 1,
                ra0 + (i % n) as f64 * step,
                dec0 + (i / n) as f64 * step,
                1 + (i % 3) as i32,
            )
        })
        .collect()
}

/// Default configuration with no guide or standard requirement.
pub fn targets_only_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.tiling.nsel_guides = 0;
    config.tiling.nsel_standards = 0;
    config
}
