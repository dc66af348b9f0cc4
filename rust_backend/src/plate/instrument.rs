//! Instrument constants, passed explicitly through the plate engine.
//!
//! Every field has a default matching the Hector plate; any subset can be
//! overridden from the `[instrument]` table of the pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::geometry::Tolerance;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Usable plate radius.
    pub plate_radius_mm: f64,
    /// Sky-to-plate scale.
    pub plate_scale_arcsec_per_mm: f64,
    pub circular_magnet_radius_mm: f64,
    /// Extent of the rectangular magnet along its long (radial) axis.
    pub rectangular_magnet_length_mm: f64,
    pub rectangular_magnet_width_mm: f64,
    /// Extent of a pickup area away from its magnet.
    pub pickup_length_mm: f64,
    /// Extent of a pickup area across the approach direction.
    pub pickup_width_mm: f64,
    /// Clearance between a magnet edge and its pickup areas.
    pub pickup_gap_mm: f64,
    /// Offset applied to robot-frame coordinates.
    pub robot_offset_x_mm: f64,
    pub robot_offset_y_mm: f64,
    /// Hexabundles available for targets and standards (labels A..U).
    pub science_bundles: usize,
    /// Hexabundles available for guide stars (labels GS1..GS6).
    pub guide_bundles: usize,
    pub tolerance_mm: f64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            plate_radius_mm: 226.0,
            plate_scale_arcsec_per_mm: 16.0,
            circular_magnet_radius_mm: 10.0,
            rectangular_magnet_length_mm: 27.2,
            rectangular_magnet_width_mm: 9.0,
            pickup_length_mm: 12.0,
            pickup_width_mm: 10.0,
            pickup_gap_mm: 0.5,
            robot_offset_x_mm: 0.0,
            robot_offset_y_mm: 0.0,
            science_bundles: 21,
            guide_bundles: 6,
            tolerance_mm: crate::geometry::DEFAULT_TOLERANCE,
        }
    }
}

impl InstrumentConfig {
    pub fn tolerance(&self) -> Tolerance {
        Tolerance(self.tolerance_mm)
    }

    /// Reject dimensions that would build degenerate shapes.
    pub fn validate(&self) -> PipelineResult<()> {
        let positive = [
            ("plate_radius_mm", self.plate_radius_mm),
            ("plate_scale_arcsec_per_mm", self.plate_scale_arcsec_per_mm),
            ("circular_magnet_radius_mm", self.circular_magnet_radius_mm),
            ("rectangular_magnet_length_mm", self.rectangular_magnet_length_mm),
            ("rectangular_magnet_width_mm", self.rectangular_magnet_width_mm),
            ("pickup_length_mm", self.pickup_length_mm),
            ("pickup_width_mm", self.pickup_width_mm),
            ("tolerance_mm", self.tolerance_mm),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(PipelineError::configuration(format!(
                    "instrument.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.pickup_gap_mm < 0.0 {
            return Err(PipelineError::configuration(format!(
                "instrument.pickup_gap_mm must not be negative, got {}",
                self.pickup_gap_mm
            )));
        }
        if self.science_bundles > 21 || self.guide_bundles > 6 {
            return Err(PipelineError::configuration(
                "the plate carries at most 21 science and 6 guide hexabundles",
            ));
        }
        Ok(())
    }

    /// Plate radius expressed on the sky.
    pub fn plate_radius_deg(&self) -> f64 {
        self.plate_radius_mm * self.plate_scale_arcsec_per_mm / 3600.0
    }
}
