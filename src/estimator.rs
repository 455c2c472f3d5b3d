//! Percentile bootstrap for the first calibration guess

use log::debug;
use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationModel, CalibrationParams};
use crate::error::CalResult;
use crate::stats::{percentile_to_value_with, RankRounding};
use crate::types::{Axis, RawSample, PARAM_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub low_percentile: f64,
    pub high_percentile: f64,
    pub rounding: RankRounding,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            low_percentile: 1.0,
            high_percentile: 99.0,
            rounding: RankRounding::Floor,
        }
    }
}

/// Initial guess from the 1st and 99th percentile of every axis.
///
/// The returned model is bound to `readings`.
pub fn guess(readings: &[RawSample]) -> CalResult<CalibrationModel<'_>> {
    guess_with(readings, &EstimatorConfig::default())
}

pub fn guess_with<'a>(readings: &'a [RawSample], config: &EstimatorConfig) -> CalResult<CalibrationModel<'a>> {
    let mut values = [0i32; PARAM_COUNT];

    for axis in Axis::ALL {
        let axis_values: Vec<i32> = readings.iter().map(|r| r[axis]).collect();
        let bounds = percentile_to_value_with(
            &axis_values,
            &[config.low_percentile, config.high_percentile],
            config.rounding,
        )?;
        let i = 2 * axis.index();
        values[i] = bounds[0];
        values[i + 1] = bounds[1];
        debug!("guess {} axis: min {} max {}", axis, bounds[0], bounds[1]);
    }

    CalibrationModel::new(CalibrationParams::new(values), readings)
}
