use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::calibration::CalibrationModel;
use crate::pipeline::{CalibrationOutcome, CalibratorConfig, PassSummary, StageSummary};
use crate::tuner::Phase;
use crate::types::{Axis, PARAM_COUNT};

/// One progress line per tuning sweep.
///
/// Plain mode matches `CalibrationModel::info_string`; verbose mode prefixes
/// the phase.
pub fn progress_line(phase: Phase, model: &CalibrationModel<'_>, verbose: bool) -> String {
    if verbose {
        format!("[{:<6}] {}", phase.to_string(), model.info_string())
    } else {
        model.info_string()
    }
}

/// Per-axis correction derived from the converged range
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisCorrection {
    pub axis: Axis,
    pub min: i32,
    pub max: i32,
    /// Raw value mapped to zero
    pub offset: f64,
    /// Raw units per scaled unit
    pub scale: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub generated_at: String,
    pub params: [i32; PARAM_COUNT],
    pub axes: Vec<AxisCorrection>,
    pub mean_magnitude: f64,
    pub magnitude_std_deviation: f64,
    pub score: f64,
    pub input_count: usize,
    pub sample_count: usize,
    pub subsample_count: usize,
    pub initial: StageSummary,
    pub sample_pass: PassSummary,
    pub full_pass: PassSummary,
    pub config: CalibratorConfig,
}

impl CalibrationReport {
    pub fn new(outcome: &CalibrationOutcome, config: &CalibratorConfig) -> Self {
        let params = outcome.params();
        let result = &outcome.full_pass.result;

        let axes = Axis::ALL
            .iter()
            .map(|&axis| {
                let (min, max) = params.range(axis);
                AxisCorrection {
                    axis,
                    min,
                    max,
                    offset: params.offset(axis),
                    scale: params.half_range(axis),
                }
            })
            .collect();

        Self {
            generated_at: Utc::now().to_rfc3339(),
            params: params.values(),
            axes,
            mean_magnitude: result.mean_magnitude,
            magnitude_std_deviation: result.magnitude_std_deviation,
            score: result.score,
            input_count: outcome.input_count,
            sample_count: outcome.sample_count,
            subsample_count: outcome.subsample_count,
            initial: outcome.initial,
            sample_pass: outcome.sample_pass,
            full_pass: outcome.full_pass,
            config: *config,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
