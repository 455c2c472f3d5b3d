//! Guess, tune on a subsample, tune on everything

use log::info;
use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationModel, CalibrationParams};
use crate::error::{CalResult, CalibrationError};
use crate::estimator::{guess_with, EstimatorConfig};
use crate::reader::dedup_samples;
use crate::stats::regular_sample;
use crate::tuner::{Phase, TuneOutcome, Tuner, TunerConfig};
use crate::types::RawSample;

pub const DEFAULT_SAMPLE_SIZE: usize = 300;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibratorConfig {
    /// Target size of the subsample used by the fast pass
    pub sample_size: usize,
    /// Drop repeated readings before fitting
    pub unique: bool,
    pub estimator: EstimatorConfig,
    pub tuner: TunerConfig,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            unique: false,
            estimator: EstimatorConfig::default(),
            tuner: TunerConfig::default(),
        }
    }
}

/// Figures for one model, detached from its sample set
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub params: CalibrationParams,
    pub mean_magnitude: f64,
    pub magnitude_std_deviation: f64,
    pub score: f64,
}

impl StageSummary {
    pub fn from_model(model: &CalibrationModel<'_>) -> Self {
        Self {
            params: *model.params(),
            mean_magnitude: model.mean_magnitude(),
            magnitude_std_deviation: model.magnitude_std_deviation(),
            score: model.score(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PassSummary {
    pub phase: Phase,
    pub sweeps: usize,
    pub converged: bool,
    pub result: StageSummary,
}

impl PassSummary {
    fn from_outcome(outcome: &TuneOutcome<'_>) -> Self {
        Self {
            phase: outcome.phase,
            sweeps: outcome.sweeps,
            converged: outcome.converged,
            result: StageSummary::from_model(&outcome.model),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOutcome {
    /// Readings supplied by the caller
    pub input_count: usize,
    /// Readings fitted after optional de-duplication
    pub sample_count: usize,
    pub subsample_count: usize,
    pub initial: StageSummary,
    pub sample_pass: PassSummary,
    pub full_pass: PassSummary,
}

impl CalibrationOutcome {
    /// Converged parameters of the full pass
    pub fn params(&self) -> CalibrationParams {
        self.full_pass.result.params
    }
}

pub struct Calibrator {
    config: CalibratorConfig,
}

impl Calibrator {
    pub fn new(config: CalibratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Fit the six parameters to `samples`.
    ///
    /// `on_progress` receives every model reported by both tuning passes.
    pub fn run<F>(&self, samples: &[RawSample], mut on_progress: F) -> CalResult<CalibrationOutcome>
    where
        F: FnMut(Phase, &CalibrationModel<'_>),
    {
        if samples.is_empty() {
            return Err(CalibrationError::EmptySampleSet);
        }

        let deduped;
        let readings: &[RawSample] = if self.config.unique {
            deduped = dedup_samples(samples);
            info!("{} unique readings of {}", deduped.len(), samples.len());
            &deduped
        } else {
            samples
        };

        let subsample = regular_sample(readings, self.config.sample_size);
        let initial = guess_with(readings, &self.config.estimator)?;
        info!("initial guess {} score {:.6}", initial, initial.score());

        let tuner = Tuner::new(self.config.tuner);

        let sampled = tuner.tune(&initial, &subsample, Phase::Sample, &mut on_progress)?;
        info!(
            "sample pass over {} readings: {} after {} sweeps",
            subsample.len(),
            sampled.model,
            sampled.sweeps
        );

        let calibrated = tuner.tune(&sampled.model, readings, Phase::Full, &mut on_progress)?;
        info!(
            "full pass over {} readings: {} after {} sweeps, score {:.6}",
            readings.len(),
            calibrated.model,
            calibrated.sweeps,
            calibrated.model.score()
        );

        Ok(CalibrationOutcome {
            input_count: samples.len(),
            sample_count: readings.len(),
            subsample_count: subsample.len(),
            initial: StageSummary::from_model(&initial),
            sample_pass: PassSummary::from_outcome(&sampled),
            full_pass: PassSummary::from_outcome(&calibrated),
        })
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CalibratorConfig::default())
    }
}
