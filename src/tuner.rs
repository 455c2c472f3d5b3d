//! Coordinate-ascent refinement of a calibration model
//!
//! Each sweep walks the six parameters in order and, for each one, keeps
//! stepping in one direction while the score strictly improves. Sweeps repeat
//! until one leaves every parameter where it was.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::calibration::{CalibrationModel, Direction, ParamId};
use crate::error::CalResult;
use crate::types::RawSample;

/// Which sample set a tuning pass runs against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Regular subsample, cheap
    Sample,
    /// Every reading
    Full,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Sample => write!(f, "sample"),
            Phase::Full => write!(f, "full"),
        }
    }
}

/// Safety caps on the search. `None` means run to the fixed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunerConfig {
    /// Upper bound on sweeps per pass
    pub max_sweeps: Option<usize>,
    /// Upper bound on consecutive steps along one parameter and direction
    pub max_steps: Option<usize>,
}

impl TunerConfig {
    pub fn unbounded() -> Self {
        Self {
            max_sweeps: None,
            max_steps: None,
        }
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            max_sweeps: Some(1_000),
            max_steps: Some(100_000),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TuneOutcome<'a> {
    pub model: CalibrationModel<'a>,
    pub phase: Phase,
    pub sweeps: usize,
    /// False when `max_sweeps` stopped the pass before a fixed point
    pub converged: bool,
}

pub struct Tuner {
    config: TunerConfig,
}

impl Tuner {
    pub fn new(config: TunerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// Rebind `start` to `readings` and climb to a fixed point.
    ///
    /// `on_sweep` sees the starting model and then the model after every sweep.
    pub fn tune<'a, F>(
        &self,
        start: &CalibrationModel<'_>,
        readings: &'a [RawSample],
        phase: Phase,
        mut on_sweep: F,
    ) -> CalResult<TuneOutcome<'a>>
    where
        F: FnMut(Phase, &CalibrationModel<'a>),
    {
        let mut current = start.with_readings(readings)?;
        on_sweep(phase, &current);
        debug!(
            "[{}] tuning {} against {} readings, score {:.6}",
            phase,
            current,
            readings.len(),
            current.score()
        );

        let mut sweeps = 0usize;
        loop {
            let last = *current.params();

            for param in ParamId::ALL {
                let improved = match self.try_direction(&current, param, Direction::Up)? {
                    Some(model) => Some(model),
                    None => self.try_direction(&current, param, Direction::Down)?,
                };
                if let Some(model) = improved {
                    current = model;
                }
            }

            sweeps += 1;
            on_sweep(phase, &current);
            debug!("[{}] sweep {}: {} score {:.6}", phase, sweeps, current, current.score());

            if *current.params() == last {
                return Ok(TuneOutcome {
                    model: current,
                    phase,
                    sweeps,
                    converged: true,
                });
            }

            if let Some(max) = self.config.max_sweeps {
                if sweeps >= max {
                    warn!("[{}] stopped after {} sweeps without reaching a fixed point", phase, sweeps);
                    return Ok(TuneOutcome {
                        model: current,
                        phase,
                        sweeps,
                        converged: false,
                    });
                }
            }
        }
    }

    /// Step `param` in `direction` while the score strictly improves.
    ///
    /// Returns the last improving model, or `None` when the first step does
    /// not improve. A step that collapses an axis range counts as no
    /// improvement.
    pub fn try_direction<'a>(
        &self,
        model: &CalibrationModel<'a>,
        param: ParamId,
        direction: Direction,
    ) -> CalResult<Option<CalibrationModel<'a>>> {
        let mut improved: Option<CalibrationModel<'a>> = None;
        let mut steps = 0usize;

        loop {
            let current = improved.as_ref().unwrap_or(model);

            if let Some(max) = self.config.max_steps {
                if steps >= max {
                    warn!("{} {:?}: step cap of {} reached", param, direction, max);
                    return Ok(improved);
                }
            }

            let candidate = match current.increment(param, direction) {
                Ok(candidate) => candidate,
                Err(e) if e.is_degenerate() => return Ok(improved),
                Err(e) => return Err(e),
            };
            steps += 1;

            if candidate.score().partial_cmp(&current.score()) != Some(Ordering::Greater) {
                return Ok(improved);
            }
            improved = Some(candidate);
        }
    }
}

impl Default for Tuner {
    fn default() -> Self {
        Self::new(TunerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationParams;
    use crate::estimator::{guess, guess_with, EstimatorConfig};
    use crate::stats::RankRounding;
    use crate::test_support::{axis_points, unit_sphere};

    fn assert_within_one(actual: [i32; 6], expected: [i32; 6]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() <= 1, "got {:?}, expected {:?}", actual, expected);
        }
    }

    #[test]
    fn test_sphere_converges_to_radius() {
        let readings = unit_sphere(10, 20, 100.0);
        let start = guess(&readings).unwrap();
        let tuner = Tuner::new(TunerConfig::unbounded());

        let outcome = tuner.tune(&start, &readings, Phase::Full, |_, _| {}).unwrap();

        assert!(outcome.converged);
        assert_within_one(outcome.model.params().values(), [-100, 100, -100, 100, -100, 100]);
        assert!(outcome.model.score() > start.score());
    }

    #[test]
    fn test_scores_never_decrease_across_sweeps() {
        let readings = unit_sphere(10, 20, 100.0);
        let start = guess(&readings).unwrap();
        let mut scores = Vec::new();

        let outcome = Tuner::default()
            .tune(&start, &readings, Phase::Sample, |phase, model| {
                assert_eq!(phase, Phase::Sample);
                scores.push(model.score());
            })
            .unwrap();

        // Starting model plus one entry per sweep
        assert_eq!(scores.len(), outcome.sweeps + 1);
        assert!(scores.windows(2).all(|w| w[1] >= w[0]));
        assert!(scores.iter().all(|&s| s <= 0.0));
    }

    #[test]
    fn test_perfect_fit_is_a_fixed_point() {
        let readings = axis_points(100);
        let config = EstimatorConfig {
            rounding: RankRounding::Nearest,
            ..EstimatorConfig::default()
        };
        let start = guess_with(&readings, &config).unwrap();

        let outcome = Tuner::default().tune(&start, &readings, Phase::Full, |_, _| {}).unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.sweeps, 1);
        assert!(outcome.model.same_params(&start));
        assert_eq!(outcome.model.score(), 0.0);

        // Running again from the result changes nothing
        let again = Tuner::default().tune(&outcome.model, &readings, Phase::Full, |_, _| {}).unwrap();
        assert!(again.model.same_params(&outcome.model));
    }

    #[test]
    fn test_sweep_cap_stops_a_drifting_search() {
        // Floor percentiles give (-100, 0) per axis here and the ranges keep
        // widening; only the caps end the search.
        let readings = axis_points(100);
        let start = guess(&readings).unwrap();
        let tuner = Tuner::new(TunerConfig {
            max_sweeps: Some(3),
            max_steps: Some(200),
        });

        let outcome = tuner.tune(&start, &readings, Phase::Full, |_, _| {}).unwrap();

        assert!(!outcome.converged);
        assert_eq!(outcome.sweeps, 3);
        assert!(outcome.model.score() > start.score());
        assert!(outcome.model.score() > -0.05);
    }

    #[test]
    fn test_try_direction_walks_to_the_best_value() {
        let readings = axis_points(100);
        let params = CalibrationParams::from_ranges([(-100, 90), (-100, 100), (-100, 100)]);
        let model = CalibrationModel::new(params, &readings).unwrap();
        let tuner = Tuner::new(TunerConfig::unbounded());

        let up = tuner.try_direction(&model, ParamId::XMax, Direction::Up).unwrap();
        let up = up.expect("raising x-max should improve");
        assert_eq!(up.params().get(ParamId::XMax), 100);
        assert_eq!(up.score(), 0.0);

        let down = tuner.try_direction(&model, ParamId::XMax, Direction::Down).unwrap();
        assert!(down.is_none());
    }

    #[test]
    fn test_try_direction_treats_degenerate_step_as_no_improvement() {
        let readings = axis_points(1);
        let params = CalibrationParams::from_ranges([(0, 1), (-1, 1), (-1, 1)]);
        let model = CalibrationModel::new(params, &readings).unwrap();

        let result = Tuner::default().try_direction(&model, ParamId::XMax, Direction::Down);
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_step_cap_limits_one_search() {
        let readings = axis_points(100);
        let params = CalibrationParams::from_ranges([(-100, 90), (-100, 100), (-100, 100)]);
        let model = CalibrationModel::new(params, &readings).unwrap();
        let tuner = Tuner::new(TunerConfig {
            max_sweeps: None,
            max_steps: Some(4),
        });

        let capped = tuner
            .try_direction(&model, ParamId::XMax, Direction::Up)
            .unwrap()
            .unwrap();
        assert_eq!(capped.params().get(ParamId::XMax), 94);
    }

    #[test]
    fn test_tune_rebinds_to_given_readings() {
        let full = unit_sphere(10, 20, 100.0);
        let subset: Vec<RawSample> = full.iter().step_by(2).copied().collect();
        let start = guess(&full).unwrap();

        let outcome = Tuner::default().tune(&start, &subset, Phase::Sample, |_, _| {}).unwrap();
        assert_eq!(outcome.model.readings().len(), subset.len());
        assert_eq!(outcome.phase, Phase::Sample);
    }
}
