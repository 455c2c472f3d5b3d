//! Offset and scale calibration for tri-axial sensors.
//!
//! Fits six raw-unit parameters (`min`/`max` per axis) so that scaled readings
//! of an accelerometer or magnetometer lie on the unit sphere. The fit starts
//! from a percentile guess and is refined by coordinate ascent, first on a
//! regular subsample and then on every reading.

pub mod calibration;
pub mod error;
pub mod estimator;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod stats;
pub mod tuner;
pub mod types;

#[cfg(test)]
mod test_support;

pub use calibration::{CalibrationModel, CalibrationParams, Direction, ParamId};
pub use error::{CalResult, CalibrationError};
pub use estimator::{guess, guess_with, EstimatorConfig};
pub use pipeline::{CalibrationOutcome, Calibrator, CalibratorConfig};
pub use stats::RankRounding;
pub use tuner::{Phase, TuneOutcome, Tuner, TunerConfig};
pub use types::{Axis, RawSample};
