use thiserror::Error;

use crate::types::Axis;

/// Calibration error types
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("Degenerate range on {axis} axis: max equals min")]
    DegenerateRange { axis: Axis },

    #[error("Sample set is empty")]
    EmptySampleSet,

    #[error("Malformed record on line {line}: {content:?} (expected 3 integers)")]
    MalformedRecord { line: usize, content: String },

    #[error("Invalid percentile: {0}")]
    InvalidPercentile(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalibrationError {
    /// True for errors the tuner absorbs as "no improvement" during search
    pub fn is_degenerate(&self) -> bool {
        matches!(self, CalibrationError::DegenerateRange { .. })
    }
}

/// Result type for calibration operations
pub type CalResult<T> = Result<T, CalibrationError>;
