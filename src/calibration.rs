//! Six-parameter calibration model
//!
//! Each axis has a raw `(min, max)` pair that should map onto `-1` and `+1`.
//! A `CalibrationModel` binds a parameter set to a slice of readings and
//! evaluates it once, at construction. Changing a parameter or the readings
//! produces a new model; nothing is mutated in place.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::error::{CalResult, CalibrationError};
use crate::stats;
use crate::types::{magnitude, unit_sphere_error, Axis, RawSample, ScaledVec, PARAM_COUNT};

/// One of the six tunable parameters, in search order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    XMin,
    XMax,
    YMin,
    YMax,
    ZMin,
    ZMax,
}

impl ParamId {
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::XMin,
        ParamId::XMax,
        ParamId::YMin,
        ParamId::YMax,
        ParamId::ZMin,
        ParamId::ZMax,
    ];

    /// Position in the `(minX, maxX, minY, maxY, minZ, maxZ)` tuple
    pub fn index(self) -> usize {
        match self {
            ParamId::XMin => 0,
            ParamId::XMax => 1,
            ParamId::YMin => 2,
            ParamId::YMax => 3,
            ParamId::ZMin => 4,
            ParamId::ZMax => 5,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            ParamId::XMin | ParamId::XMax => Axis::X,
            ParamId::YMin | ParamId::YMax => Axis::Y,
            ParamId::ZMin | ParamId::ZMax => Axis::Z,
        }
    }
}

impl Display for ParamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bound = if self.index() % 2 == 0 { "min" } else { "max" };
        write!(f, "{}-{}", self.axis(), bound)
    }
}

/// Unit step applied by `increment`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn step(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// `(minX, maxX, minY, maxY, minZ, maxZ)` in raw sensor units
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalibrationParams {
    values: [i32; PARAM_COUNT],
}

impl CalibrationParams {
    pub fn new(values: [i32; PARAM_COUNT]) -> Self {
        Self { values }
    }

    /// Build from per-axis `(min, max)` pairs in x, y, z order
    pub fn from_ranges(ranges: [(i32, i32); 3]) -> Self {
        let [(x0, x1), (y0, y1), (z0, z1)] = ranges;
        Self::new([x0, x1, y0, y1, z0, z1])
    }

    pub fn values(&self) -> [i32; PARAM_COUNT] {
        self.values
    }

    pub fn get(&self, param: ParamId) -> i32 {
        self.values[param.index()]
    }

    pub fn range(&self, axis: Axis) -> (i32, i32) {
        let i = 2 * axis.index();
        (self.values[i], self.values[i + 1])
    }

    /// Raw value that maps to zero on this axis (hard-iron style offset)
    pub fn offset(&self, axis: Axis) -> f64 {
        let (min, max) = self.range(axis);
        (min as f64 + max as f64) / 2.0
    }

    /// Raw units per scaled unit on this axis
    pub fn half_range(&self, axis: Axis) -> f64 {
        let (min, max) = self.range(axis);
        (max as f64 - min as f64) / 2.0
    }

    /// Fails on the first axis whose range has collapsed
    pub fn check(&self) -> CalResult<()> {
        for axis in Axis::ALL {
            let (min, max) = self.range(axis);
            if min == max {
                return Err(CalibrationError::DegenerateRange { axis });
            }
        }
        Ok(())
    }

    /// Map a raw reading so that `min -> -1` and `max -> +1` on every axis
    pub fn scale(&self, raw: &RawSample) -> CalResult<ScaledVec> {
        self.check()?;
        Ok(self.scale_unchecked(raw))
    }

    fn scale_unchecked(&self, raw: &RawSample) -> ScaledVec {
        let axis_value = |axis: Axis| {
            let (min, max) = self.range(axis);
            (raw[axis] as f64 - min as f64) / (max as f64 - min as f64) * 2.0 - 1.0
        };
        ScaledVec::new(axis_value(Axis::X), axis_value(Axis::Y), axis_value(Axis::Z))
    }

    /// Copy with one parameter moved by one unit
    pub fn increment(&self, param: ParamId, direction: Direction) -> Self {
        let mut values = self.values;
        let slot = &mut values[param.index()];
        *slot = slot.saturating_add(direction.step());
        Self { values }
    }
}

impl Display for CalibrationParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let v = &self.values;
        write!(f, "{} {} {} {} {} {}", v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

/// A parameter set evaluated against one sample set
#[derive(Clone, Debug)]
pub struct CalibrationModel<'a> {
    params: CalibrationParams,
    readings: &'a [RawSample],
    scaled_magnitudes: Vec<f64>,
    mean_magnitude: f64,
    magnitude_std: f64,
    score: f64,
}

impl<'a> CalibrationModel<'a> {
    pub fn new(params: CalibrationParams, readings: &'a [RawSample]) -> CalResult<Self> {
        params.check()?;
        if readings.is_empty() {
            return Err(CalibrationError::EmptySampleSet);
        }

        let scaled_magnitudes: Vec<f64> = readings
            .iter()
            .map(|r| magnitude(&params.scale_unchecked(r)))
            .collect();
        let errors: Vec<f64> = scaled_magnitudes.iter().map(|&m| unit_sphere_error(m)).collect();

        // 0.0 - x keeps a perfect fit at +0.0
        let score = 0.0 - stats::average(&errors)?;
        let mean_magnitude = stats::average(&scaled_magnitudes)?;
        let magnitude_std = stats::std_deviation(&scaled_magnitudes)?;

        Ok(Self {
            params,
            readings,
            scaled_magnitudes,
            mean_magnitude,
            magnitude_std,
            score,
        })
    }

    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    pub fn readings(&self) -> &'a [RawSample] {
        self.readings
    }

    pub fn scale(&self, raw: &RawSample) -> ScaledVec {
        self.params.scale_unchecked(raw)
    }

    pub fn scaled_readings(&self) -> Vec<ScaledVec> {
        self.readings.iter().map(|r| self.scale(r)).collect()
    }

    pub fn scaled_magnitudes(&self) -> &[f64] {
        &self.scaled_magnitudes
    }

    /// Negative mean squared distance of scaled magnitudes from 1.0
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn mean_magnitude(&self) -> f64 {
        self.mean_magnitude
    }

    pub fn magnitude_std_deviation(&self) -> f64 {
        self.magnitude_std
    }

    /// Same parameters, evaluated against a different sample set
    pub fn with_readings<'b>(&self, readings: &'b [RawSample]) -> CalResult<CalibrationModel<'b>> {
        CalibrationModel::new(self.params, readings)
    }

    pub fn increment(&self, param: ParamId, direction: Direction) -> CalResult<CalibrationModel<'a>> {
        CalibrationModel::new(self.params.increment(param, direction), self.readings)
    }

    pub fn same_params(&self, other: &CalibrationModel<'_>) -> bool {
        self.params == other.params
    }

    /// Parameters, mean magnitude, magnitude std deviation and score on one line
    pub fn info_string(&self) -> String {
        format!(
            "{:<32} {:7.4} {:7.4} {:7.4}",
            self.params.to_string(),
            self.mean_magnitude,
            self.magnitude_std,
            self.score
        )
    }
}

impl Display for CalibrationModel<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.params)
    }
}
