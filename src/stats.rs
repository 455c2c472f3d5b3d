//! Summary statistics over plain slices
//!
//! Free functions, no state. Empty input is a caller error and is reported as
//! `EmptySampleSet` rather than producing NaN.

use serde::{Deserialize, Serialize};

use crate::error::{CalResult, CalibrationError};

/// How a fractional percentile rank is turned into an index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankRounding {
    /// `floor(p / 100 * (n - 1))`
    #[default]
    Floor,
    /// `round(p / 100 * (n - 1))`
    Nearest,
}

pub fn average(values: &[f64]) -> CalResult<f64> {
    if values.is_empty() {
        return Err(CalibrationError::EmptySampleSet);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divisor n)
pub fn variance(values: &[f64]) -> CalResult<f64> {
    let mean = average(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(sum_sq / values.len() as f64)
}

pub fn std_deviation(values: &[f64]) -> CalResult<f64> {
    Ok(variance(values)?.sqrt())
}

/// Nearest-rank percentile lookup with the floor rule.
///
/// Sorts a copy of `values` and returns one value per requested percentile,
/// no interpolation.
pub fn percentile_to_value<T: Copy + Ord>(values: &[T], percentiles: &[f64]) -> CalResult<Vec<T>> {
    percentile_to_value_with(values, percentiles, RankRounding::Floor)
}

pub fn percentile_to_value_with<T: Copy + Ord>(
    values: &[T],
    percentiles: &[f64],
    rounding: RankRounding,
) -> CalResult<Vec<T>> {
    if values.is_empty() {
        return Err(CalibrationError::EmptySampleSet);
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let last = sorted.len() - 1;

    percentiles
        .iter()
        .map(|&p| {
            if !p.is_finite() || !(0.0..=100.0).contains(&p) {
                return Err(CalibrationError::InvalidPercentile(p));
            }
            let rank = p / 100.0 * last as f64;
            let index = match rounding {
                RankRounding::Floor => rank.floor(),
                RankRounding::Nearest => rank.round(),
            } as usize;
            Ok(sorted[index.min(last)])
        })
        .collect()
}

/// Evenly spaced subset of roughly `target` elements.
///
/// Stride is `len / target`, clamped to at least 1, so inputs shorter than
/// `target` come back whole.
pub fn regular_sample<T: Clone>(values: &[T], target: usize) -> Vec<T> {
    let stride = (values.len() / target.max(1)).max(1);
    values.iter().step_by(stride).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_average_and_population_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(average(&values).unwrap(), 5.0);
        // Population variance: divisor n, not n - 1
        assert_abs_diff_eq!(variance(&values).unwrap(), 4.0);
        assert_abs_diff_eq!(std_deviation(&values).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(average(&[]), Err(CalibrationError::EmptySampleSet)));
        assert!(matches!(std_deviation(&[]), Err(CalibrationError::EmptySampleSet)));
        let empty: [i32; 0] = [];
        assert!(matches!(
            percentile_to_value(&empty, &[1.0]),
            Err(CalibrationError::EmptySampleSet)
        ));
    }

    #[test]
    fn test_percentile_floor_rule() {
        let values: Vec<i32> = (0..100).rev().collect();
        // floor(0.01 * 99) = 0, floor(0.99 * 99) = 98
        assert_eq!(percentile_to_value(&values, &[1.0, 99.0]).unwrap(), vec![0, 98]);
        assert_eq!(percentile_to_value(&values, &[0.0, 100.0]).unwrap(), vec![0, 99]);
    }

    #[test]
    fn test_percentile_rounding_on_small_sets() {
        let values = [0, 100, -100, 0, 0, 0];
        assert_eq!(
            percentile_to_value_with(&values, &[1.0, 99.0], RankRounding::Floor).unwrap(),
            vec![-100, 0]
        );
        assert_eq!(
            percentile_to_value_with(&values, &[1.0, 99.0], RankRounding::Nearest).unwrap(),
            vec![-100, 100]
        );
    }

    #[test]
    fn test_percentile_out_of_range() {
        let values = [1, 2, 3];
        assert!(matches!(
            percentile_to_value(&values, &[101.0]),
            Err(CalibrationError::InvalidPercentile(_))
        ));
        assert!(percentile_to_value(&values, &[f64::NAN]).is_err());
    }

    #[test]
    fn test_regular_sample_stride() {
        let values: Vec<usize> = (0..1000).collect();
        let sample = regular_sample(&values, 300);
        // stride = 1000 / 300 = 3
        assert_eq!(sample.len(), 334);
        assert_eq!(&sample[..3], &[0, 3, 6]);
    }

    #[test]
    fn test_regular_sample_short_input_is_whole() {
        let values: Vec<usize> = (0..120).collect();
        assert_eq!(regular_sample(&values, 300), values);
        assert_eq!(regular_sample(&values, 120), values);
    }
}
