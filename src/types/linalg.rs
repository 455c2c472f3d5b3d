//! Vector types for scaled readings
//!
//! Raw readings stay integral; everything after scaling is f64 nalgebra.

use nalgebra::Vector3;

// ===== Dimensions =====
pub const AXIS_COUNT: usize = 3;
pub const PARAM_COUNT: usize = 2 * AXIS_COUNT; // (min, max) per axis

/// A reading after per-axis scaling into roughly [-1, 1]
pub type ScaledVec = Vector3<f64>;

/// Euclidean length of a scaled reading
pub fn magnitude(v: &ScaledVec) -> f64 {
    v.norm()
}

/// Squared deviation of a magnitude from the unit sphere
pub fn unit_sphere_error(magnitude: f64) -> f64 {
    (magnitude - 1.0).powi(2)
}
