//! Synthetic readings shared by the unit tests

use std::f64::consts::PI;

use crate::types::RawSample;

/// The six axis-aligned points at radius `r`
pub fn axis_points(r: i32) -> Vec<RawSample> {
    vec![
        RawSample::new(0, 0, r),
        RawSample::new(r, 0, 0),
        RawSample::new(-r, 0, 0),
        RawSample::new(0, r, 0),
        RawSample::new(0, -r, 0),
        RawSample::new(0, 0, -r),
    ]
}

/// Latitude/longitude grid on an ellipsoid, plus its six poles.
///
/// Each axis is `offset + scale * radius * unit`, rounded to the nearest integer.
pub fn sphere(n_lat: usize, n_lon: usize, radius: f64, offset: [f64; 3], scale: [f64; 3]) -> Vec<RawSample> {
    let to_raw = |unit: [f64; 3]| {
        let c = |a: usize| (offset[a] + scale[a] * radius * unit[a]).round() as i32;
        RawSample::new(c(0), c(1), c(2))
    };

    let mut points = Vec::with_capacity(n_lat * n_lon + 6);
    for a in 0..3 {
        for sign in [-1.0, 1.0] {
            let mut unit = [0.0; 3];
            unit[a] = sign;
            points.push(to_raw(unit));
        }
    }
    for i in 0..n_lat {
        let theta = PI * (i as f64 + 0.5) / n_lat as f64;
        for j in 0..n_lon {
            let phi = 2.0 * PI * j as f64 / n_lon as f64;
            points.push(to_raw([
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ]));
        }
    }
    points
}

pub fn unit_sphere(n_lat: usize, n_lon: usize, radius: f64) -> Vec<RawSample> {
    sphere(n_lat, n_lon, radius, [0.0; 3], [1.0; 3])
}
