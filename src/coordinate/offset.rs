//! Distortion primitives shared by the GCJ-02 and BD-09 conversions
//!
//! The forward functions here are closed form. The inverse directions have no
//! closed form and are solved numerically with [`invert`].

use std::f64::consts::PI;
use log::debug;

use super::point::Coordinate;

/// Semi-major axis of the Krasovsky 1940 ellipsoid used by GCJ-02, in meters
pub const SEMI_MAJOR_AXIS: f64 = 6378245.0;

/// Eccentricity squared of the same ellipsoid
pub const ECCENTRICITY_SQUARED: f64 = 0.006_693_421_622_965_943;

/// Reference longitude the GCJ-02 polynomial is centred on
pub const REFERENCE_LNG: f64 = 105.0;

/// Reference latitude the GCJ-02 polynomial is centred on
pub const REFERENCE_LAT: f64 = 35.0;

/// Angular factor of the BD-09 perturbation
pub const X_PI: f64 = PI * 3000.0 / 180.0;

/// Constant longitude offset added by BD-09
pub const BD_LNG_OFFSET: f64 = 0.0065;

/// Constant latitude offset added by BD-09
pub const BD_LAT_OFFSET: f64 = 0.006;

/// Residual (degrees, per axis) below which the inverse iteration stops
pub const CONVERGENCE_THRESHOLD: f64 = 1e-6;

/// Hard cap on inverse iterations
pub const MAX_ITERATIONS: usize = 30;

fn offset_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn offset_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

/// GCJ-02 shift `(d_lng, d_lat)` in degrees for a WGS84 coordinate
///
/// The polynomial offsets are expressed in meters on the reference ellipsoid
/// and scaled back to degrees using the local radii of curvature.
pub fn gcj_delta(lng: f64, lat: f64) -> (f64, f64) {
    let d_lng = offset_lng(lng - REFERENCE_LNG, lat - REFERENCE_LAT);
    let d_lat = offset_lat(lng - REFERENCE_LNG, lat - REFERENCE_LAT);

    let rad_lat = lat / 180.0 * PI;
    let magic = rad_lat.sin();
    let magic = 1.0 - ECCENTRICITY_SQUARED * magic * magic;
    let sqrt_magic = magic.sqrt();

    let d_lng = (d_lng * 180.0) / (SEMI_MAJOR_AXIS / sqrt_magic * rad_lat.cos() * PI);
    let d_lat = (d_lat * 180.0) / ((SEMI_MAJOR_AXIS * (1.0 - ECCENTRICITY_SQUARED)) / (magic * sqrt_magic) * PI);

    (d_lng, d_lat)
}

/// BD-09 encryption of a GCJ-02 coordinate
///
/// Perturbs the polar radius and angle of the vector from the origin, then
/// applies the constant BD-09 offsets.
pub fn bd_encrypt(lng: f64, lat: f64) -> (f64, f64) {
    let z = (lng * lng + lat * lat).sqrt() + 0.00002 * (lat * X_PI).sin();
    let theta = lat.atan2(lng) + 0.000003 * (lng * X_PI).cos();

    (z * theta.cos() + BD_LNG_OFFSET, z * theta.sin() + BD_LAT_OFFSET)
}

/// Solve `forward(candidate) == target` by fixed-point iteration
///
/// Starts from the target itself and subtracts the residual on each step.
/// Stops once both residual components are below [`CONVERGENCE_THRESHOLD`]
/// or after [`MAX_ITERATIONS`]; the best candidate so far is returned either way.
pub fn invert<F>(target: Coordinate, forward: F) -> Coordinate
where
    F: Fn(f64, f64) -> (f64, f64),
{
    let mut lng = target.x;
    let mut lat = target.y;

    for iteration in 1..=MAX_ITERATIONS {
        let (fwd_lng, fwd_lat) = forward(lng, lat);
        let d_lng = fwd_lng - target.x;
        let d_lat = fwd_lat - target.y;

        lng -= d_lng;
        lat -= d_lat;

        if d_lng.abs() < CONVERGENCE_THRESHOLD && d_lat.abs() < CONVERGENCE_THRESHOLD {
            return Coordinate::new(lng, lat);
        }

        if iteration == MAX_ITERATIONS {
            debug!("Inverse of ({}, {}) stopped after {} iterations, residual ({:e}, {:e})",
                   target.x, target.y, iteration, d_lng, d_lat);
        }
    }

    Coordinate::new(lng, lat)
}
