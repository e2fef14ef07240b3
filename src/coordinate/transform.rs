//! Coordinate transformation functionality

use log::debug;

use super::bbox::in_china;
use super::crs::{CoordinateSystem, CoordinateSystemFactory};
use super::offset::{bd_encrypt, gcj_delta, invert};
use super::point::Coordinate;
use crate::errors::{ConvertError, ConvertResult};

/// Transformer for converting between WGS84, GCJ02 and BD09
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateTransformer;

impl CoordinateTransformer {
    /// Create a new transformer
    pub fn new() -> Self {
        CoordinateTransformer
    }

    /// Convert from WGS84 to GCJ02
    ///
    /// Coordinates outside the China envelope are returned unchanged.
    pub fn wgs84_to_gcj02(&self, lng: f64, lat: f64) -> Coordinate {
        if !in_china(lng, lat) {
            return Coordinate::new(lng, lat);
        }

        let (d_lng, d_lat) = gcj_delta(lng, lat);
        Coordinate::new(lng + d_lng, lat + d_lat)
    }

    /// Convert from GCJ02 to WGS84 by iterating the forward shift
    ///
    /// Coordinates outside the China envelope are returned unchanged.
    pub fn gcj02_to_wgs84(&self, lng: f64, lat: f64) -> Coordinate {
        if !in_china(lng, lat) {
            return Coordinate::new(lng, lat);
        }

        invert(Coordinate::new(lng, lat), |x, y| self.wgs84_to_gcj02(x, y).into())
    }

    /// Convert from GCJ02 to BD09
    pub fn gcj02_to_bd09(&self, lng: f64, lat: f64) -> Coordinate {
        bd_encrypt(lng, lat).into()
    }

    /// Convert from BD09 to GCJ02 by iterating the BD09 encryption
    pub fn bd09_to_gcj02(&self, lng: f64, lat: f64) -> Coordinate {
        invert(Coordinate::new(lng, lat), bd_encrypt)
    }

    /// Convert from WGS84 to BD09 (via GCJ02)
    pub fn wgs84_to_bd09(&self, lng: f64, lat: f64) -> Coordinate {
        let gcj = self.wgs84_to_gcj02(lng, lat);
        self.gcj02_to_bd09(gcj.x, gcj.y)
    }

    /// Convert from BD09 to WGS84 (via GCJ02)
    pub fn bd09_to_wgs84(&self, lng: f64, lat: f64) -> Coordinate {
        let gcj = self.bd09_to_gcj02(lng, lat);
        self.gcj02_to_wgs84(gcj.x, gcj.y)
    }

    /// Transform a point between coordinate systems
    ///
    /// # Arguments
    /// * `point` - Coordinate to transform
    /// * `from_crs` - System the coordinate is expressed in
    /// * `to_crs` - System to express it in
    ///
    /// # Returns
    /// The transformed coordinate, or a configuration error if either system
    /// is not one of WGS84, GCJ02 or BD09
    pub fn transform_point(&self, point: &Coordinate, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> ConvertResult<Coordinate> {
        if from_crs == to_crs {
            return Ok(*point);
        }

        let (lng, lat) = (point.x, point.y);
        let result = match (from_crs, to_crs) {
            (CoordinateSystem::WGS84, CoordinateSystem::GCJ02) => self.wgs84_to_gcj02(lng, lat),
            (CoordinateSystem::WGS84, CoordinateSystem::BD09) => self.wgs84_to_bd09(lng, lat),
            (CoordinateSystem::GCJ02, CoordinateSystem::WGS84) => self.gcj02_to_wgs84(lng, lat),
            (CoordinateSystem::GCJ02, CoordinateSystem::BD09) => self.gcj02_to_bd09(lng, lat),
            (CoordinateSystem::BD09, CoordinateSystem::WGS84) => self.bd09_to_wgs84(lng, lat),
            (CoordinateSystem::BD09, CoordinateSystem::GCJ02) => self.bd09_to_gcj02(lng, lat),
            _ => return Err(unsupported_pair(from_crs, to_crs)),
        };

        Ok(result)
    }
}

/// Check that a source/destination pair is one the transformer can handle
pub fn validate_pair(from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> ConvertResult<()> {
    if from_crs == to_crs || (from_crs.is_supported() && to_crs.is_supported()) {
        Ok(())
    } else {
        Err(unsupported_pair(from_crs, to_crs))
    }
}

fn unsupported_pair(from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> ConvertError {
    ConvertError::ConfigurationError(format!(
        "Unsupported coordinate transformation from {} to {}",
        from_crs.description(), to_crs.description()
    ))
}

/// Transform a single longitude/latitude pair
///
/// Identity when `source == destination`. Non-finite inputs are not rejected
/// and propagate to the output.
pub fn transform(x: f64, y: f64, source: CoordinateSystem, destination: CoordinateSystem) -> ConvertResult<(f64, f64)> {
    let result = CoordinateTransformer.transform_point(&Coordinate::new(x, y), &source, &destination)?;
    debug!("Transformed {} ({}, {}) to {} ({}, {})",
           source, x, y, destination, result.x, result.y);
    Ok(result.into())
}

/// Transform a longitude/latitude pair with systems given by name
///
/// Unknown names, and names of systems that cannot be converted, are
/// configuration errors.
pub fn transform_by_name(x: f64, y: f64, source: &str, destination: &str) -> ConvertResult<(f64, f64)> {
    let source = CoordinateSystemFactory::from_string(source)?;
    let destination = CoordinateSystemFactory::from_string(destination)?;
    transform(x, y, source, destination)
}
