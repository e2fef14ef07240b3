//! Vector geometry model and coordinate mapping
//!
//! This module provides the geometry types the converter works on and the
//! mapper that pushes every vertex through a coordinate transformation.

pub mod types;
pub mod mapper;

pub use types::{Geometry, GeometryShape, LineString, Polygon, RawGeometry, RawPayload};
pub use mapper::{GeometryMapper, map_geometries, map_geometry};
