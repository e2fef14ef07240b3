//! Coordinate handling for WGS84, GCJ02 and BD09
//!
//! This module provides the coordinate value type, the coordinate system
//! identifiers and the pointwise transformations between them.

mod bbox;
mod point;
mod transform;
mod crs;
pub mod offset;

// Re-export key types
pub use self::bbox::{BoundingBox, CHINA, in_china};
pub use self::point::Coordinate;
pub use self::transform::{CoordinateTransformer, transform, transform_by_name, validate_pair};
pub use self::crs::{CoordinateSystem, CoordinateSystemFactory};
