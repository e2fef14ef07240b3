pub mod errors;
pub mod config;
pub mod coordinate;
pub mod geometry;
pub mod io;
pub mod utils;
pub mod converter;
pub mod commands;
pub mod cli;
pub mod api;

pub use crate::api::CoordConvert;

pub use errors::{ConvertError, ConvertResult};
pub use converter::{ConversionSummary, FileConversion, FileConverter};
pub use coordinate::{transform, transform_by_name, BoundingBox, Coordinate, CoordinateSystem, CoordinateTransformer};
pub use geometry::{map_geometries, map_geometry, Geometry, GeometryMapper, LineString, Polygon};
