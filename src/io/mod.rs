//! Geometry input and output
//!
//! This module provides the WKT and WKB codecs and file level helpers.

pub mod byte_order;
pub mod wkb;
pub mod wkt;
pub mod format;

pub use byte_order::ByteOrder;
pub use format::{GeometryDocument, GeometryFormat, WriteOptions, read_geometries, write_geometries};

#[cfg(test)]
mod tests;
