//! Geometry file formats
//!
//! Chooses a codec from a file extension or a format name and moves whole
//! geometry files in and out of memory.

use std::fs;
use std::path::Path;
use log::{debug, info};

use super::byte_order::ByteOrder;
use super::wkb::{read_wkb, write_wkb};
use super::wkt::{read_wkt, write_wkt};
use crate::errors::{ConvertError, ConvertResult};
use crate::geometry::Geometry;

/// Supported geometry file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-known text, one geometry per line
    Wkt,
    /// Concatenated well-known binary
    Wkb,
}

impl GeometryFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &str) -> ConvertResult<Self> {
        let extension = Path::new(path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "wkt" | "txt" => Ok(GeometryFormat::Wkt),
            "wkb" => Ok(GeometryFormat::Wkb),
            _ => Err(ConvertError::ConfigurationError(format!(
                "Cannot determine geometry format of '{}', use --input-format wkt|wkb", path
            ))),
        }
    }

    /// Parse a format name ("wkt" or "wkb")
    pub fn from_name(name: &str) -> ConvertResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "wkt" => Ok(GeometryFormat::Wkt),
            "wkb" => Ok(GeometryFormat::Wkb),
            other => Err(ConvertError::ConfigurationError(format!("Unknown geometry format: {}", other))),
        }
    }

    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            GeometryFormat::Wkt => "wkt",
            GeometryFormat::Wkb => "wkb",
        }
    }
}

/// Geometries loaded from a file together with what is needed to write them back
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDocument {
    /// Geometries in file order
    pub geometries: Vec<Geometry>,
    /// Format the geometries were read from
    pub format: GeometryFormat,
    /// Byte order of WKB input
    pub byte_order: ByteOrder,
}

/// Options controlling how geometries are written
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Output format
    pub format: GeometryFormat,
    /// WKT decimal places, full precision when None
    pub precision: Option<usize>,
    /// WKB byte order
    pub byte_order: ByteOrder,
}

/// Read every geometry from a file
///
/// # Arguments
/// * `path` - Path of the input file
/// * `format` - Format of the file
///
/// # Returns
/// The loaded document or an error
pub fn read_geometries(path: &str, format: GeometryFormat) -> ConvertResult<GeometryDocument> {
    info!("Reading {:?} geometries from {}", format, path);

    let document = match format {
        GeometryFormat::Wkt => {
            let content = fs::read_to_string(path)?;
            GeometryDocument {
                geometries: read_wkt(&content)?,
                format,
                byte_order: ByteOrder::default(),
            }
        },
        GeometryFormat::Wkb => {
            let data = fs::read(path)?;
            let wkb = read_wkb(&data)?;
            debug!("WKB input uses {}", wkb.byte_order.name());
            GeometryDocument {
                geometries: wkb.geometries,
                format,
                byte_order: wkb.byte_order,
            }
        },
    };

    info!("Read {} geometries", document.geometries.len());
    Ok(document)
}

/// Write geometries to a file
pub fn write_geometries(path: &str, geometries: &[Geometry], options: &WriteOptions) -> ConvertResult<()> {
    info!("Writing {} geometries to {} as {:?}", geometries.len(), path, options.format);

    match options.format {
        GeometryFormat::Wkt => fs::write(path, write_wkt(geometries, options.precision)?)?,
        GeometryFormat::Wkb => fs::write(path, write_wkb(geometries, options.byte_order)?)?,
    }

    Ok(())
}
