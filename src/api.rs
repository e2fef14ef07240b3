use log::info;

use crate::converter::{ConversionSummary, FileConversion, FileConverter};
use crate::coordinate::{Coordinate, CoordinateSystem, CoordinateTransformer};
use crate::errors::ConvertResult;
use crate::geometry::{Geometry, GeometryMapper};
use crate::utils::logger::Logger;

/// Main interface to the coordconvert library
pub struct CoordConvert {
    logger: Logger,
}

impl CoordConvert {
    /// Create a new CoordConvert instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to the audit log; nothing is logged to file when None
    ///
    /// # Returns
    /// A CoordConvert instance or an error if the log file cannot be created
    pub fn new(log_file: Option<&str>) -> ConvertResult<Self> {
        let logger = match log_file {
            Some(path) => Logger::new(path)?,
            None => Logger::disabled(),
        };
        Ok(CoordConvert { logger })
    }

    /// Create an instance around an existing logger
    pub fn with_logger(logger: Logger) -> Self {
        CoordConvert { logger }
    }

    /// Convert a single coordinate
    ///
    /// # Arguments
    /// * `coord` - Coordinate in the source system
    /// * `source` - Source coordinate system
    /// * `destination` - Destination coordinate system
    ///
    /// # Returns
    /// The converted coordinate, or a configuration error for an unsupported pair
    pub fn convert_point(&self, coord: &Coordinate, source: &CoordinateSystem, destination: &CoordinateSystem) -> ConvertResult<Coordinate> {
        CoordinateTransformer::new().transform_point(coord, source, destination)
    }

    /// Convert a batch of geometries, preserving order and shape
    pub fn convert_geometries(&self, geometries: &[Geometry], source: &CoordinateSystem, destination: &CoordinateSystem) -> ConvertResult<Vec<Geometry>> {
        let converted = GeometryMapper::new(*source, *destination).map_all(geometries)?;
        info!("Converted {} geometries from {} to {}", converted.len(), source, destination);
        Ok(converted)
    }

    /// Convert every geometry in a file and write the result
    pub fn convert_file(&self, request: &FileConversion) -> ConvertResult<ConversionSummary> {
        FileConverter::new(&self.logger).convert(request)
    }
}
