//! File conversion pipeline
//!
//! Reads a geometry file, maps every vertex between coordinate systems and
//! writes the result in the requested format.

use log::{info, warn};

use crate::coordinate::{validate_pair, CoordinateSystem, CHINA};
use crate::errors::{ConvertError, ConvertResult};
use crate::geometry::GeometryMapper;
use crate::io::{read_geometries, write_geometries, GeometryFormat, WriteOptions};
use crate::utils::logger::Logger;
use crate::utils::path_utils::{derive_output_path, is_same_file};
use crate::utils::progress::ProgressTracker;

/// Parameters of a file conversion
#[derive(Debug, Clone)]
pub struct FileConversion {
    /// Input geometry file
    pub input: String,
    /// Output file; derived from the input name when None
    pub output: Option<String>,
    /// Source coordinate system
    pub source: CoordinateSystem,
    /// Destination coordinate system
    pub destination: CoordinateSystem,
    /// Input format; detected from the extension when None
    pub input_format: Option<GeometryFormat>,
    /// Output format; same as the input when None
    pub output_format: Option<GeometryFormat>,
    /// WKT decimal places
    pub precision: Option<usize>,
    /// Whether to draw a progress bar
    pub show_progress: bool,
}

impl FileConversion {
    /// Conversion of `input` with every optional setting left at its default
    pub fn new(input: &str, source: CoordinateSystem, destination: CoordinateSystem) -> Self {
        FileConversion {
            input: input.to_string(),
            output: None,
            source,
            destination,
            input_format: None,
            output_format: None,
            precision: None,
            show_progress: false,
        }
    }
}

/// Outcome of a file conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// File written, None when nothing needed converting
    pub output: Option<String>,
    /// Geometries whose vertices were transformed
    pub converted: usize,
    /// Unsupported geometries copied unchanged
    pub passed_through: usize,
    /// Converted geometries lying entirely outside the China envelope
    pub outside_china: usize,
}

/// Converter for geometry files
pub struct FileConverter<'a> {
    logger: &'a Logger,
}

impl<'a> FileConverter<'a> {
    /// Create a new file converter
    pub fn new(logger: &'a Logger) -> Self {
        FileConverter { logger }
    }

    /// Convert every geometry in a file and write the result
    ///
    /// Does nothing when source and destination are the same system. Fails
    /// before reading anything when the system pair is not supported.
    ///
    /// # Arguments
    /// * `request` - What to convert and where to write it
    ///
    /// # Returns
    /// A summary of the run or an error
    pub fn convert(&self, request: &FileConversion) -> ConvertResult<ConversionSummary> {
        validate_pair(&request.source, &request.destination)?;

        if request.source == request.destination {
            info!("Input and output coordinate systems are the same ({}). No conversion needed.", request.source);
            return Ok(ConversionSummary {
                output: None,
                converted: 0,
                passed_through: 0,
                outside_china: 0,
            });
        }

        let input_format = match request.input_format {
            Some(format) => format,
            None => GeometryFormat::from_path(&request.input)?,
        };
        let document = read_geometries(&request.input, input_format)?;

        let output_format = request.output_format.unwrap_or(document.format);
        let output = request.output.clone().unwrap_or_else(|| {
            derive_output_path(&request.input, &request.source, &request.destination, output_format)
        });
        if is_same_file(&request.input, &output) {
            return Err(ConvertError::ConfigurationError(format!(
                "Output path '{}' would overwrite the input", output
            )));
        }

        info!("Converting {} from {} to {}", request.input, request.source, request.destination);

        let total = document.geometries.len() as u64;
        let progress = if request.show_progress {
            ProgressTracker::new(total, "Converting coordinates")
        } else {
            ProgressTracker::hidden(total)
        };

        let mapper = GeometryMapper::new(request.source, request.destination);
        let mut converted = Vec::with_capacity(document.geometries.len());
        let mut passed_through = 0;
        let mut outside_china = 0;

        for geometry in &document.geometries {
            if !geometry.is_supported() {
                passed_through += 1;
            } else if let Some(bbox) = geometry.bounding_box() {
                if !bbox.intersects(&CHINA) {
                    outside_china += 1;
                }
            }

            converted.push(mapper.map(geometry)?);
            progress.increment(1);
        }
        progress.finish();

        if passed_through > 0 {
            warn!("{} unsupported geometries were copied without conversion", passed_through);
        }
        if outside_china > 0 {
            warn!("{} geometries lie outside China, where the GCJ02 shift does not apply", outside_china);
        }

        let options = WriteOptions {
            format: output_format,
            precision: request.precision,
            byte_order: document.byte_order,
        };
        write_geometries(&output, &converted, &options)?;

        let summary = ConversionSummary {
            output: Some(output),
            converted: converted.len() - passed_through,
            passed_through,
            outside_china,
        };

        self.logger.log_conversion(
            &request.input,
            summary.output.as_deref().unwrap_or_default(),
            &request.source,
            &request.destination,
            summary.converted,
            summary.passed_through,
        )?;

        info!("Conversion completed: {} geometries written to {}",
              converted.len(), summary.output.as_deref().unwrap_or_default());

        Ok(summary)
    }
}
