//! Configuration file handling
//!
//! Settings are read from a TOML file. Every value is optional; command-line
//! flags override anything set here.
//!
//! ```toml
//! [conversion]
//! from = "WGS84"
//! to = "GCJ02"
//!
//! [output]
//! format = "wkt"
//! precision = 8
//!
//! [logging]
//! level = "info"
//! file = "coordconvert.log"
//! ```

use std::fs;
use std::path::Path;
use log::{debug, LevelFilter};

use crate::coordinate::{CoordinateSystem, CoordinateSystemFactory};
use crate::errors::{ConvertError, ConvertResult};
use crate::io::GeometryFormat;

/// Configuration file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "coordconvert.toml";

/// Most WKT decimal places accepted; an f64 carries no more than 17
/// significant digits
pub const MAX_PRECISION: u8 = 17;

/// Log file used when neither the configuration nor the CLI names one
pub const DEFAULT_LOG_FILE: &str = "coordconvert.log";

/// Settings loaded from a configuration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Default source coordinate system
    pub source: Option<CoordinateSystem>,
    /// Default destination coordinate system
    pub destination: Option<CoordinateSystem>,
    /// Default output format
    pub format: Option<GeometryFormat>,
    /// WKT decimal places
    pub precision: Option<usize>,
    /// Log level
    pub log_level: Option<LevelFilter>,
    /// Audit log file
    pub log_file: Option<String>,
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> ConvertResult<Self> {
        let table: toml::Table = content.parse()
            .map_err(|e| ConvertError::ConfigurationError(format!("Failed to parse TOML: {}", e)))?;

        let mut config = Config::default();

        if let Some(name) = get_str(&table, "conversion", "from")? {
            config.source = Some(CoordinateSystemFactory::from_string(name)?);
        }
        if let Some(name) = get_str(&table, "conversion", "to")? {
            config.destination = Some(CoordinateSystemFactory::from_string(name)?);
        }
        if let Some(name) = get_str(&table, "output", "format")? {
            config.format = Some(GeometryFormat::from_name(name)?);
        }
        if let Some(value) = get(&table, "output", "precision") {
            let places = value.as_integer()
                .filter(|p| (0..=i64::from(MAX_PRECISION)).contains(p))
                .ok_or_else(|| ConvertError::ConfigurationError(format!(
                    "output.precision must be an integer between 0 and {}", MAX_PRECISION
                )))?;
            config.precision = Some(places as usize);
        }
        if let Some(level) = get_str(&table, "logging", "level")? {
            config.log_level = Some(level.parse::<LevelFilter>()
                .map_err(|_| ConvertError::ConfigurationError(format!("Invalid log level: {}", level)))?);
        }
        if let Some(file) = get_str(&table, "logging", "file")? {
            config.log_file = Some(file.to_string());
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> ConvertResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load the configuration to use for this run
    ///
    /// # Arguments
    /// * `path` - Explicit configuration file; it must exist if given
    ///
    /// # Returns
    /// The explicit file, else `coordconvert.toml` if present, else defaults
    pub fn load(path: Option<&str>) -> ConvertResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                debug!("Using {} from the working directory", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            },
            None => Ok(Config::default()),
        }
    }
}

fn get<'a>(table: &'a toml::Table, section: &str, key: &str) -> Option<&'a toml::Value> {
    table.get(section)
        .and_then(|v| v.as_table())
        .and_then(|t| t.get(key))
}

fn get_str<'a>(table: &'a toml::Table, section: &str, key: &str) -> ConvertResult<Option<&'a str>> {
    match get(table, section, key) {
        None => Ok(None),
        Some(value) => value.as_str()
            .map(Some)
            .ok_or_else(|| ConvertError::ConfigurationError(format!("{}.{} must be a string", section, key))),
    }
}
