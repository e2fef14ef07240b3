//! Geometry file conversion command
//!
//! This module implements the command for converting every vertex of a
//! WKT or WKB file between coordinate systems.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::resolve_system;
use crate::config::Config;
use crate::converter::{FileConversion, FileConverter};
use crate::errors::{ConvertError, ConvertResult};
use crate::io::GeometryFormat;
use crate::utils::logger::Logger;

/// Command for converting a geometry file
pub struct ConvertCommand<'a> {
    /// What to convert and where to write it
    request: FileConversion,
    /// Logger for recording conversions
    logger: &'a Logger,
}

impl<'a> ConvertCommand<'a> {
    /// Create a new convert command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Loaded configuration
    /// * `logger` - Logger for recording conversions
    ///
    /// # Returns
    /// A new ConvertCommand instance or an error
    pub fn new(args: &ArgMatches, config: &Config, logger: &'a Logger) -> ConvertResult<Self> {
        let input = args.get_one::<String>("input")
            .ok_or_else(|| ConvertError::GenericError("Missing input file (or use --coordinate)".to_string()))?;

        let source = resolve_system(args, "from", config.source)?;
        let destination = resolve_system(args, "to", config.destination)?;

        let mut request = FileConversion::new(input, source, destination);
        request.output = args.get_one::<String>("output").cloned();
        request.input_format = args.get_one::<String>("input-format")
            .map(|name| GeometryFormat::from_name(name))
            .transpose()?;
        request.output_format = match args.get_one::<String>("format") {
            Some(name) => Some(GeometryFormat::from_name(name)?),
            None => config.format,
        };
        request.precision = args.get_one::<u8>("precision").map(|&p| usize::from(p)).or(config.precision);
        request.show_progress = !args.get_flag("no-progress");

        Ok(ConvertCommand { request, logger })
    }

    /// The conversion this command will run
    pub fn request(&self) -> &FileConversion {
        &self.request
    }
}

impl<'a> Command for ConvertCommand<'a> {
    fn execute(&self) -> ConvertResult<()> {
        let summary = FileConverter::new(self.logger).convert(&self.request)?;

        if let Some(output) = summary.output {
            info!("Wrote {} ({} converted, {} passed through)",
                  output, summary.converted, summary.passed_through);
            println!("{}", output);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;
    use crate::coordinate::CoordinateSystem;

    fn command<'a>(args: &[&str], config: &Config, logger: &'a Logger) -> ConvertResult<ConvertCommand<'a>> {
        let mut argv = vec!["coordconvert"];
        argv.extend_from_slice(args);
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        ConvertCommand::new(&matches, config, logger)
    }

    #[test]
    fn test_cli_flags_override_config() {
        let logger = Logger::disabled();
        let config = Config {
            source: Some(CoordinateSystem::BD09),
            destination: Some(CoordinateSystem::WGS84),
            format: Some(GeometryFormat::Wkb),
            precision: Some(3),
            ..Config::default()
        };

        let cmd = command(&["roads.wkt", "--from", "gcj", "--format", "wkt", "--no-progress"], &config, &logger).unwrap();
        let request = cmd.request();
        assert_eq!(request.source, CoordinateSystem::GCJ02);
        assert_eq!(request.destination, CoordinateSystem::WGS84);
        assert_eq!(request.output_format, Some(GeometryFormat::Wkt));
        assert_eq!(request.precision, Some(3));
        assert!(!request.show_progress);
    }

    #[test]
    fn test_invalid_format_name() {
        let logger = Logger::disabled();
        let result = command(&["roads.wkt", "--from", "WGS84", "--to", "BD09", "--format", "geojson"], &Config::default(), &logger);
        assert!(result.is_err());
    }
}
