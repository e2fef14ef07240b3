//! CLI command implementations
//!
//! This module contains the commands supported by the CLI application,
//! built with the Command pattern.

pub mod command_traits;
pub mod convert_command;
pub mod point_command;

pub use command_traits::{Command, CommandFactory};
pub use convert_command::ConvertCommand;
pub use point_command::PointCommand;

use clap::ArgMatches;
use log::debug;

use crate::config::Config;
use crate::coordinate::{CoordinateSystem, CoordinateSystemFactory};
use crate::errors::{ConvertError, ConvertResult};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// Settings missing from the command line are taken from the loaded
/// configuration.
pub struct CoordConvertCommandFactory {
    config: Config,
}

impl CoordConvertCommandFactory {
    /// Create a new factory instance
    pub fn new(config: Config) -> Self {
        CoordConvertCommandFactory { config }
    }
}

impl<'a> CommandFactory<'a> for CoordConvertCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> ConvertResult<Box<dyn Command + 'a>> {
        if args.contains_id("coordinate") {
            debug!("Creating point command");
            Ok(Box::new(PointCommand::new(args, &self.config)?))
        } else {
            debug!("Creating convert command");
            Ok(Box::new(ConvertCommand::new(args, &self.config, logger)?))
        }
    }
}

/// Resolve a coordinate system from a CLI flag, falling back to the configuration
///
/// # Arguments
/// * `args` - CLI argument matches
/// * `flag` - Argument id, "from" or "to"
/// * `configured` - Value from the configuration file
pub(crate) fn resolve_system(
    args: &ArgMatches,
    flag: &str,
    configured: Option<CoordinateSystem>,
) -> ConvertResult<CoordinateSystem> {
    match args.get_one::<String>(flag) {
        Some(name) => CoordinateSystemFactory::from_string(name),
        None => configured.ok_or_else(|| ConvertError::ConfigurationError(format!(
            "Missing --{} coordinate system (set it on the command line or in the configuration file)", flag
        ))),
    }
}
