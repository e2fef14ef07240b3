//! Single coordinate conversion command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::resolve_system;
use crate::config::Config;
use crate::coordinate::{Coordinate, CoordinateSystem, CoordinateTransformer};
use crate::errors::{ConvertError, ConvertResult};

/// Command converting one "x,y" coordinate given on the command line
pub struct PointCommand {
    /// Coordinate to convert
    coordinate: Coordinate,
    /// Source coordinate system
    source: CoordinateSystem,
    /// Destination coordinate system
    destination: CoordinateSystem,
    /// Decimal places printed, all significant digits when None
    precision: Option<usize>,
}

impl PointCommand {
    /// Create a new point command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Loaded configuration
    ///
    /// # Returns
    /// A new PointCommand instance or an error
    pub fn new(args: &ArgMatches, config: &Config) -> ConvertResult<Self> {
        let coord_str = args.get_one::<String>("coordinate")
            .ok_or_else(|| ConvertError::GenericError("Missing coordinate".to_string()))?;
        let coordinate = Coordinate::from_string(coord_str)?;

        let source = resolve_system(args, "from", config.source)?;
        let destination = resolve_system(args, "to", config.destination)?;
        let precision = args.get_one::<u8>("precision").map(|&p| usize::from(p)).or(config.precision);

        Ok(PointCommand {
            coordinate,
            source,
            destination,
            precision,
        })
    }

    /// Convert the coordinate and format it as "x,y"
    pub fn run(&self) -> ConvertResult<String> {
        let result = CoordinateTransformer::new()
            .transform_point(&self.coordinate, &self.source, &self.destination)?;

        Ok(match self.precision {
            Some(places) => format!("{:.*},{:.*}", places, result.x, places, result.y),
            None => result.to_string(),
        })
    }
}

impl Command for PointCommand {
    fn execute(&self) -> ConvertResult<()> {
        info!("Converting coordinate {} from {} to {}", self.coordinate, self.source, self.destination);
        println!("{}", self.run()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;

    fn command(args: &[&str], config: &Config) -> ConvertResult<PointCommand> {
        let mut argv = vec!["coordconvert"];
        argv.extend_from_slice(args);
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        PointCommand::new(&matches, config)
    }

    #[test]
    fn test_point_conversion_with_precision() {
        let cmd = command(&["--coordinate", "116.407387,39.904179", "--from", "WGS84", "--to", "GCJ02", "--precision", "4"], &Config::default()).unwrap();
        assert_eq!(cmd.run().unwrap(), "116.4136,39.9056");
    }

    #[test]
    fn test_systems_fall_back_to_config() {
        let config = Config {
            source: Some(CoordinateSystem::GCJ02),
            destination: Some(CoordinateSystem::GCJ02),
            ..Config::default()
        };
        let cmd = command(&["--coordinate", "116.5,40.25"], &config).unwrap();
        assert_eq!(cmd.run().unwrap(), "116.5,40.25");
    }

    #[test]
    fn test_missing_destination_is_an_error() {
        assert!(command(&["--coordinate", "116.5,40.25", "--from", "BD09"], &Config::default()).is_err());
    }

    #[test]
    fn test_unknown_alias_is_rejected() {
        assert!(command(&["--coordinate", "1,2", "--from", "XYZ", "--to", "WGS84"], &Config::default()).is_err());
    }
}
