//! Command-line interface definition

use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};

use crate::config::MAX_PRECISION;

/// Build the clap command for the coordconvert binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("coordconvert")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert vector geometries between WGS84, GCJ02 and BD09")
        .arg(
            Arg::new("input")
                .help("Input geometry file (.wkt, .txt or .wkb)")
                .required_unless_present("coordinate")
                .index(1),
        )
        .arg(
            Arg::new("from")
                .short('f')
                .long("from")
                .help("Source coordinate system (WGS84, GCJ02, BD09 or an alias)")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("to")
                .short('t')
                .long("to")
                .help("Destination coordinate system (WGS84, GCJ02, BD09 or an alias)")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file, defaults to <stem>_<FROM>_to_<TO>.<ext> next to the input")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format (wkt or wkb), defaults to the input format")
                .value_name("FORMAT")
                .required(false),
        )
        .arg(
            Arg::new("input-format")
                .long("input-format")
                .help("Input format (wkt or wkb), detected from the extension when omitted")
                .value_name("FORMAT")
                .required(false),
        )
        .arg(
            Arg::new("precision")
                .long("precision")
                .help("Decimal places for WKT output (0-17)")
                .value_name("DIGITS")
                .value_parser(value_parser!(u8).range(0..=i64::from(MAX_PRECISION)))
                .required(false),
        )
        .arg(
            Arg::new("coordinate")
                .long("coordinate")
                .help("Convert a single coordinate in 'x,y' format instead of a file")
                .value_name("COORDINATE")
                .allow_hyphen_values(true)
                .conflicts_with("input")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file, defaults to coordconvert.toml when present")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Audit log file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Send diagnostics to the debug log file instead of the console")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Do not draw a progress bar")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
}
