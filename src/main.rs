use std::process;
use log::{error, LevelFilter};

use coordconvert::cli::build_cli;
use coordconvert::commands::{CommandFactory, CoordConvertCommandFactory};
use coordconvert::config::{Config, DEFAULT_LOG_FILE};
use coordconvert::utils::logger::Logger;

/// Diagnostics file used with --quiet
const DEBUG_LOG_FILE: &str = "coordconvert-debug.log";

fn main() {
    let matches = build_cli().get_matches();

    let config = match Config::load(matches.get_one::<String>("config").map(|s| s.as_str())) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level.unwrap_or(LevelFilter::Info)
    };

    if matches.get_flag("quiet") {
        if let Err(e) = Logger::init_global_logger(DEBUG_LOG_FILE, level) {
            eprintln!("Error setting up global logger: {}", e);
            process::exit(1);
        }
    } else {
        // RUST_LOG, when set, refines the level chosen above
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp(None)
            .init();
    }

    let log_file = matches.get_one::<String>("log-file")
        .cloned()
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    let logger = match Logger::new(&log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    let factory = CoordConvertCommandFactory::new(config);

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
