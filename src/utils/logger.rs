//! Audit log for conversion runs
//!
//! Commands record what they converted to a plain log file. The logger can
//! also be installed as the global `log` backend when file-only logging is
//! wanted.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Level, Metadata, LevelFilter};

use crate::coordinate::CoordinateSystem;

/// File-backed logger
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level accepted when used as the global logger
    level: Level,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level: Level::Info,
        })
    }

    /// Creates a logger that discards everything
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
            level: Level::Error,
        }
    }

    /// Set the most verbose level accepted through the `log` facade
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self.file.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs a summary of one conversion run
    ///
    /// # Arguments
    ///
    /// * `input` - Input file path
    /// * `output` - Output file path
    /// * `source` - Source coordinate system
    /// * `destination` - Destination coordinate system
    /// * `converted` - Number of geometries converted
    /// * `passed_through` - Number of unsupported geometries copied unchanged
    pub fn log_conversion(
        &self,
        input: &str,
        output: &str,
        source: &CoordinateSystem,
        destination: &CoordinateSystem,
        converted: usize,
        passed_through: usize,
    ) -> io::Result<()> {
        self.log("Conversion:")?;
        self.log(&format!("  Input: {}", input))?;
        self.log(&format!("  Output: {}", output))?;
        self.log(&format!("  From: {}", source.description()))?;
        self.log(&format!("  To: {}", destination.description()))?;
        self.log(&format!("  Geometries converted: {}", converted))?;
        self.log(&format!("  Geometries passed through: {}", passed_through))?;
        Ok(())
    }

    /// Static method to install a file logger as the global `log` backend
    pub fn init_global_logger(log_file: &str, level: LevelFilter) -> io::Result<()> {
        let global_logger = Logger::new(log_file)?
            .with_level(level.to_level().unwrap_or(Level::Error));

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
