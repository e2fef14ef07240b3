//! Custom error types for coordinate conversion

use std::fmt;
use std::io;

/// Conversion error types
#[derive(Debug)]
pub enum ConvertError {
    /// I/O error
    IoError(io::Error),
    /// Requested coordinate system or system pair is not supported
    ConfigurationError(String),
    /// Malformed geometry input
    ParseError {
        /// Where the problem was found ("line 3", "byte 42")
        location: String,
        /// What went wrong
        message: String,
    },
    /// Geometry that cannot be written in the requested format
    UnsupportedGeometry(String),
    /// Generic error with message
    GenericError(String),
}

impl ConvertError {
    /// Shorthand for building a parse error
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::ParseError {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::IoError(e) => write!(f, "I/O error: {}", e),
            ConvertError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            ConvertError::ParseError { location, message } => {
                write!(f, "Parse error at {}: {}", location, message)
            },
            ConvertError::UnsupportedGeometry(msg) => write!(f, "Unsupported geometry: {}", msg),
            ConvertError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(error: io::Error) -> Self {
        ConvertError::IoError(error)
    }
}

impl From<String> for ConvertError {
    fn from(msg: String) -> Self {
        ConvertError::GenericError(msg)
    }
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
