//! Coordinate value type

use std::fmt;

use crate::errors::{ConvertError, ConvertResult};

/// A longitude/latitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// X coordinate (longitude)
    pub x: f64,
    /// Y coordinate (latitude)
    pub y: f64,
}

impl Coordinate {
    /// Create a new coordinate from longitude and latitude
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y }
    }

    /// Longitude in degrees
    pub fn lng(&self) -> f64 {
        self.x
    }

    /// Latitude in degrees
    pub fn lat(&self) -> f64 {
        self.y
    }

    /// Parse a coordinate from a string (format: "x,y")
    pub fn from_string(coord_str: &str) -> ConvertResult<Self> {
        let parts: Vec<&str> = coord_str.split(',').collect();
        if parts.len() != 2 {
            return Err(ConvertError::parse(
                "coordinate",
                format!("expected 'x,y', got '{}'", coord_str),
            ));
        }

        let x = parts[0].trim().parse::<f64>()
            .map_err(|_| ConvertError::parse("coordinate", format!("invalid x value '{}'", parts[0].trim())))?;
        let y = parts[1].trim().parse::<f64>()
            .map_err(|_| ConvertError::parse("coordinate", format!("invalid y value '{}'", parts[1].trim())))?;

        Ok(Coordinate::new(x, y))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::new(x, y)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.x, coord.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
