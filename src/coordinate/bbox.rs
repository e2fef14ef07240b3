//! Bounding box structure for defining regions

use super::point::Coordinate;

/// An axis-aligned longitude/latitude envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

/// Approximate envelope of mainland China, inside which the GCJ-02 shift applies
pub const CHINA: BoundingBox = BoundingBox {
    min_x: 72.004,
    min_y: 0.8293,
    max_x: 137.8347,
    max_y: 55.8271,
};

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every coordinate, or None for an empty input
    pub fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
        for coord in iter {
            bbox.expand_to_include(coord);
        }
        Some(bbox)
    }

    /// Grow this box so that it contains the coordinate
    pub fn expand_to_include(&mut self, coord: &Coordinate) {
        self.min_x = self.min_x.min(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_x = self.max_x.max(coord.x);
        self.max_y = self.max_y.max(coord.y);
    }

    /// Check if this bounding box contains a coordinate (edges inclusive)
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.x >= self.min_x && coord.x <= self.max_x &&
            coord.y >= self.min_y && coord.y <= self.max_y
    }

    /// Check if two bounding boxes overlap
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x &&
            self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    /// Merge two boxes into the box covering both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

/// Check whether a coordinate falls inside the China envelope
pub fn in_china(lng: f64, lat: f64) -> bool {
    CHINA.contains(&Coordinate::new(lng, lat))
}
