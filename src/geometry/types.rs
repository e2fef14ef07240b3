//! Core geometry data structures

use std::fmt;

use crate::coordinate::{BoundingBox, Coordinate};

/// An ordered sequence of vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString(pub Vec<Coordinate>);

impl LineString {
    /// Create a line string from its vertices
    pub fn new(coords: Vec<Coordinate>) -> Self {
        LineString(coords)
    }

    /// Vertices in order
    pub fn coords(&self) -> &[Coordinate] {
        &self.0
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the line has no vertices
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the first and last vertex coincide
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() > 1 && first == last,
            _ => false,
        }
    }
}

impl From<Vec<(f64, f64)>> for LineString {
    fn from(coords: Vec<(f64, f64)>) -> Self {
        LineString(coords.into_iter().map(Coordinate::from).collect())
    }
}

/// A polygon: exterior ring first, then holes in order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Rings of the polygon
    pub rings: Vec<LineString>,
}

impl Polygon {
    /// Create a polygon from its rings
    pub fn new(rings: Vec<LineString>) -> Self {
        Polygon { rings }
    }

    /// The outer boundary, if the polygon is not empty
    pub fn exterior(&self) -> Option<&LineString> {
        self.rings.first()
    }

    /// Holes of the polygon
    pub fn interiors(&self) -> &[LineString] {
        if self.rings.is_empty() {
            &[]
        } else {
            &self.rings[1..]
        }
    }
}

/// Encoded form of a geometry the mapper does not understand
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Original well-known text
    Wkt(String),
    /// Original well-known binary
    Wkb(Vec<u8>),
}

/// A geometry passed through without inspection
#[derive(Debug, Clone, PartialEq)]
pub struct RawGeometry {
    /// Type name as found in the input (e.g. "GEOMETRYCOLLECTION", "WKB type 1001")
    pub kind: String,
    /// Untouched encoded geometry
    pub payload: RawPayload,
}

/// A vector geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    MultiPoint(Vec<Coordinate>),
    LineString(LineString),
    MultiLineString(Vec<LineString>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    /// Any other geometry kind
    Other(RawGeometry),
}

/// Structural fingerprint of a geometry: its tag and vertex counts per part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryShape {
    /// Geometry type name
    pub kind: &'static str,
    /// Vertex count of every ring or line, grouped by part
    pub parts: Vec<Vec<usize>>,
}

impl Geometry {
    /// Name of the geometry type
    pub fn geometry_type(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Other(_) => "Other",
        }
    }

    /// Number of parts (1 for single geometries, 0 for `Other`)
    pub fn part_count(&self) -> usize {
        match self {
            Geometry::Point(_) | Geometry::LineString(_) | Geometry::Polygon(_) => 1,
            Geometry::MultiPoint(points) => points.len(),
            Geometry::MultiLineString(lines) => lines.len(),
            Geometry::MultiPolygon(polygons) => polygons.len(),
            Geometry::Other(_) => 0,
        }
    }

    /// Total number of vertices
    pub fn vertex_count(&self) -> usize {
        self.coords().count()
    }

    /// Whether the geometry is one of the six supported kinds
    pub fn is_supported(&self) -> bool {
        !matches!(self, Geometry::Other(_))
    }

    /// Structural fingerprint, used to check that mapping preserved the shape
    pub fn shape(&self) -> GeometryShape {
        let parts = match self {
            Geometry::Point(_) => vec![vec![1]],
            Geometry::MultiPoint(points) => points.iter().map(|_| vec![1]).collect(),
            Geometry::LineString(line) => vec![vec![line.len()]],
            Geometry::MultiLineString(lines) => lines.iter().map(|l| vec![l.len()]).collect(),
            Geometry::Polygon(polygon) => vec![ring_sizes(polygon)],
            Geometry::MultiPolygon(polygons) => polygons.iter().map(ring_sizes).collect(),
            Geometry::Other(_) => Vec::new(),
        };

        GeometryShape {
            kind: self.geometry_type(),
            parts,
        }
    }

    /// Iterate over every vertex in storage order
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coordinate> + '_> {
        match self {
            Geometry::Point(coord) => Box::new(std::iter::once(coord)),
            Geometry::MultiPoint(points) => Box::new(points.iter()),
            Geometry::LineString(line) => Box::new(line.0.iter()),
            Geometry::MultiLineString(lines) => Box::new(lines.iter().flat_map(|l| l.0.iter())),
            Geometry::Polygon(polygon) => Box::new(polygon.rings.iter().flat_map(|r| r.0.iter())),
            Geometry::MultiPolygon(polygons) => Box::new(
                polygons.iter()
                    .flat_map(|p| p.rings.iter())
                    .flat_map(|r| r.0.iter()),
            ),
            Geometry::Other(_) => Box::new(std::iter::empty()),
        }
    }

    /// Envelope of all vertices, None for empty and `Other` geometries
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(self.coords())
    }
}

fn ring_sizes(polygon: &Polygon) -> Vec<usize> {
    polygon.rings.iter().map(LineString::len).collect()
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Other(raw) => write!(f, "{} (passed through)", raw.kind),
            _ => write!(f, "{} with {} part(s), {} vertices",
                        self.geometry_type(), self.part_count(), self.vertex_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ring(size: f64) -> LineString {
        LineString::from(vec![(0.0, 0.0), (size, 0.0), (size, size), (0.0, size), (0.0, 0.0)])
    }

    #[test]
    fn test_polygon_shape() {
        let hole = LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (1.0, 2.0), (1.0, 1.0)]);
        let geometry = Geometry::Polygon(Polygon::new(vec![square_ring(10.0), hole]));

        assert_eq!(geometry.geometry_type(), "Polygon");
        assert_eq!(geometry.part_count(), 1);
        assert_eq!(geometry.vertex_count(), 9);
        assert_eq!(geometry.shape().parts, vec![vec![5, 4]]);
        assert!(square_ring(1.0).is_closed());
    }

    #[test]
    fn test_multi_shapes() {
        let multi = Geometry::MultiPolygon(vec![
            Polygon::new(vec![square_ring(1.0)]),
            Polygon::new(vec![square_ring(2.0), square_ring(1.0)]),
        ]);
        assert_eq!(multi.part_count(), 2);
        assert_eq!(multi.shape().parts, vec![vec![5], vec![5, 5]]);

        let points = Geometry::MultiPoint(vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]);
        assert_eq!(points.part_count(), 2);
        assert_eq!(points.bounding_box(), Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_other_has_no_vertices() {
        let other = Geometry::Other(RawGeometry {
            kind: "GEOMETRYCOLLECTION".to_string(),
            payload: RawPayload::Wkt("GEOMETRYCOLLECTION EMPTY".to_string()),
        });
        assert!(!other.is_supported());
        assert_eq!(other.vertex_count(), 0);
        assert!(other.bounding_box().is_none());
        assert!(other.shape().parts.is_empty());
    }
}
