//! Geometry mapping
//!
//! Rebuilds a geometry with every vertex passed through the pointwise
//! transform. Part order, ring order, vertex order and vertex counts are kept
//! exactly; rings are neither opened, closed nor deduplicated.

use log::debug;

use super::types::{Geometry, LineString, Polygon};
use crate::coordinate::{Coordinate, CoordinateSystem, CoordinateTransformer};
use crate::errors::ConvertResult;

/// Applies a fixed source/destination transform to whole geometries
#[derive(Debug, Clone, Copy)]
pub struct GeometryMapper {
    source: CoordinateSystem,
    destination: CoordinateSystem,
    transformer: CoordinateTransformer,
}

impl GeometryMapper {
    /// Create a mapper for one source/destination pair
    pub fn new(source: CoordinateSystem, destination: CoordinateSystem) -> Self {
        GeometryMapper {
            source,
            destination,
            transformer: CoordinateTransformer::new(),
        }
    }

    /// Source coordinate system
    pub fn source(&self) -> CoordinateSystem {
        self.source
    }

    /// Destination coordinate system
    pub fn destination(&self) -> CoordinateSystem {
        self.destination
    }

    /// Map a geometry, returning a new one of identical shape
    ///
    /// `Other` geometries are returned unchanged. An unsupported system pair
    /// fails on the first vertex with the transformer's configuration error.
    pub fn map(&self, geometry: &Geometry) -> ConvertResult<Geometry> {
        let mapped = match geometry {
            Geometry::Point(coord) => Geometry::Point(self.map_coord(coord)?),
            Geometry::MultiPoint(points) => Geometry::MultiPoint(self.map_coords(points)?),
            Geometry::LineString(line) => Geometry::LineString(self.map_line(line)?),
            Geometry::MultiLineString(lines) => Geometry::MultiLineString(
                lines.iter()
                    .map(|line| self.map_line(line))
                    .collect::<ConvertResult<_>>()?,
            ),
            Geometry::Polygon(polygon) => Geometry::Polygon(self.map_polygon(polygon)?),
            Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(
                polygons.iter()
                    .map(|polygon| self.map_polygon(polygon))
                    .collect::<ConvertResult<_>>()?,
            ),
            Geometry::Other(raw) => {
                debug!("Passing through unsupported geometry {}", raw.kind);
                geometry.clone()
            },
        };

        Ok(mapped)
    }

    /// Map a batch of geometries in order, stopping at the first error
    pub fn map_all(&self, geometries: &[Geometry]) -> ConvertResult<Vec<Geometry>> {
        geometries.iter().map(|g| self.map(g)).collect()
    }

    fn map_coord(&self, coord: &Coordinate) -> ConvertResult<Coordinate> {
        self.transformer.transform_point(coord, &self.source, &self.destination)
    }

    fn map_coords(&self, coords: &[Coordinate]) -> ConvertResult<Vec<Coordinate>> {
        coords.iter().map(|c| self.map_coord(c)).collect()
    }

    fn map_line(&self, line: &LineString) -> ConvertResult<LineString> {
        Ok(LineString(self.map_coords(&line.0)?))
    }

    fn map_polygon(&self, polygon: &Polygon) -> ConvertResult<Polygon> {
        let rings = polygon.rings.iter()
            .map(|ring| self.map_line(ring))
            .collect::<ConvertResult<_>>()?;
        Ok(Polygon { rings })
    }
}

/// Map a single geometry from one coordinate system to another
pub fn map_geometry(geometry: &Geometry, source: CoordinateSystem, destination: CoordinateSystem) -> ConvertResult<Geometry> {
    GeometryMapper::new(source, destination).map(geometry)
}

/// Map a batch of geometries, preserving their order
pub fn map_geometries(geometries: &[Geometry], source: CoordinateSystem, destination: CoordinateSystem) -> ConvertResult<Vec<Geometry>> {
    GeometryMapper::new(source, destination).map_all(geometries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::transform;
    use crate::errors::ConvertError;
    use crate::geometry::types::{RawGeometry, RawPayload};
    use CoordinateSystem::{BD09, GCJ02, WGS84};

    fn beijing_ring(n: usize) -> LineString {
        let mut coords: Vec<Coordinate> = (0..n - 1)
            .map(|i| Coordinate::new(116.30 + 0.01 * i as f64, 39.90 + 0.005 * (i % 2) as f64))
            .collect();
        coords.push(coords[0]);
        LineString(coords)
    }

    fn sample_geometries() -> Vec<Geometry> {
        vec![
            Geometry::Point(Coordinate::new(116.3975, 39.9087)),
            Geometry::MultiPoint(vec![Coordinate::new(116.1, 39.1), Coordinate::new(121.4, 31.2)]),
            Geometry::LineString(LineString::from(vec![(116.0, 39.0), (116.5, 39.5), (117.0, 40.0)])),
            Geometry::MultiLineString(vec![
                LineString::from(vec![(116.0, 39.0), (116.5, 39.5)]),
                LineString::from(vec![(121.0, 31.0), (121.1, 31.1), (121.2, 31.2)]),
            ]),
            Geometry::Polygon(Polygon::new(vec![beijing_ring(5), beijing_ring(4)])),
            Geometry::MultiPolygon(vec![
                Polygon::new(vec![beijing_ring(6)]),
                Polygon::new(vec![beijing_ring(5), beijing_ring(4), beijing_ring(4)]),
            ]),
            Geometry::MultiPoint(Vec::new()),
        ]
    }

    #[test]
    fn test_shape_is_preserved() {
        for geometry in sample_geometries() {
            for (source, destination) in [(WGS84, GCJ02), (GCJ02, BD09), (BD09, WGS84)] {
                let mapped = map_geometry(&geometry, source, destination).unwrap();
                assert_eq!(mapped.shape(), geometry.shape());
            }
        }
    }

    #[test]
    fn test_polygon_hole_preservation() {
        let polygon = Geometry::Polygon(Polygon::new(vec![beijing_ring(5), beijing_ring(4)]));
        let mapped = map_geometry(&polygon, WGS84, GCJ02).unwrap();

        match mapped {
            Geometry::Polygon(p) => {
                assert_eq!(p.rings.len(), 2);
                assert_eq!(p.rings[0].len(), 5);
                assert_eq!(p.rings[1].len(), 4);
                assert!(p.rings[0].is_closed());
            },
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_every_vertex_is_transformed_in_order() {
        let line = Geometry::LineString(LineString::from(vec![(116.0, 39.0), (116.5, 39.5), (-122.4, 37.7)]));
        let mapped = map_geometry(&line, WGS84, BD09).unwrap();

        for (original, result) in line.coords().zip(mapped.coords()) {
            let expected = transform(original.x, original.y, WGS84, BD09).unwrap();
            assert_eq!((result.x, result.y), expected);
        }
    }

    #[test]
    fn test_other_passes_through() {
        let other = Geometry::Other(RawGeometry {
            kind: "GEOMETRYCOLLECTION".to_string(),
            payload: RawPayload::Wkt("GEOMETRYCOLLECTION (POINT (116 39))".to_string()),
        });
        assert_eq!(map_geometry(&other, WGS84, GCJ02).unwrap(), other);
        // Even an unsupported pair cannot fail on a geometry without vertices
        assert_eq!(map_geometry(&other, WGS84, CoordinateSystem::Other(3857)).unwrap(), other);
    }

    #[test]
    fn test_identity_mapping_is_exact() {
        for geometry in sample_geometries() {
            assert_eq!(map_geometry(&geometry, GCJ02, GCJ02).unwrap(), geometry);
        }
    }

    #[test]
    fn test_unsupported_pair_propagates() {
        let point = Geometry::Point(Coordinate::new(116.3975, 39.9087));
        let result = map_geometry(&point, CoordinateSystem::Other(3857), WGS84);
        assert!(matches!(result, Err(ConvertError::ConfigurationError(_))));

        let batch = sample_geometries();
        assert!(map_geometries(&batch, WGS84, CoordinateSystem::Other(2385)).is_err());
        assert_eq!(map_geometries(&batch, WGS84, GCJ02).unwrap().len(), batch.len());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let geometry = sample_geometries().remove(4);
        let before = geometry.clone();
        let _ = map_geometry(&geometry, WGS84, GCJ02).unwrap();
        assert_eq!(geometry, before);
    }
}
