//! Tests for geometry format detection

use crate::io::GeometryFormat;


#[test]
fn test_format_from_path() {
    assert_eq!(GeometryFormat::from_path("roads.wkt").unwrap(), GeometryFormat::Wkt);
    assert_eq!(GeometryFormat::from_path("/data/ROADS.WKB").unwrap(), GeometryFormat::Wkb);
    assert_eq!(GeometryFormat::from_path("roads.txt").unwrap(), GeometryFormat::Wkt);
    assert!(GeometryFormat::from_path("roads.shp").is_err());
    assert!(GeometryFormat::from_path("roads").is_err());
}

#[test]
fn test_format_from_name() {
    assert_eq!(GeometryFormat::from_name(" WKB ").unwrap(), GeometryFormat::Wkb);
    assert!(GeometryFormat::from_name("geojson").is_err());
    assert_eq!(GeometryFormat::Wkb.extension(), "wkb");
}
