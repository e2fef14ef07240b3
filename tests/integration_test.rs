//! Integration tests for file and batch conversion

use std::fs;
use std::path::PathBuf;

use coordconvert::coordinate::CoordinateSystem::{BD09, GCJ02, WGS84};
use coordconvert::io::wkb::{read_wkb, write_wkb};
use coordconvert::io::wkt::read_wkt;
use coordconvert::io::{ByteOrder, GeometryFormat};
use coordconvert::{
    transform, transform_by_name, ConvertError, CoordConvert, Coordinate, CoordinateSystem,
    FileConversion, Geometry, LineString, Polygon,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coordconvert_it_{}", name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn square(x: f64, y: f64, size: f64) -> LineString {
    LineString::from(vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)])
}

fn expected(coord: &Coordinate, from: CoordinateSystem, to: CoordinateSystem) -> Coordinate {
    Coordinate::from(transform(coord.x, coord.y, from, to).unwrap())
}

#[test]
fn test_wkt_file_conversion_to_default_output() {
    let dir = scratch_dir("wkt");
    let input = dir.join("beijing.wkt");
    fs::write(&input, "\
# sample features
POINT (116.407387 39.904179)
LINESTRING (116.3 39.9, 116.35 39.95, 116.4 40.0)

POLYGON ((116.0 39.0, 117.0 39.0, 117.0 40.0, 116.0 40.0, 116.0 39.0), (116.2 39.2, 116.4 39.2, 116.4 39.4, 116.2 39.2))
GEOMETRYCOLLECTION (POINT (116.4 39.9))
POINT Z (116.4 39.9 50)
").unwrap();

    let api = CoordConvert::new(None).unwrap();
    let request = FileConversion::new(&input.to_string_lossy(), WGS84, GCJ02);
    let summary = api.convert_file(&request).unwrap();

    let output = PathBuf::from(summary.output.clone().unwrap());
    assert_eq!(output, dir.join("beijing_WGS84_to_GCJ02.wkt"));
    assert_eq!(summary.converted, 3);
    assert_eq!(summary.passed_through, 2);
    assert_eq!(summary.outside_china, 0);

    let original = read_wkt(&fs::read_to_string(&input).unwrap()).unwrap();
    let converted = read_wkt(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(original.len(), converted.len());

    for (before, after) in original.iter().zip(&converted) {
        assert_eq!(before.shape(), after.shape());
        if before.is_supported() {
            for (a, b) in before.coords().zip(after.coords()) {
                assert_eq!(*b, expected(a, WGS84, GCJ02));
            }
        } else {
            assert_eq!(before, after);
        }
    }
}

#[test]
fn test_wkb_file_conversion_keeps_byte_order() {
    let dir = scratch_dir("wkb");
    let input = dir.join("pois.wkb");
    let geometries = vec![
        Geometry::MultiPoint(vec![Coordinate::new(116.413772, 39.910501), Coordinate::new(121.48, 31.24)]),
        Geometry::Polygon(Polygon::new(vec![square(113.9, 22.5, 0.1)])),
        Geometry::MultiPolygon(vec![
            Polygon::new(vec![square(120.0, 30.0, 1.0), square(120.2, 30.2, 0.2)]),
            Polygon::new(vec![square(2.0, 48.0, 0.5)]),
        ]),
    ];
    fs::write(&input, write_wkb(&geometries, ByteOrder::BigEndian).unwrap()).unwrap();

    let output = dir.join("pois_wgs84.wkb");
    let api = CoordConvert::new(None).unwrap();
    let mut request = FileConversion::new(&input.to_string_lossy(), BD09, WGS84);
    request.output = Some(output.to_string_lossy().to_string());
    let summary = api.convert_file(&request).unwrap();

    assert_eq!(summary.converted, 3);
    assert_eq!(summary.passed_through, 0);

    let document = read_wkb(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(document.byte_order, ByteOrder::BigEndian);
    assert_eq!(document.geometries.len(), geometries.len());

    for (before, after) in geometries.iter().zip(&document.geometries) {
        assert_eq!(before.shape(), after.shape());
        for (a, b) in before.coords().zip(after.coords()) {
            assert_eq!(*b, expected(a, BD09, WGS84));
        }
    }
}

#[test]
fn test_wkb_input_written_as_wkt_with_precision() {
    let dir = scratch_dir("wkb_to_wkt");
    let input = dir.join("point.wkb");
    let point = Geometry::Point(Coordinate::new(116.407387, 39.904179));
    fs::write(&input, write_wkb(&[point], ByteOrder::LittleEndian).unwrap()).unwrap();

    let api = CoordConvert::new(None).unwrap();
    let mut request = FileConversion::new(&input.to_string_lossy(), WGS84, GCJ02);
    request.output_format = Some(GeometryFormat::Wkt);
    request.precision = Some(4);
    let summary = api.convert_file(&request).unwrap();

    let output = summary.output.unwrap();
    assert!(output.ends_with("point_WGS84_to_GCJ02.wkt"));
    assert_eq!(fs::read_to_string(&output).unwrap().trim(), "POINT (116.4136 39.9056)");
}

#[test]
fn test_same_system_is_a_no_op() {
    let dir = scratch_dir("noop");
    let input = dir.join("line.wkt");
    fs::write(&input, "LINESTRING (116.3 39.9, 116.4 40.0)\n").unwrap();

    let api = CoordConvert::new(None).unwrap();
    let summary = api.convert_file(&FileConversion::new(&input.to_string_lossy(), BD09, BD09)).unwrap();

    assert_eq!(summary.output, None);
    assert!(!dir.join("line_BD09_to_BD09.wkt").exists());
}

#[test]
fn test_malformed_wkt_reports_line() {
    let dir = scratch_dir("malformed");
    let input = dir.join("bad.wkt");
    fs::write(&input, "POINT (1 2)\nLINESTRING (1 2, 3)\n").unwrap();

    let api = CoordConvert::new(None).unwrap();
    match api.convert_file(&FileConversion::new(&input.to_string_lossy(), WGS84, GCJ02)) {
        Err(ConvertError::ParseError { location, .. }) => assert_eq!(location, "line 2"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_audit_log_records_conversion() {
    let dir = scratch_dir("audit");
    let input = dir.join("p.wkt");
    fs::write(&input, "POINT (116.4 39.9)\n").unwrap();
    let log_path = dir.join("audit.log");

    let api = CoordConvert::new(Some(&log_path.to_string_lossy())).unwrap();
    api.convert_file(&FileConversion::new(&input.to_string_lossy(), GCJ02, BD09)).unwrap();

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("p_GCJ02_to_BD09.wkt"));
    assert!(log.contains("Geometries converted: 1"));
}

#[test]
fn test_batch_conversion_preserves_order_and_shape() {
    let api = CoordConvert::new(None).unwrap();
    let batch = vec![
        Geometry::Point(Coordinate::new(116.4, 39.9)),
        Geometry::MultiLineString(vec![
            LineString::from(vec![(121.4, 31.2), (121.5, 31.3)]),
            LineString::from(vec![(113.2, 23.1), (113.3, 23.2), (113.4, 23.3)]),
        ]),
    ];

    let converted = api.convert_geometries(&batch, &GCJ02, &WGS84).unwrap();
    assert_eq!(converted.len(), 2);
    for (before, after) in batch.iter().zip(&converted) {
        assert_eq!(before.shape(), after.shape());
        assert_ne!(before, after);
    }

    let back = api.convert_geometries(&converted, &WGS84, &GCJ02).unwrap();
    for (a, b) in batch.iter().flat_map(|g| g.coords()).zip(back.iter().flat_map(|g| g.coords())) {
        assert!((a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5);
    }
}

#[test]
fn test_unknown_system_name_is_rejected() {
    match transform_by_name(116.4, 39.9, "XYZ", "WGS84") {
        Err(ConvertError::ConfigurationError(_)) => {},
        other => panic!("expected configuration error, got {:?}", other),
    }
    assert!(transform_by_name(116.4, 39.9, "gps", "baidu").is_ok());
}

#[test]
fn test_engine_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Coordinate>();
    assert_send_sync::<CoordinateSystem>();
    assert_send_sync::<Geometry>();
    assert_send_sync::<coordconvert::GeometryMapper>();
    assert_send_sync::<coordconvert::CoordinateTransformer>();
}
