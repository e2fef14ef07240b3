//! Tests for the WKB codec

use crate::coordinate::Coordinate;
use crate::errors::ConvertError;
use crate::geometry::{Geometry, LineString, Polygon, RawGeometry, RawPayload};
use crate::io::byte_order::ByteOrder;
use crate::io::wkb::{read_wkb, write_wkb, MAX_NESTING_DEPTH};
use super::test_utils::{nested_collections, POINT_NDR, POINT_XDR};

#[test]
fn test_read_point_both_orders() {
    let doc = read_wkb(&POINT_NDR).unwrap();
    assert_eq!(doc.geometries, vec![Geometry::Point(Coordinate::new(1.0, 2.0))]);
    assert_eq!(doc.byte_order, ByteOrder::LittleEndian);

    let doc = read_wkb(&POINT_XDR).unwrap();
    assert_eq!(doc.geometries, vec![Geometry::Point(Coordinate::new(1.0, 2.0))]);
    assert_eq!(doc.byte_order, ByteOrder::BigEndian);
}

#[test]
fn test_write_point_matches_reference_bytes() {
    let point = vec![Geometry::Point(Coordinate::new(1.0, 2.0))];
    assert_eq!(write_wkb(&point, ByteOrder::LittleEndian).unwrap(), POINT_NDR.to_vec());
    assert_eq!(write_wkb(&point, ByteOrder::BigEndian).unwrap(), POINT_XDR.to_vec());
}

#[test]
fn test_concatenated_stream() {
    let polygon = Geometry::Polygon(Polygon::new(vec![
        LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
        LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (1.0, 2.0), (1.0, 1.0)]),
    ]));
    let multi = Geometry::MultiLineString(vec![
        LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
        LineString::from(vec![(2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]),
    ]);
    let geometries = vec![polygon, multi, Geometry::MultiPoint(Vec::new())];

    let bytes = write_wkb(&geometries, ByteOrder::BigEndian).unwrap();
    let doc = read_wkb(&bytes).unwrap();
    assert_eq!(doc.geometries, geometries);
    assert_eq!(doc.byte_order, ByteOrder::BigEndian);
}

#[test]
fn test_point_z_is_kept_raw() {
    // ISO POINT Z (1 2 3) followed by a 2D point
    let mut data = vec![0x01, 0xE9, 0x03, 0x00, 0x00];
    for v in [1.0f64, 2.0, 3.0] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    let z_len = data.len();
    data.extend_from_slice(&POINT_NDR);

    let doc = read_wkb(&data).unwrap();
    assert_eq!(doc.geometries.len(), 2);
    match &doc.geometries[0] {
        Geometry::Other(raw) => {
            assert_eq!(raw.kind, "WKB type 1001");
            assert_eq!(raw.payload, RawPayload::Wkb(data[..z_len].to_vec()));
        },
        other => panic!("expected raw geometry, got {:?}", other),
    }
    assert_eq!(doc.geometries[1], Geometry::Point(Coordinate::new(1.0, 2.0)));

    // Raw bytes are written back verbatim
    assert_eq!(write_wkb(&doc.geometries, ByteOrder::LittleEndian).unwrap(), data);
}

#[test]
fn test_truncated_input_reports_offset() {
    let bytes = &POINT_NDR[..15];
    match read_wkb(bytes) {
        Err(ConvertError::ParseError { location, .. }) => assert_eq!(location, "byte 0"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_invalid_marker() {
    let mut data = POINT_NDR.to_vec();
    data.push(0x07);
    match read_wkb(&data) {
        Err(ConvertError::ParseError { location, .. }) => assert_eq!(location, "byte 21"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_wkt_payload_cannot_be_written() {
    let other = Geometry::Other(RawGeometry {
        kind: "GEOMETRYCOLLECTION".to_string(),
        payload: RawPayload::Wkt("GEOMETRYCOLLECTION EMPTY".to_string()),
    });
    assert!(matches!(write_wkb(&[other], ByteOrder::LittleEndian),
                     Err(ConvertError::UnsupportedGeometry(_))));
}

#[test]
fn test_deeply_nested_collection_is_rejected() {
    for depth in [MAX_NESTING_DEPTH + 1, 200_000] {
        match read_wkb(&nested_collections(depth)) {
            Err(ConvertError::ParseError { message, .. }) => assert_eq!(message, "nesting too deep"),
            other => panic!("expected parse error for depth {}, got {:?}", depth, other.map(|d| d.geometries.len())),
        }
    }
}

#[test]
fn test_nesting_up_to_limit_is_kept_raw() {
    let data = nested_collections(MAX_NESTING_DEPTH);
    let doc = read_wkb(&data).unwrap();
    assert_eq!(doc.geometries.len(), 1);
    match &doc.geometries[0] {
        Geometry::Other(raw) => assert_eq!(raw.payload, RawPayload::Wkb(data.clone())),
        other => panic!("expected raw geometry, got {:?}", other),
    }
}
