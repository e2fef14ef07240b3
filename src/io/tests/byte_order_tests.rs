//! Tests for the byte order module

use std::io::Cursor;

use crate::errors::ConvertError;
use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};


#[test]
fn test_byte_order_detection() {
    let mut cursor = Cursor::new(vec![0x01u8]);
    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::LittleEndian);

    let mut cursor = Cursor::new(vec![0x00u8]);
    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut cursor = Cursor::new(vec![0x49u8]);
    assert!(ByteOrder::detect(&mut cursor).is_err());

    let mut empty = Cursor::new(Vec::<u8>::new());
    assert!(matches!(ByteOrder::detect(&mut empty), Err(ConvertError::IoError(_))));
}

#[test]
fn test_handlers_write_in_their_order() {
    let mut little = Vec::new();
    LittleEndianHandler.write_u32(&mut little, 3).unwrap();
    assert_eq!(little, vec![3, 0, 0, 0]);

    let mut big = Vec::new();
    BigEndianHandler.write_u32(&mut big, 3).unwrap();
    assert_eq!(big, vec![0, 0, 0, 3]);

    let mut cursor = Cursor::new(big);
    assert_eq!(BigEndianHandler.read_u32(&mut cursor).unwrap(), 3);
}

#[test]
fn test_f64_round_trip() {
    let handler = ByteOrder::BigEndian.create_handler();
    let mut buffer = Vec::new();
    handler.write_f64(&mut buffer, 116.3975).unwrap();
    assert_eq!(buffer.len(), 8);
    assert_eq!(handler.read_f64(&mut Cursor::new(buffer)).unwrap(), 116.3975);
}
