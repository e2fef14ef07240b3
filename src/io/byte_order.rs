//! Byte order handling for WKB data
//!
//! This module implements the Strategy pattern for handling the two
//! byte orders a well-known binary geometry may be encoded in.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Result, Write};

use crate::errors::{ConvertError, ConvertResult};

/// Represents the byte order of a WKB geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Little-endian byte order (NDR, marker 0x01)
    #[default]
    LittleEndian,
    /// Big-endian byte order (XDR, marker 0x00)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the leading marker byte of a geometry
    pub fn detect(reader: &mut dyn Read) -> ConvertResult<Self> {
        let marker = reader.read_u8()?;
        Self::from_marker(marker)
    }

    /// Maps a marker byte to a byte order
    pub fn from_marker(marker: u8) -> ConvertResult<Self> {
        match marker {
            0x01 => Ok(ByteOrder::LittleEndian),
            0x00 => Ok(ByteOrder::BigEndian),
            _ => Err(ConvertError::parse("byte order marker", format!("invalid marker {:#04x}", marker))),
        }
    }

    /// The marker byte written in front of a geometry
    pub fn marker(&self) -> u8 {
        match self {
            ByteOrder::LittleEndian => 0x01,
            ByteOrder::BigEndian => 0x00,
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (NDR)",
            ByteOrder::BigEndian => "Big Endian (XDR)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32>;

    /// Read an f64 value
    fn read_f64(&self, reader: &mut dyn Read) -> Result<f64>;

    /// Write a u32 value
    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()>;

    /// Write an f64 value
    fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn Read) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }

    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()> {
        writer.write_u32::<LittleEndian>(value)
    }

    fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()> {
        writer.write_f64::<LittleEndian>(value)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn Read) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }

    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()> {
        writer.write_u32::<BigEndian>(value)
    }

    fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()> {
        writer.write_f64::<BigEndian>(value)
    }
}
