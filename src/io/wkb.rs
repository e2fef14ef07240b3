//! Well-known binary (WKB) geometry codec
//!
//! Reads and writes a stream of concatenated 2D OGC WKB geometries. Type
//! codes 1 to 6 are decoded into [`Geometry`] values; anything else is kept as
//! raw bytes in [`Geometry::Other`] so that it can be written back unchanged.

use std::io::Cursor;
use log::{debug, warn};

use super::byte_order::{ByteOrder, ByteOrderHandler};
use crate::coordinate::Coordinate;
use crate::errors::{ConvertError, ConvertResult};
use crate::geometry::{Geometry, LineString, Polygon, RawGeometry, RawPayload};

/// OGC WKB geometry type codes
pub mod type_codes {
    pub const POINT: u32 = 1;
    pub const LINE_STRING: u32 = 2;
    pub const POLYGON: u32 = 3;
    pub const MULTI_POINT: u32 = 4;
    pub const MULTI_LINE_STRING: u32 = 5;
    pub const MULTI_POLYGON: u32 = 6;
    pub const GEOMETRY_COLLECTION: u32 = 7;
}

// EWKB flag bits
const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Deepest collection nesting accepted when skipping unsupported geometries
pub const MAX_NESTING_DEPTH: usize = 64;

const NESTING_TOO_DEEP: &str = "nesting too deep";

/// Geometries decoded from a WKB stream
#[derive(Debug, Clone, PartialEq)]
pub struct WkbDocument {
    /// Decoded geometries in stream order
    pub geometries: Vec<Geometry>,
    /// Byte order of the first geometry, used when writing the result back
    pub byte_order: ByteOrder,
}

/// Decoder for concatenated WKB geometries
pub struct WkbReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> WkbReader<'a> {
    /// Create a reader over a byte buffer
    pub fn new(data: &'a [u8]) -> Self {
        WkbReader {
            cursor: Cursor::new(data),
        }
    }

    /// Decode every geometry in the buffer
    ///
    /// # Returns
    /// The decoded geometries, or a parse error naming the byte offset of the
    /// geometry that could not be read
    pub fn read_all(mut self) -> ConvertResult<WkbDocument> {
        let mut geometries = Vec::new();
        let mut byte_order = None;

        while !self.at_end() {
            let start = self.position();
            let (geometry, order) = self.read_geometry()?;
            debug!("Decoded {} at byte {}", geometry, start);

            if byte_order.is_none() {
                byte_order = Some(order);
            } else if byte_order != Some(order) {
                warn!("Geometry at byte {} uses {}, output will use the first geometry's byte order",
                      start, order.name());
            }
            geometries.push(geometry);
        }

        Ok(WkbDocument {
            geometries,
            byte_order: byte_order.unwrap_or_default(),
        })
    }

    fn data(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    fn at_end(&self) -> bool {
        self.position() >= self.data().len()
    }

    fn eof(&self, start: usize) -> ConvertError {
        ConvertError::parse(format!("byte {}", start), "unexpected end of data")
    }

    /// Read one top-level geometry, keeping unsupported kinds as raw bytes
    fn read_geometry(&mut self) -> ConvertResult<(Geometry, ByteOrder)> {
        let start = self.position();
        let (order, handler, code) = self.read_header()?;

        let geometry = match code {
            type_codes::POINT => Geometry::Point(self.read_coord(handler.as_ref(), start)?),
            type_codes::LINE_STRING => Geometry::LineString(self.read_line(handler.as_ref(), start)?),
            type_codes::POLYGON => Geometry::Polygon(self.read_polygon(handler.as_ref(), start)?),
            type_codes::MULTI_POINT => {
                let count = self.read_count(handler.as_ref(), start)?;
                let mut points = Vec::new();
                for _ in 0..count {
                    let part_start = self.position();
                    let part_handler = self.read_part_header(type_codes::POINT)?;
                    points.push(self.read_coord(part_handler.as_ref(), part_start)?);
                }
                Geometry::MultiPoint(points)
            },
            type_codes::MULTI_LINE_STRING => {
                let count = self.read_count(handler.as_ref(), start)?;
                let mut lines = Vec::new();
                for _ in 0..count {
                    let part_start = self.position();
                    let part_handler = self.read_part_header(type_codes::LINE_STRING)?;
                    lines.push(self.read_line(part_handler.as_ref(), part_start)?);
                }
                Geometry::MultiLineString(lines)
            },
            type_codes::MULTI_POLYGON => {
                let count = self.read_count(handler.as_ref(), start)?;
                let mut polygons = Vec::new();
                for _ in 0..count {
                    let part_start = self.position();
                    let part_handler = self.read_part_header(type_codes::POLYGON)?;
                    polygons.push(self.read_polygon(part_handler.as_ref(), part_start)?);
                }
                Geometry::MultiPolygon(polygons)
            },
            _ => {
                let end = match self.skip_body(handler.as_ref(), code, start, 0) {
                    Ok(()) => self.position(),
                    Err(ConvertError::ParseError { location, message }) if message == NESTING_TOO_DEEP => {
                        return Err(ConvertError::ParseError { location, message });
                    },
                    Err(e) => {
                        warn!("Cannot determine the extent of WKB type {} at byte {} ({}), keeping the remaining data as one geometry",
                              code, start, e);
                        self.data().len()
                    }
                };
                self.cursor.set_position(end as u64);

                Geometry::Other(RawGeometry {
                    kind: format!("WKB type {}", code),
                    payload: RawPayload::Wkb(self.data()[start..end].to_vec()),
                })
            },
        };

        Ok((geometry, order))
    }

    fn read_header(&mut self) -> ConvertResult<(ByteOrder, Box<dyn ByteOrderHandler>, u32)> {
        let start = self.position();
        let order = ByteOrder::detect(&mut self.cursor)
            .map_err(|e| match e {
                ConvertError::IoError(_) => self.eof(start),
                ConvertError::ParseError { message, .. } => ConvertError::parse(format!("byte {}", start), message),
                other => other,
            })?;
        let handler = order.create_handler();
        let code = handler.read_u32(&mut self.cursor).map_err(|_| self.eof(start))?;
        Ok((order, handler, code))
    }

    fn read_part_header(&mut self, expected: u32) -> ConvertResult<Box<dyn ByteOrderHandler>> {
        let start = self.position();
        let (_, handler, code) = self.read_header()?;
        if code != expected {
            return Err(ConvertError::parse(
                format!("byte {}", start),
                format!("expected WKB type {} inside multi-geometry, found {}", expected, code),
            ));
        }
        Ok(handler)
    }

    fn read_count(&mut self, handler: &dyn ByteOrderHandler, start: usize) -> ConvertResult<usize> {
        let count = handler.read_u32(&mut self.cursor).map_err(|_| self.eof(start))? as usize;
        Ok(count)
    }

    fn read_f64(&mut self, handler: &dyn ByteOrderHandler, start: usize) -> ConvertResult<f64> {
        handler.read_f64(&mut self.cursor).map_err(|_| self.eof(start))
    }

    fn read_coord(&mut self, handler: &dyn ByteOrderHandler, start: usize) -> ConvertResult<Coordinate> {
        let x = self.read_f64(handler, start)?;
        let y = self.read_f64(handler, start)?;
        Ok(Coordinate::new(x, y))
    }

    fn read_line(&mut self, handler: &dyn ByteOrderHandler, start: usize) -> ConvertResult<LineString> {
        let count = self.read_count(handler, start)?;
        let mut coords = Vec::new();
        for _ in 0..count {
            coords.push(self.read_coord(handler, start)?);
        }
        Ok(LineString(coords))
    }

    fn read_polygon(&mut self, handler: &dyn ByteOrderHandler, start: usize) -> ConvertResult<Polygon> {
        let count = self.read_count(handler, start)?;
        let mut rings = Vec::new();
        for _ in 0..count {
            rings.push(self.read_line(handler, start)?);
        }
        Ok(Polygon { rings })
    }

    fn skip(&mut self, bytes: usize, start: usize) -> ConvertResult<()> {
        let target = self.position() + bytes;
        if target > self.data().len() {
            return Err(self.eof(start));
        }
        self.cursor.set_position(target as u64);
        Ok(())
    }

    /// Advance past the body of a geometry whose header has been read
    ///
    /// Understands ISO (1000/2000/3000 offsets) and EWKB (flag bits) Z/M
    /// variants of the seven OGC types. Collections nested deeper than
    /// [`MAX_NESTING_DEPTH`] are rejected.
    fn skip_body(&mut self, handler: &dyn ByteOrderHandler, code: u32, start: usize, depth: usize) -> ConvertResult<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ConvertError::parse(format!("byte {}", start), NESTING_TOO_DEEP));
        }

        let mut dims = 2;
        if code & EWKB_Z != 0 {
            dims += 1;
        }
        if code & EWKB_M != 0 {
            dims += 1;
        }
        if code & EWKB_SRID != 0 {
            self.skip(4, start)?;
        }

        let iso = code & 0x0FFF_FFFF;
        dims += match iso / 1000 {
            0 => 0,
            1 | 2 => 1,
            3 => 2,
            _ => return Err(ConvertError::parse(format!("byte {}", start), format!("unknown WKB type {}", code))),
        };
        let coord_size = 8 * dims;

        match iso % 1000 {
            type_codes::POINT => self.skip(coord_size, start),
            type_codes::LINE_STRING => {
                let count = self.read_count(handler, start)?;
                self.skip(count.saturating_mul(coord_size), start)
            },
            type_codes::POLYGON => {
                let rings = self.read_count(handler, start)?;
                for _ in 0..rings {
                    let count = self.read_count(handler, start)?;
                    self.skip(count.saturating_mul(coord_size), start)?;
                }
                Ok(())
            },
            type_codes::MULTI_POINT
            | type_codes::MULTI_LINE_STRING
            | type_codes::MULTI_POLYGON
            | type_codes::GEOMETRY_COLLECTION => {
                let parts = self.read_count(handler, start)?;
                for _ in 0..parts {
                    let part_start = self.position();
                    let (_, part_handler, part_code) = self.read_header()?;
                    self.skip_body(part_handler.as_ref(), part_code, part_start, depth + 1)?;
                }
                Ok(())
            },
            _ => Err(ConvertError::parse(format!("byte {}", start), format!("unknown WKB type {}", code))),
        }
    }
}

/// Decode a buffer of concatenated WKB geometries
pub fn read_wkb(data: &[u8]) -> ConvertResult<WkbDocument> {
    WkbReader::new(data).read_all()
}

/// Encoder for WKB geometries
pub struct WkbWriter {
    byte_order: ByteOrder,
    handler: Box<dyn ByteOrderHandler>,
}

impl WkbWriter {
    /// Create a writer producing the given byte order
    pub fn new(byte_order: ByteOrder) -> Self {
        WkbWriter {
            byte_order,
            handler: byte_order.create_handler(),
        }
    }

    /// Append one geometry to the buffer
    ///
    /// `Other` geometries decoded from WKB are copied verbatim, in their
    /// original byte order. `Other` geometries that came from WKT cannot be
    /// encoded and produce an error.
    pub fn write_geometry(&self, buf: &mut Vec<u8>, geometry: &Geometry) -> ConvertResult<()> {
        match geometry {
            Geometry::Point(coord) => {
                self.write_header(buf, type_codes::POINT)?;
                self.write_coord(buf, coord)?;
            },
            Geometry::LineString(line) => {
                self.write_header(buf, type_codes::LINE_STRING)?;
                self.write_line(buf, line)?;
            },
            Geometry::Polygon(polygon) => {
                self.write_header(buf, type_codes::POLYGON)?;
                self.write_polygon(buf, polygon)?;
            },
            Geometry::MultiPoint(points) => {
                self.write_header(buf, type_codes::MULTI_POINT)?;
                self.write_count(buf, points.len())?;
                for point in points {
                    self.write_header(buf, type_codes::POINT)?;
                    self.write_coord(buf, point)?;
                }
            },
            Geometry::MultiLineString(lines) => {
                self.write_header(buf, type_codes::MULTI_LINE_STRING)?;
                self.write_count(buf, lines.len())?;
                for line in lines {
                    self.write_header(buf, type_codes::LINE_STRING)?;
                    self.write_line(buf, line)?;
                }
            },
            Geometry::MultiPolygon(polygons) => {
                self.write_header(buf, type_codes::MULTI_POLYGON)?;
                self.write_count(buf, polygons.len())?;
                for polygon in polygons {
                    self.write_header(buf, type_codes::POLYGON)?;
                    self.write_polygon(buf, polygon)?;
                }
            },
            Geometry::Other(raw) => match &raw.payload {
                RawPayload::Wkb(bytes) => buf.extend_from_slice(bytes),
                RawPayload::Wkt(_) => {
                    return Err(ConvertError::UnsupportedGeometry(format!(
                        "{} read from WKT cannot be written as WKB", raw.kind
                    )))
                }
            },
        }

        Ok(())
    }

    /// Encode a list of geometries into one buffer
    pub fn write_all(&self, geometries: &[Geometry]) -> ConvertResult<Vec<u8>> {
        let mut buf = Vec::new();
        for geometry in geometries {
            self.write_geometry(&mut buf, geometry)?;
        }
        Ok(buf)
    }

    fn write_header(&self, buf: &mut Vec<u8>, code: u32) -> ConvertResult<()> {
        buf.push(self.byte_order.marker());
        self.handler.write_u32(buf, code)?;
        Ok(())
    }

    fn write_count(&self, buf: &mut Vec<u8>, count: usize) -> ConvertResult<()> {
        let count = u32::try_from(count)
            .map_err(|_| ConvertError::UnsupportedGeometry(format!("{} elements exceed the WKB limit", count)))?;
        self.handler.write_u32(buf, count)?;
        Ok(())
    }

    fn write_coord(&self, buf: &mut Vec<u8>, coord: &Coordinate) -> ConvertResult<()> {
        self.handler.write_f64(buf, coord.x)?;
        self.handler.write_f64(buf, coord.y)?;
        Ok(())
    }

    fn write_line(&self, buf: &mut Vec<u8>, line: &LineString) -> ConvertResult<()> {
        self.write_count(buf, line.len())?;
        for coord in line.coords() {
            self.write_coord(buf, coord)?;
        }
        Ok(())
    }

    fn write_polygon(&self, buf: &mut Vec<u8>, polygon: &Polygon) -> ConvertResult<()> {
        self.write_count(buf, polygon.rings.len())?;
        for ring in &polygon.rings {
            self.write_line(buf, ring)?;
        }
        Ok(())
    }
}

/// Encode geometries as concatenated WKB
pub fn write_wkb(geometries: &[Geometry], byte_order: ByteOrder) -> ConvertResult<Vec<u8>> {
    WkbWriter::new(byte_order).write_all(geometries)
}
