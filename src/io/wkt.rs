//! Well-known text (WKT) geometry codec
//!
//! One geometry per line. The six supported 2D kinds are parsed into
//! [`Geometry`] values; other keywords and dimensioned variants
//! (`POINT Z`, `GEOMETRYCOLLECTION`, ...) are kept verbatim as
//! [`Geometry::Other`].

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::coordinate::Coordinate;
use crate::errors::{ConvertError, ConvertResult};
use crate::geometry::{Geometry, LineString, Polygon, RawGeometry, RawPayload};

lazy_static! {
    // Words, numbers, punctuation; any other character is captured alone so
    // the parser can report it
    static ref TOKEN: Result<Regex, regex::Error> = Regex::new(
        r"[A-Za-z]+|[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?|[(),]|\S"
    );
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
    Invalid(String),
}

fn tokenize(text: &str) -> ConvertResult<Vec<Token>> {
    let pattern = (*TOKEN).as_ref()
        .map_err(|e| ConvertError::GenericError(format!("Invalid WKT token pattern: {}", e)))?;

    Ok(pattern.find_iter(text)
        .map(|m| {
            let s = m.as_str();
            match s {
                "(" => Token::LParen,
                ")" => Token::RParen,
                "," => Token::Comma,
                _ if s.chars().all(|c| c.is_ascii_alphabetic()) => Token::Word(s.to_uppercase()),
                _ => s.parse::<f64>()
                    .map(Token::Number)
                    .unwrap_or_else(|_| Token::Invalid(s.to_string())),
            }
        })
        .collect())
}

/// Why a line could not be turned into a supported geometry
enum Failure {
    /// Syntax error
    Malformed(String),
    /// Valid WKT that the mapper does not handle
    Unsupported,
}

type ParseResult<T> = Result<T, Failure>;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> ParseResult<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(Failure::Malformed(format!("expected {}, found {:?}", what, token))),
            None => Err(Failure::Malformed(format!("expected {}, found end of line", what))),
        }
    }

    /// Consume `EMPTY` if it is the next token
    fn empty(&mut self) -> bool {
        if matches!(self.peek(), Some(Token::Word(w)) if w == "EMPTY") {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> ParseResult<f64> {
        match self.next() {
            Some(Token::Number(v)) => Ok(v),
            Some(token) => Err(Failure::Malformed(format!("expected number, found {:?}", token))),
            None => Err(Failure::Malformed("expected number, found end of line".to_string())),
        }
    }

    fn coord(&mut self) -> ParseResult<Coordinate> {
        let x = self.number()?;
        let y = self.number()?;
        if matches!(self.peek(), Some(Token::Number(_))) {
            // Z or M ordinate without a dimension keyword
            return Err(Failure::Unsupported);
        }
        Ok(Coordinate::new(x, y))
    }

    /// `( item, item, ... )`
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> ParseResult<T>) -> ParseResult<Vec<T>> {
        self.expect(Token::LParen, "'('")?;
        let mut items = vec![item(self)?];
        loop {
            match self.next() {
                Some(Token::Comma) => items.push(item(self)?),
                Some(Token::RParen) => return Ok(items),
                Some(token) => return Err(Failure::Malformed(format!("expected ',' or ')', found {:?}", token))),
                None => return Err(Failure::Malformed("unclosed '('".to_string())),
            }
        }
    }

    fn line(&mut self) -> ParseResult<LineString> {
        if self.empty() {
            return Ok(LineString::default());
        }
        Ok(LineString(self.list(Self::coord)?))
    }

    fn polygon(&mut self) -> ParseResult<Polygon> {
        if self.empty() {
            return Ok(Polygon::default());
        }
        Ok(Polygon::new(self.list(Self::line)?))
    }

    /// Multipoint members may be written bare (`1 2`) or wrapped (`(1 2)`)
    fn multi_point_member(&mut self) -> ParseResult<Coordinate> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let coord = self.coord()?;
            self.expect(Token::RParen, "')'")?;
            Ok(coord)
        } else {
            self.coord()
        }
    }

    fn geometry(&mut self, keyword: &str) -> ParseResult<Geometry> {
        if matches!(self.peek(), Some(Token::Word(w)) if w != "EMPTY") {
            // Z, M, ZM
            return Err(Failure::Unsupported);
        }

        let geometry = match keyword {
            "POINT" => {
                if self.empty() {
                    return Err(Failure::Unsupported);
                }
                self.expect(Token::LParen, "'('")?;
                let coord = self.coord()?;
                self.expect(Token::RParen, "')'")?;
                Geometry::Point(coord)
            },
            "MULTIPOINT" => {
                if self.empty() {
                    Geometry::MultiPoint(Vec::new())
                } else {
                    Geometry::MultiPoint(self.list(Self::multi_point_member)?)
                }
            },
            "LINESTRING" => Geometry::LineString(self.line()?),
            "MULTILINESTRING" => {
                if self.empty() {
                    Geometry::MultiLineString(Vec::new())
                } else {
                    Geometry::MultiLineString(self.list(Self::line)?)
                }
            },
            "POLYGON" => Geometry::Polygon(self.polygon()?),
            "MULTIPOLYGON" => {
                if self.empty() {
                    Geometry::MultiPolygon(Vec::new())
                } else {
                    Geometry::MultiPolygon(self.list(Self::polygon)?)
                }
            },
            _ => return Err(Failure::Unsupported),
        };

        if let Some(token) = self.peek() {
            return Err(Failure::Malformed(format!("unexpected {:?} after geometry", token)));
        }

        Ok(geometry)
    }
}

/// Parse a single WKT geometry
///
/// # Arguments
/// * `text` - The WKT text
/// * `line_no` - Line number used in error messages
///
/// # Returns
/// The geometry, `Geometry::Other` for valid but unsupported kinds, or a
/// parse error
pub fn parse_wkt(text: &str, line_no: usize) -> ConvertResult<Geometry> {
    let text = text.trim();
    let location = format!("line {}", line_no);
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
    };

    if let Some(Token::Invalid(s)) = parser.tokens.iter().find(|t| matches!(t, Token::Invalid(_))) {
        return Err(ConvertError::parse(location, format!("unexpected character '{}'", s)));
    }

    let keyword = match parser.next() {
        Some(Token::Word(word)) => word,
        Some(token) => return Err(ConvertError::parse(location, format!("expected geometry keyword, found {:?}", token))),
        None => return Err(ConvertError::parse(location, "empty geometry text")),
    };

    match parser.geometry(&keyword) {
        Ok(geometry) => Ok(geometry),
        Err(Failure::Unsupported) => {
            debug!("Keeping unsupported WKT '{}' on {} as is", keyword, location);
            Ok(Geometry::Other(RawGeometry {
                kind: keyword,
                payload: RawPayload::Wkt(text.to_string()),
            }))
        },
        Err(Failure::Malformed(message)) => Err(ConvertError::parse(location, message)),
    }
}

/// Parse a WKT document with one geometry per line
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_wkt(content: &str) -> ConvertResult<Vec<Geometry>> {
    content.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| parse_wkt(line, i + 1))
        .collect()
}

/// Formats geometries as WKT
#[derive(Debug, Clone, Copy, Default)]
pub struct WktWriter {
    /// Fixed number of decimal places; full precision when None
    precision: Option<usize>,
}

impl WktWriter {
    /// Create a writer with optional fixed precision
    pub fn new(precision: Option<usize>) -> Self {
        WktWriter { precision }
    }

    /// Format one geometry
    ///
    /// `Other` geometries read from WKT are emitted verbatim; those read from
    /// WKB produce an error, as do NaN or infinite ordinates, which WKT has
    /// no token for.
    pub fn format(&self, geometry: &Geometry) -> ConvertResult<String> {
        let text = match geometry {
            Geometry::Point(coord) => format!("POINT ({})", self.coord(coord)?),
            Geometry::MultiPoint(points) => {
                if points.is_empty() {
                    "MULTIPOINT EMPTY".to_string()
                } else {
                    let members = points.iter()
                        .map(|p| Ok(format!("({})", self.coord(p)?)))
                        .collect::<ConvertResult<Vec<String>>>()?;
                    format!("MULTIPOINT ({})", members.join(", "))
                }
            },
            Geometry::LineString(line) => format!("LINESTRING {}", self.line(line)?),
            Geometry::MultiLineString(lines) => {
                let members = lines.iter().map(|l| self.line(l)).collect::<ConvertResult<_>>()?;
                format!("MULTILINESTRING {}", self.group(members))
            },
            Geometry::Polygon(polygon) => format!("POLYGON {}", self.polygon(polygon)?),
            Geometry::MultiPolygon(polygons) => {
                let members = polygons.iter().map(|p| self.polygon(p)).collect::<ConvertResult<_>>()?;
                format!("MULTIPOLYGON {}", self.group(members))
            },
            Geometry::Other(raw) => match &raw.payload {
                RawPayload::Wkt(text) => text.clone(),
                RawPayload::Wkb(_) => {
                    return Err(ConvertError::UnsupportedGeometry(format!(
                        "{} read from WKB cannot be written as WKT", raw.kind
                    )))
                }
            },
        };

        Ok(text)
    }

    /// Format geometries one per line
    pub fn write_all(&self, geometries: &[Geometry]) -> ConvertResult<String> {
        let mut out = String::new();
        for geometry in geometries {
            out.push_str(&self.format(geometry)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn number(&self, value: f64) -> ConvertResult<String> {
        if !value.is_finite() {
            return Err(ConvertError::UnsupportedGeometry(format!(
                "Non-finite ordinate {} cannot be written as WKT", value
            )));
        }
        Ok(match self.precision {
            Some(places) => format!("{:.*}", places, value),
            None => format!("{}", value),
        })
    }

    fn coord(&self, coord: &Coordinate) -> ConvertResult<String> {
        Ok(format!("{} {}", self.number(coord.x)?, self.number(coord.y)?))
    }

    fn line(&self, line: &LineString) -> ConvertResult<String> {
        if line.is_empty() {
            return Ok("EMPTY".to_string());
        }
        let coords = line.coords().iter()
            .map(|c| self.coord(c))
            .collect::<ConvertResult<Vec<String>>>()?;
        Ok(format!("({})", coords.join(", ")))
    }

    fn polygon(&self, polygon: &Polygon) -> ConvertResult<String> {
        let rings = polygon.rings.iter().map(|r| self.line(r)).collect::<ConvertResult<_>>()?;
        Ok(self.group(rings))
    }

    fn group(&self, members: Vec<String>) -> String {
        if members.is_empty() {
            "EMPTY".to_string()
        } else {
            format!("({})", members.join(", "))
        }
    }
}

/// Format geometries as a WKT document
pub fn write_wkt(geometries: &[Geometry], precision: Option<usize>) -> ConvertResult<String> {
    WktWriter::new(precision).write_all(geometries)
}
