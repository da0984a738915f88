//! Tokenizer and recursive-descent parser for WKT/EWKT.
//!
//! ```text
//! text       := [ "SRID" "=" int ";" ] tagged EOF
//! tagged     := KEYWORD [ "Z" | "M" | "ZM" ] body
//! point      := EMPTY | "(" coord ")"
//! linestring := EMPTY | "(" coord { "," coord } ")"
//! polygon    := EMPTY | "(" linestring { "," linestring } ")"
//! multipoint := EMPTY | "(" ( point | coord ) { "," ( point | coord ) } ")"
//! multi*     := EMPTY | "(" member { "," member } ")"
//! collection := EMPTY | "(" tagged { "," tagged } ")"
//! coord      := number number [ number [ number ] ]
//! ```
//!
//! Malformed input is rejected, never repaired.

use crate::errors::{GeoError, GeoResult};
use crate::geometry::{
    Coordinate, Geometry, GeometryCollection, GeometryType, GeometryValue, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

const FORMAT: &str = "wkt";

/// Deepest collection nesting accepted.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
    Equals,
    Semicolon,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::Number(n) => format!("'{}'", n),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Semicolon => "';'".to_string(),
        }
    }
}

/// Which ordinate the optional 3rd number carries.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Dimension {
    Xy,
    Z,
    M,
    Zm,
}

fn tokenize(input: &str) -> GeoResult<Vec<(Token, usize)>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'(' => tokens.push((Token::LParen, start)),
            b')' => tokens.push((Token::RParen, start)),
            b',' => tokens.push((Token::Comma, start)),
            b'=' => tokens.push((Token::Equals, start)),
            b';' => tokens.push((Token::Semicolon, start)),
            b'0'..=b'9' | b'-' | b'+' | b'.' => {
                while pos < bytes.len()
                    && matches!(bytes[pos], b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
                {
                    pos += 1;
                }
                let text = &input[start..pos];
                let value = text.parse::<f64>().map_err(|_| {
                    log::error!("Invalid number '{}' in WKT", text);
                    GeoError::parse(FORMAT, format!("invalid number '{}'", text))
                })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_ascii_alphabetic() => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                    pos += 1;
                }
                let word = &input[start..pos];
                // NaN stands in for a missing ordinate
                if word.eq_ignore_ascii_case("nan") {
                    tokens.push((Token::Number(f64::NAN), start));
                } else {
                    tokens.push((Token::Word(word.to_string()), start));
                }
                continue;
            }
            _ => {
                let fragment = snippet(input, start);
                log::error!("Unexpected character in WKT near '{}'", fragment);
                return Err(GeoError::parse(
                    FORMAT,
                    format!("unexpected character near '{}'", fragment),
                ));
            }
        }
        pos += 1;
    }

    Ok(tokens)
}

/// Up to 24 characters of input starting at `offset`.
fn snippet(input: &str, offset: usize) -> String {
    input
        .get(offset..)
        .unwrap_or_default()
        .chars()
        .take(24)
        .collect()
}

/// Parses WKT or EWKT text.
///
/// Input whose leading word is not a geometry keyword fails with
/// [`GeoError::UnknownFormat`]; structural problems after a keyword match
/// fail with [`GeoError::Parse`].
pub(crate) fn parse(input: &str) -> GeoResult<Geometry> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        input,
        tokens,
        pos: 0,
        depth: 0,
    };

    let srid = parser.srid()?;
    if !parser.at_keyword() {
        let fragment = snippet(input.trim_start(), 0);
        log::error!("No WKT geometry keyword in '{}'", fragment);
        return Err(GeoError::UnknownFormat(format!(
            "no WKT geometry keyword in '{}'",
            fragment
        )));
    }

    let value = parser.tagged()?;
    if let Some((token, offset)) = parser.tokens.get(parser.pos) {
        return Err(parser.error_at(
            *offset,
            format!("unexpected {} after geometry", token.describe()),
        ));
    }
    Ok(Geometry::with_srid(value, srid))
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, offset)| *offset)
            .unwrap_or(self.input.len())
    }

    fn error_at(&self, offset: usize, message: String) -> GeoError {
        let fragment = snippet(self.input, offset);
        log::error!("WKT parse error: {} near '{}'", message, fragment);
        GeoError::parse(FORMAT, format!("{} near '{}'", message, fragment))
    }

    fn error(&self, message: String) -> GeoError {
        self.error_at(self.offset(), message)
    }

    fn expect(&mut self, expected: Token) -> GeoResult<()> {
        match self.peek() {
            Some(token) if *token == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => {
                let message = format!("expected {} but found {}", expected.describe(), token.describe());
                Err(self.error(message))
            }
            None => Err(self.error(format!("expected {} but input ended", expected.describe()))),
        }
    }

    fn peek_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(word))
    }

    fn at_keyword(&self) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if GeometryType::from_wkt_keyword(w).is_some())
    }

    /// Optional `SRID=<int>;` prefix.
    fn srid(&mut self) -> GeoResult<Option<i32>> {
        if !self.peek_word("SRID") {
            return Ok(None);
        }
        self.pos += 1;
        self.expect(Token::Equals)?;
        let srid = match self.peek() {
            Some(Token::Number(n))
                if n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64 =>
            {
                *n as i32
            }
            _ => return Err(self.error("SRID must be an integer".to_string())),
        };
        self.pos += 1;
        self.expect(Token::Semicolon)?;
        Ok(Some(srid))
    }

    /// `EMPTY` at the current position, consumed when present.
    fn empty(&mut self) -> bool {
        if self.peek_word("EMPTY") {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn dimension(&mut self) -> Dimension {
        let dimension = match self.peek() {
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("Z") => Dimension::Z,
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("M") => Dimension::M,
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("ZM") => Dimension::Zm,
            _ => return Dimension::Xy,
        };
        self.pos += 1;
        dimension
    }

    fn tagged(&mut self) -> GeoResult<GeometryValue> {
        let ty = match self.next() {
            Some(Token::Word(w)) => match GeometryType::from_wkt_keyword(&w) {
                Some(ty) => ty,
                None => {
                    self.pos -= 1;
                    return Err(self.error(format!("unknown geometry keyword '{}'", w)));
                }
            },
            Some(token) => {
                self.pos -= 1;
                return Err(self.error(format!("expected a geometry keyword, found {}", token.describe())));
            }
            None => return Err(self.error("expected a geometry keyword".to_string())),
        };

        let dim = self.dimension();
        let value = match ty {
            GeometryType::Point => GeometryValue::Point(self.point(dim)?),
            GeometryType::LineString => GeometryValue::LineString(self.line_string(dim)?),
            GeometryType::Polygon => GeometryValue::Polygon(self.polygon(dim)?),
            GeometryType::MultiPoint => GeometryValue::MultiPoint(self.multi_point(dim)?),
            GeometryType::MultiLineString => {
                GeometryValue::MultiLineString(MultiLineString::new(self.list(|p| p.line_string(dim))?))
            }
            GeometryType::MultiPolygon => {
                GeometryValue::MultiPolygon(MultiPolygon::new(self.list(|p| p.polygon(dim))?))
            }
            GeometryType::GeometryCollection => {
                GeometryValue::GeometryCollection(GeometryCollection::new(self.members()?))
            }
        };
        Ok(value)
    }

    /// Members of a collection, one level deeper than the collection itself.
    fn members(&mut self) -> GeoResult<Vec<GeometryValue>> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("geometry nested deeper than {} levels", MAX_DEPTH)));
        }
        self.depth += 1;
        let members = self.list(|p| p.tagged());
        self.depth -= 1;
        members
    }

    /// `EMPTY` or a parenthesised, comma separated list of `item`.
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> GeoResult<T>) -> GeoResult<Vec<T>> {
        if self.empty() {
            return Ok(vec![]);
        }
        self.expect(Token::LParen)?;
        let mut items = vec![item(self)?];
        while self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            items.push(item(self)?);
        }
        self.expect(Token::RParen)?;
        Ok(items)
    }

    fn coordinate(&mut self, dim: Dimension) -> GeoResult<Coordinate> {
        let mut numbers = Vec::with_capacity(4);
        while let Some(Token::Number(n)) = self.peek() {
            if numbers.len() == 4 {
                return Err(self.error("too many ordinates in coordinate".to_string()));
            }
            numbers.push(*n);
            self.pos += 1;
        }

        let mut coordinate = match numbers[..] {
            [x, y, ..] if x.is_nan() || y.is_nan() => {
                return Err(self.error("x and y must be numbers, found NaN".to_string()))
            }
            [x, y, ..] => Coordinate::new(x, y),
            _ => {
                return Err(self.error(format!(
                    "coordinate needs at least 2 numbers, found {}",
                    numbers.len()
                )))
            }
        };
        let ordinate = |v: f64| Some(v).filter(|v| !v.is_nan());
        match (dim, &numbers[2..]) {
            (_, []) => {}
            (Dimension::M, [m]) => coordinate.m = ordinate(*m),
            (_, [z]) => coordinate.z = ordinate(*z),
            (_, [z, m, ..]) => {
                coordinate.z = ordinate(*z);
                coordinate.m = ordinate(*m);
            }
        }
        Ok(coordinate)
    }

    fn point(&mut self, dim: Dimension) -> GeoResult<Point> {
        if self.empty() {
            return Ok(Point::empty());
        }
        self.expect(Token::LParen)?;
        let coordinate = self.coordinate(dim)?;
        self.expect(Token::RParen)?;
        Ok(Point::from_coordinate(coordinate))
    }

    fn line_string(&mut self, dim: Dimension) -> GeoResult<LineString> {
        let coordinates = self.list(|p| p.coordinate(dim))?;
        Ok(LineString::from_coordinates(coordinates))
    }

    fn polygon(&mut self, dim: Dimension) -> GeoResult<Polygon> {
        Ok(Polygon::new(self.list(|p| p.line_string(dim))?))
    }

    /// Members may be bare coordinates or parenthesised points.
    fn multi_point(&mut self, dim: Dimension) -> GeoResult<MultiPoint> {
        let points = self.list(|p| match p.peek() {
            Some(Token::Number(_)) => p.coordinate(dim).map(Point::from_coordinate),
            _ => p.point(dim),
        })?;
        Ok(MultiPoint::new(points))
    }
}
