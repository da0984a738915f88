//! Well-Known Binary and PostGIS extended WKB.
//!
//! Both flavours read either byte order, ISO type codes (`+1000` Z, `+2000`
//! M, `+3000` ZM) and EWKB flag bits. Output is little endian; plain WKB
//! uses ISO codes and EWKB uses flag bits with the SRID when one is set.

use crate::codec::{text_input, GeoCodecProvider};
use crate::errors::{GeoError, GeoResult};
use crate::format::{Encoded, Format, FormatArgs};
use crate::geometry::{
    Coordinate, Geometry, GeometryType, GeometryValue, LineString, Point, Polygon,
};

const BIG_ENDIAN: u8 = 0;
const LITTLE_ENDIAN: u8 = 1;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;
const EWKB_FLAGS: u32 = EWKB_Z | EWKB_M | EWKB_SRID;

/// Nesting deeper than this is rejected as malformed.
const MAX_DEPTH: usize = 64;

/// Binary codec for WKB (ISO) or EWKB output.
///
/// With the `hex` argument the input is hex text and the output is upper
/// case hex text instead of bytes.
pub struct WkbCodec {
    extended: bool,
}

impl WkbCodec {
    pub fn new() -> Self {
        WkbCodec { extended: false }
    }

    pub fn extended() -> Self {
        WkbCodec { extended: true }
    }

    fn format_name(&self) -> &'static str {
        self.format().as_str()
    }

    /// Decodes one WKB geometry occupying all of `bytes`.
    pub fn read_bytes(&self, bytes: &[u8]) -> GeoResult<Geometry> {
        let mut reader = WkbReader {
            bytes,
            position: 0,
            format: self.format_name(),
        };
        let (value, srid) = reader.geometry(0)?;
        if reader.position != bytes.len() {
            log::error!(
                "{} bytes left after the geometry",
                bytes.len() - reader.position
            );
            return Err(GeoError::parse(
                self.format_name(),
                format!("{} trailing bytes", bytes.len() - reader.position),
            ));
        }
        Ok(Geometry::with_srid(value, srid))
    }

    /// Decodes hex text such as `0101000000...`.
    pub fn read_hex(&self, text: &str) -> GeoResult<Geometry> {
        let bytes = hex::decode(text.trim()).map_err(|e| {
            log::error!("Invalid hex {} input: {}", self.format_name(), e);
            GeoError::parse(self.format_name(), format!("invalid hex: {}", e))
        })?;
        self.read_bytes(&bytes)
    }

    pub fn write_bytes(&self, geometry: &Geometry) -> Vec<u8> {
        let mut writer = WkbWriter {
            out: Vec::new(),
            extended: self.extended,
        };
        let srid = if self.extended { geometry.srid() } else { None };
        writer.geometry(geometry.value(), srid);
        writer.out
    }

    pub fn write_hex(&self, geometry: &Geometry) -> String {
        hex::encode_upper(self.write_bytes(geometry))
    }
}

impl Default for WkbCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoCodecProvider for WkbCodec {
    fn format(&self) -> Format {
        if self.extended {
            Format::Ewkb
        } else {
            Format::Wkb
        }
    }

    fn read(&self, raw: &[u8], args: &FormatArgs) -> GeoResult<Geometry> {
        if args.hex {
            self.read_hex(text_input(raw, self.format())?)
        } else {
            self.read_bytes(raw)
        }
    }

    fn write(&self, geometry: &Geometry, args: &FormatArgs) -> GeoResult<Option<Encoded>> {
        Ok(Some(if args.hex {
            Encoded::Text(self.write_hex(geometry))
        } else {
            Encoded::Binary(self.write_bytes(geometry))
        }))
    }
}

/// Type word split into its parts.
struct Header {
    ty: GeometryType,
    has_z: bool,
    has_m: bool,
    srid: Option<i32>,
}

struct WkbReader<'a> {
    bytes: &'a [u8],
    position: usize,
    format: &'static str,
}

impl WkbReader<'_> {
    fn error(&self, message: impl Into<String>) -> GeoError {
        let message = message.into();
        log::error!("Invalid {} at byte {}: {}", self.format, self.position, message);
        GeoError::parse(self.format, format!("{} at byte {}", message, self.position))
    }

    fn take<const N: usize>(&mut self) -> GeoResult<[u8; N]> {
        let end = self.position + N;
        let chunk = self
            .bytes
            .get(self.position..end)
            .ok_or_else(|| self.error("unexpected end of input"))?;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        self.position = end;
        Ok(out)
    }

    fn u32(&mut self, little: bool) -> GeoResult<u32> {
        let bytes = self.take::<4>()?;
        Ok(if little {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    fn f64(&mut self, little: bool) -> GeoResult<f64> {
        let bytes = self.take::<8>()?;
        Ok(if little {
            f64::from_le_bytes(bytes)
        } else {
            f64::from_be_bytes(bytes)
        })
    }

    /// A count, checked against the bytes left so a bogus length cannot
    /// trigger a huge allocation.
    fn count(&mut self, little: bool, min_item_size: usize) -> GeoResult<usize> {
        let count = self.u32(little)? as usize;
        let remaining = self.bytes.len() - self.position;
        if count.saturating_mul(min_item_size) > remaining {
            return Err(self.error(format!("count {} exceeds the remaining input", count)));
        }
        Ok(count)
    }

    fn header(&mut self, little: bool) -> GeoResult<Header> {
        let word = self.u32(little)?;
        let code = word & !EWKB_FLAGS;
        let (dims, base) = (code / 1000, code % 1000);

        let ty = match base {
            1 => GeometryType::Point,
            2 => GeometryType::LineString,
            3 => GeometryType::Polygon,
            4 => GeometryType::MultiPoint,
            5 => GeometryType::MultiLineString,
            6 => GeometryType::MultiPolygon,
            7 => GeometryType::GeometryCollection,
            other => return Err(self.error(format!("unknown geometry type {}", other))),
        };
        if dims > 3 {
            return Err(self.error(format!("unknown dimension code {}", code)));
        }

        let srid = if word & EWKB_SRID != 0 {
            Some(self.u32(little)? as i32)
        } else {
            None
        };

        Ok(Header {
            ty,
            has_z: word & EWKB_Z != 0 || dims == 1 || dims == 3,
            has_m: word & EWKB_M != 0 || dims == 2 || dims == 3,
            srid,
        })
    }

    fn geometry(&mut self, depth: usize) -> GeoResult<(GeometryValue, Option<i32>)> {
        if depth > MAX_DEPTH {
            return Err(self.error("geometry nested too deeply"));
        }
        let little = match self.take::<1>()?[0] {
            LITTLE_ENDIAN => true,
            BIG_ENDIAN => false,
            other => return Err(self.error(format!("invalid byte order {}", other))),
        };
        let header = self.header(little)?;
        let ordinates = 2 + header.has_z as usize + header.has_m as usize;
        let point_size = ordinates * 8;

        let value = match header.ty {
            GeometryType::Point => self.point(little, &header)?.into(),
            GeometryType::LineString => self.line(little, &header, point_size)?.into(),
            GeometryType::Polygon => {
                let rings = self.count(little, 4)?;
                let mut lines = Vec::with_capacity(rings);
                for _ in 0..rings {
                    lines.push(self.line(little, &header, point_size)?);
                }
                Polygon::new(lines).into()
            }
            ty => {
                // smallest member: byte order, type word, and a count or point
                let members = self.count(little, 9)?;
                let mut components = Vec::with_capacity(members);
                for _ in 0..members {
                    components.push(self.geometry(depth + 1)?.0);
                }
                GeometryValue::collect(ty, components)
                    .map_err(|e| self.error(e.to_string()))?
            }
        };
        Ok((value, header.srid))
    }

    /// All-NaN ordinates encode the empty point.
    fn point(&mut self, little: bool, header: &Header) -> GeoResult<Point> {
        let x = self.f64(little)?;
        let y = self.f64(little)?;
        let z = if header.has_z { Some(self.f64(little)?) } else { None };
        let m = if header.has_m { Some(self.f64(little)?) } else { None };

        if x.is_nan() && y.is_nan() {
            return Ok(Point::empty());
        }
        let mut coordinate = Coordinate::new(x, y);
        coordinate.z = z.filter(|v| !v.is_nan());
        coordinate.m = m.filter(|v| !v.is_nan());
        Ok(Point::from_coordinate(coordinate))
    }

    fn line(&mut self, little: bool, header: &Header, point_size: usize) -> GeoResult<LineString> {
        let count = self.count(little, point_size)?;
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            points.push(self.point(little, header)?);
        }
        Ok(LineString::new(points))
    }
}

struct WkbWriter {
    out: Vec<u8>,
    extended: bool,
}

impl WkbWriter {
    fn u32(&mut self, value: u32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    fn f64(&mut self, value: f64) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    fn count(&mut self, count: usize) {
        self.u32(count as u32);
    }

    fn geometry(&mut self, value: &GeometryValue, srid: Option<i32>) {
        let (has_z, has_m) = (value.has_z(), value.has_m());
        let code = match value.geometry_type() {
            GeometryType::Point => 1,
            GeometryType::LineString => 2,
            GeometryType::Polygon => 3,
            GeometryType::MultiPoint => 4,
            GeometryType::MultiLineString => 5,
            GeometryType::MultiPolygon => 6,
            GeometryType::GeometryCollection => 7,
        };

        let word = if self.extended {
            let mut word = code;
            if has_z {
                word |= EWKB_Z;
            }
            if has_m {
                word |= EWKB_M;
            }
            if srid.is_some() {
                word |= EWKB_SRID;
            }
            word
        } else {
            code + match (has_z, has_m) {
                (true, true) => 3000,
                (true, false) => 1000,
                (false, true) => 2000,
                (false, false) => 0,
            }
        };

        self.out.push(LITTLE_ENDIAN);
        self.u32(word);
        if let (true, Some(srid)) = (self.extended, srid) {
            self.u32(srid as u32);
        }

        match value {
            GeometryValue::Point(p) => self.point(p, has_z, has_m),
            GeometryValue::LineString(l) => self.line(l, has_z, has_m),
            GeometryValue::Polygon(p) => {
                self.count(p.rings().len());
                for ring in p.rings() {
                    self.line(ring, has_z, has_m);
                }
            }
            GeometryValue::MultiPoint(mp) => {
                self.count(mp.len());
                for point in mp.points() {
                    self.geometry(&point.clone().into(), None);
                }
            }
            GeometryValue::MultiLineString(mls) => {
                self.count(mls.len());
                for line in mls.lines() {
                    self.geometry(&line.clone().into(), None);
                }
            }
            GeometryValue::MultiPolygon(mp) => {
                self.count(mp.len());
                for polygon in mp.polygons() {
                    self.geometry(&polygon.clone().into(), None);
                }
            }
            GeometryValue::GeometryCollection(gc) => {
                self.count(gc.len());
                for member in gc.geometries() {
                    self.geometry(member, None);
                }
            }
        }
    }

    fn point(&mut self, point: &Point, has_z: bool, has_m: bool) {
        let c = point.coordinate();
        self.f64(c.map_or(f64::NAN, |c| c.x));
        self.f64(c.map_or(f64::NAN, |c| c.y));
        if has_z {
            self.f64(c.and_then(|c| c.z).unwrap_or(f64::NAN));
        }
        if has_m {
            self.f64(c.and_then(|c| c.m).unwrap_or(f64::NAN));
        }
    }

    fn line(&mut self, line: &LineString, has_z: bool, has_m: bool) {
        self.count(line.num_points());
        for point in line.points() {
            self.point(point, has_z, has_m);
        }
    }
}
