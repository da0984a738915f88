//! Well-Known Text and its extended (`SRID=<n>;`) variant.

use std::fmt::Write;

use crate::codec::{text_input, wkt_parser, GeoCodecProvider};
use crate::config::GeoConfig;
use crate::errors::GeoResult;
use crate::format::{Encoded, Format, FormatArgs};
use crate::geometry::{Coordinate, Geometry, GeometryValue, LineString, Point, Polygon};

/// Reads WKT/EWKT text; writes WKT, or EWKT when `extended`.
///
/// Both flavours accept an `SRID=` prefix on input. Parsing and writing are
/// handed to the acceleration engine when it implements them.
pub struct WktCodec {
    config: GeoConfig,
    extended: bool,
}

impl WktCodec {
    pub fn new(config: GeoConfig) -> Self {
        WktCodec {
            config,
            extended: false,
        }
    }

    pub fn extended(config: GeoConfig) -> Self {
        WktCodec {
            config,
            extended: true,
        }
    }

    /// Parses a WKT or EWKT string.
    pub fn read_str(&self, text: &str) -> GeoResult<Geometry> {
        if let Some(engine) = self.config.active_engine() {
            if let Some(result) = engine.parse_wkt(text) {
                log::debug!("WKT parsed by engine {}", engine.name());
                return result;
            }
        }
        wkt_parser::parse(text)
    }

    /// Writes a geometry, always succeeding: WKT can express emptiness.
    pub fn write_string(&self, geometry: &Geometry) -> String {
        let wkt = self
            .config
            .active_engine()
            .and_then(|engine| engine.write_wkt(geometry))
            .unwrap_or_else(|| write_value(geometry.value()));

        match geometry.srid() {
            Some(srid) if self.extended => format!("SRID={};{}", srid, wkt),
            _ => wkt,
        }
    }
}

impl GeoCodecProvider for WktCodec {
    fn format(&self) -> Format {
        if self.extended {
            Format::Ewkt
        } else {
            Format::Wkt
        }
    }

    fn read(&self, raw: &[u8], _args: &FormatArgs) -> GeoResult<Geometry> {
        self.read_str(text_input(raw, self.format())?)
    }

    fn write(&self, geometry: &Geometry, _args: &FormatArgs) -> GeoResult<Option<Encoded>> {
        Ok(Some(Encoded::Text(self.write_string(geometry))))
    }
}

/// Plain WKT for a geometry value.
pub fn write_value(value: &GeometryValue) -> String {
    let mut out = String::new();
    write_tagged(&mut out, value);
    out
}

/// EWKT: the SRID prefix when present, then plain WKT.
pub fn write_ewkt(geometry: &Geometry) -> String {
    match geometry.srid() {
        Some(srid) => format!("SRID={};{}", srid, write_value(geometry.value())),
        None => write_value(geometry.value()),
    }
}

fn write_tagged(out: &mut String, value: &GeometryValue) {
    out.push_str(value.geometry_type().wkt_keyword());
    let tag = Tag {
        z: value.has_z(),
        m: value.has_m(),
    };
    match (tag.z, tag.m) {
        (true, true) => out.push_str(" ZM"),
        (true, false) => out.push_str(" Z"),
        (false, true) => out.push_str(" M"),
        (false, false) => {}
    }
    out.push(' ');

    let point = |out: &mut String, p: &Point| write_point(out, p, tag);
    let line = |out: &mut String, l: &LineString| write_line(out, l, tag);
    let polygon = |out: &mut String, p: &Polygon| write_polygon(out, p, tag);
    match value {
        GeometryValue::Point(p) => point(out, p),
        GeometryValue::LineString(l) => line(out, l),
        GeometryValue::Polygon(p) => polygon(out, p),
        GeometryValue::MultiPoint(mp) => write_list(out, mp.points(), point),
        GeometryValue::MultiLineString(mls) => write_list(out, mls.lines(), line),
        GeometryValue::MultiPolygon(mp) => write_list(out, mp.polygons(), polygon),
        GeometryValue::GeometryCollection(gc) => write_list(out, gc.geometries(), write_tagged),
    }
}

/// Ordinates announced by a geometry's dimension tag.
#[derive(Clone, Copy)]
struct Tag {
    z: bool,
    m: bool,
}

/// `EMPTY`, or the items comma separated inside one paren level.
fn write_list<T>(out: &mut String, items: &[T], mut write_item: impl FnMut(&mut String, &T)) {
    if items.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_item(out, item);
    }
    out.push(')');
}

fn write_point(out: &mut String, point: &Point, tag: Tag) {
    match point.coordinate() {
        Some(c) => {
            out.push('(');
            write_coordinate(out, c, tag);
            out.push(')');
        }
        None => out.push_str("EMPTY"),
    }
}

fn write_line(out: &mut String, line: &LineString, tag: Tag) {
    write_list(out, &line.coordinates(), |out, c| write_coordinate(out, c, tag));
}

fn write_polygon(out: &mut String, polygon: &Polygon, tag: Tag) {
    write_list(out, polygon.rings(), |out, ring| write_line(out, ring, tag));
}

/// Under a `ZM` tag a third number reads as z, so a coordinate with only an
/// m value gets `NaN` in the z slot.
fn write_coordinate(out: &mut String, c: &Coordinate, tag: Tag) {
    // writing into a String cannot fail
    let _ = write!(out, "{} {}", c.x, c.y);
    let z = match (c.z, c.m) {
        (None, Some(_)) if tag.z && tag.m => Some(f64::NAN),
        (z, _) => z,
    };
    for ordinate in [z, c.m].into_iter().flatten() {
        let _ = write!(out, " {}", ordinate);
    }
}
