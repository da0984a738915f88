//! GeoJSON geometry objects, features and feature collections.

use serde_json::{json, Map, Value};

use crate::codec::{text_input, GeoCodecProvider};
use crate::errors::{GeoError, GeoResult};
use crate::format::{Encoded, Format, FormatArgs};
use crate::geometry::{
    Coordinate, Geometry, GeometryCollection, GeometryType, GeometryValue, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use crate::reducer;

const FORMAT: &str = "json";

/// Reads and writes GeoJSON.
///
/// A `Feature` reads as its geometry and a `FeatureCollection` as the
/// reduction of its features' geometries; properties are dropped. Positions
/// carry x, y and an optional z. M values are not written.
#[derive(Default)]
pub struct GeoJsonCodec;

impl GeoJsonCodec {
    pub fn new() -> Self {
        GeoJsonCodec
    }

    /// Parses GeoJSON text.
    pub fn read_str(&self, text: &str) -> GeoResult<Geometry> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            log::error!("Invalid JSON: {}", e);
            invalid(format!("invalid JSON: {}", e))
        })?;
        self.read_value(&value)
    }

    /// Converts an already parsed JSON tree.
    pub fn read_value(&self, value: &Value) -> GeoResult<Geometry> {
        let object = as_object(value)?;
        match type_name(object)? {
            "FeatureCollection" => {
                let features = member(object, "features")?.as_array().ok_or_else(|| {
                    log::error!("FeatureCollection features is not an array");
                    invalid("FeatureCollection features must be an array")
                })?;
                let geometries = features
                    .iter()
                    .map(|feature| self.read_value(feature))
                    .collect::<GeoResult<Vec<_>>>()?;
                reducer::reduce(geometries)
            }
            "Feature" => self.read_value(member(object, "geometry")?),
            _ => Ok(Geometry::new(read_geometry(object, false)?)),
        }
    }

    /// The GeoJSON tree for a geometry; `None` for an empty collection,
    /// which GeoJSON readers reject.
    pub fn write_value(&self, geometry: &Geometry) -> Option<Value> {
        if let GeometryValue::GeometryCollection(gc) = geometry.value() {
            if gc.is_empty() {
                return None;
            }
        }
        Some(geometry_value(geometry.value()))
    }

    pub fn write_string(&self, geometry: &Geometry) -> Option<String> {
        self.write_value(geometry).map(|value| value.to_string())
    }
}

impl GeoCodecProvider for GeoJsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn read(&self, raw: &[u8], _args: &FormatArgs) -> GeoResult<Geometry> {
        self.read_str(text_input(raw, Format::Json)?)
    }

    fn write(&self, geometry: &Geometry, _args: &FormatArgs) -> GeoResult<Option<Encoded>> {
        Ok(self.write_string(geometry).map(Encoded::Text))
    }
}

fn invalid(message: impl Into<String>) -> GeoError {
    GeoError::parse(FORMAT, message)
}

fn as_object(value: &Value) -> GeoResult<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        log::error!("Expected a GeoJSON object, found {}", value);
        invalid("expected a GeoJSON object")
    })
}

fn member<'a>(object: &'a Map<String, Value>, key: &str) -> GeoResult<&'a Value> {
    object.get(key).ok_or_else(|| {
        log::error!("GeoJSON object has no '{}' member", key);
        invalid(format!("missing '{}' member", key))
    })
}

fn type_name(object: &Map<String, Value>) -> GeoResult<&str> {
    member(object, "type")?.as_str().ok_or_else(|| {
        log::error!("GeoJSON 'type' member is not a string");
        invalid("'type' must be a string")
    })
}

/// Only a top-level collection must have members; nested empty collections
/// are what the writer emits for them.
fn read_geometry(object: &Map<String, Value>, nested: bool) -> GeoResult<GeometryValue> {
    let name = type_name(object)?;
    let ty = GeometryType::from_name(name).ok_or_else(|| {
        log::error!("Unknown GeoJSON type '{}'", name);
        invalid(format!("unknown type '{}'", name))
    })?;

    let coordinates = || member(object, "coordinates");
    Ok(match ty {
        GeometryType::Point => read_point(coordinates()?)?.into(),
        GeometryType::LineString => read_line(coordinates()?)?.into(),
        GeometryType::Polygon => read_polygon(coordinates()?)?.into(),
        GeometryType::MultiPoint => MultiPoint::new(read_each(coordinates()?, read_point)?).into(),
        GeometryType::MultiLineString => {
            MultiLineString::new(read_each(coordinates()?, read_line)?).into()
        }
        GeometryType::MultiPolygon => {
            MultiPolygon::new(read_each(coordinates()?, read_polygon)?).into()
        }
        GeometryType::GeometryCollection => {
            let geometries = member(object, "geometries")?
                .as_array()
                .ok_or_else(|| {
                    log::error!("GeometryCollection geometries is not an array");
                    invalid("GeometryCollection geometries must be an array")
                })?;
            if geometries.is_empty() && !nested {
                log::error!("GeometryCollection with no component geometries");
                return Err(invalid("GeometryCollection with no component geometries"));
            }
            let components = geometries
                .iter()
                .map(|g| read_geometry(as_object(g)?, true))
                .collect::<GeoResult<Vec<_>>>()?;
            GeometryCollection::new(components).into()
        }
    })
}

fn read_each<T>(value: &Value, read: fn(&Value) -> GeoResult<T>) -> GeoResult<Vec<T>> {
    value
        .as_array()
        .ok_or_else(|| {
            log::error!("Expected a coordinate array, found {}", value);
            invalid("expected a coordinate array")
        })?
        .iter()
        .map(read)
        .collect()
}

fn read_number(value: &Value) -> GeoResult<f64> {
    value.as_f64().ok_or_else(|| {
        log::error!("Expected a number, found {}", value);
        invalid(format!("expected a number, found {}", value))
    })
}

/// `[]` is the empty point; otherwise `[x, y]` or `[x, y, z]`.
fn read_point(value: &Value) -> GeoResult<Point> {
    let ordinates = read_each(value, read_number)?;
    match ordinates.as_slice() {
        [] => Ok(Point::empty()),
        [x, y] => Ok(Point::new(*x, *y)),
        [x, y, z, ..] => Ok(Point::from_coordinate(Coordinate::new(*x, *y).with_z(*z))),
        [_] => {
            log::error!("Position with a single ordinate");
            Err(invalid("a position needs at least two numbers"))
        }
    }
}

fn read_line(value: &Value) -> GeoResult<LineString> {
    Ok(LineString::new(read_each(value, read_point)?))
}

fn read_polygon(value: &Value) -> GeoResult<Polygon> {
    Ok(Polygon::new(read_each(value, read_line)?))
}

fn geometry_value(value: &GeometryValue) -> Value {
    match value {
        GeometryValue::GeometryCollection(gc) => json!({
            "type": GeometryType::GeometryCollection.as_str(),
            "geometries": gc.geometries().iter().map(geometry_value).collect::<Vec<_>>(),
        }),
        other => json!({
            "type": other.geometry_type().as_str(),
            "coordinates": coordinates(other),
        }),
    }
}

fn coordinates(value: &GeometryValue) -> Value {
    match value {
        GeometryValue::Point(p) => position(p),
        GeometryValue::LineString(l) => line(l),
        GeometryValue::Polygon(p) => polygon(p),
        GeometryValue::MultiPoint(mp) => mp.points().iter().map(position).collect(),
        GeometryValue::MultiLineString(mls) => mls.lines().iter().map(line).collect(),
        GeometryValue::MultiPolygon(mp) => mp.polygons().iter().map(polygon).collect(),
        GeometryValue::GeometryCollection(_) => Value::Null,
    }
}

fn position(point: &Point) -> Value {
    match point.coordinate() {
        Some(c) => match c.z {
            Some(z) => json!([c.x, c.y, z]),
            None => json!([c.x, c.y]),
        },
        None => json!([]),
    }
}

fn line(line: &LineString) -> Value {
    line.points().iter().map(position).collect()
}

fn polygon(polygon: &Polygon) -> Value {
    polygon.rings().iter().map(line).collect()
}
