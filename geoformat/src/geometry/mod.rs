//! The geometry model.
//!
//! [`GeometryValue`] is a closed sum type over the seven simple-feature
//! variants. Every variant can be empty, and components are owned by their
//! parent, so a geometry is a plain value tree that can be shared freely
//! between readers. [`Geometry`] is the top-level value carried through the
//! codecs: a `GeometryValue` plus an optional SRID.

mod collection;
mod line_string;
mod point;
mod polygon;

use std::fmt::{self, Display};
use std::ops::Deref;

use serde::{Deserialize, Serialize};

pub use collection::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
pub use line_string::{LineString, Segment};
pub use point::{Coordinate, Point};
pub use polygon::Polygon;

use crate::bounding_box::BoundingBox;
use crate::codec::wkt;
use crate::errors::{GeoError, GeoResult};

/// Type tag of a geometry variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

/// WKT keywords, longest first for each shared prefix.
pub(crate) const WKT_KEYWORDS: [(&str, GeometryType); 7] = [
    ("GEOMETRYCOLLECTION", GeometryType::GeometryCollection),
    ("MULTILINESTRING", GeometryType::MultiLineString),
    ("MULTIPOLYGON", GeometryType::MultiPolygon),
    ("MULTIPOINT", GeometryType::MultiPoint),
    ("LINESTRING", GeometryType::LineString),
    ("POLYGON", GeometryType::Polygon),
    ("POINT", GeometryType::Point),
];

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    pub fn wkt_keyword(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Exact, case-insensitive keyword lookup.
    pub fn from_wkt_keyword(keyword: &str) -> Option<GeometryType> {
        WKT_KEYWORDS
            .iter()
            .find(|(kw, _)| kw.eq_ignore_ascii_case(keyword))
            .map(|(_, ty)| *ty)
    }

    /// Looks up a GeoJSON / display name such as `"MultiPoint"`.
    pub fn from_name(name: &str) -> Option<GeometryType> {
        WKT_KEYWORDS
            .iter()
            .map(|(_, ty)| *ty)
            .find(|ty| ty.as_str() == name)
    }

    /// The homogeneous collection type for a primitive type.
    pub fn multi(&self) -> Option<GeometryType> {
        match self {
            GeometryType::Point => Some(GeometryType::MultiPoint),
            GeometryType::LineString => Some(GeometryType::MultiLineString),
            GeometryType::Polygon => Some(GeometryType::MultiPolygon),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::GeometryCollection
        )
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A geometry of any supported type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryValue {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl GeometryValue {
    /// Builds a collection of type `ty` from loose components.
    ///
    /// Homogeneous collections reject components of any other primitive
    /// type with [`GeoError::InvalidGeometry`].
    pub fn collect(ty: GeometryType, components: Vec<GeometryValue>) -> GeoResult<GeometryValue> {
        fn mismatch(ty: GeometryType, found: &GeometryValue) -> GeoError {
            let message = format!("{} cannot hold a {}", ty, found.geometry_type());
            log::error!("{}", message);
            GeoError::InvalidGeometry(message)
        }

        let value = match ty {
            GeometryType::MultiPoint => {
                let mut points = Vec::with_capacity(components.len());
                for component in components {
                    match component {
                        GeometryValue::Point(p) => points.push(p),
                        other => return Err(mismatch(ty, &other)),
                    }
                }
                GeometryValue::MultiPoint(MultiPoint::new(points))
            }
            GeometryType::MultiLineString => {
                let mut lines = Vec::with_capacity(components.len());
                for component in components {
                    match component {
                        GeometryValue::LineString(l) => lines.push(l),
                        other => return Err(mismatch(ty, &other)),
                    }
                }
                GeometryValue::MultiLineString(MultiLineString::new(lines))
            }
            GeometryType::MultiPolygon => {
                let mut polygons = Vec::with_capacity(components.len());
                for component in components {
                    match component {
                        GeometryValue::Polygon(p) => polygons.push(p),
                        other => return Err(mismatch(ty, &other)),
                    }
                }
                GeometryValue::MultiPolygon(MultiPolygon::new(polygons))
            }
            GeometryType::GeometryCollection => {
                GeometryValue::GeometryCollection(GeometryCollection::new(components))
            }
            primitive => {
                let message = format!("{} is not a collection type", primitive);
                log::error!("{}", message);
                return Err(GeoError::InvalidGeometry(message));
            }
        };
        Ok(value)
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            GeometryValue::Point(_) => GeometryType::Point,
            GeometryValue::LineString(_) => GeometryType::LineString,
            GeometryValue::Polygon(_) => GeometryType::Polygon,
            GeometryValue::MultiPoint(_) => GeometryType::MultiPoint,
            GeometryValue::MultiLineString(_) => GeometryType::MultiLineString,
            GeometryValue::MultiPolygon(_) => GeometryType::MultiPolygon,
            GeometryValue::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Topological dimension: 0 for points, 1 for lines, 2 for polygons.
    ///
    /// A GeometryCollection reports the highest dimension among its
    /// components, or 0 when empty.
    pub fn dimension(&self) -> u8 {
        match self {
            GeometryValue::Point(_) | GeometryValue::MultiPoint(_) => 0,
            GeometryValue::LineString(_) | GeometryValue::MultiLineString(_) => 1,
            GeometryValue::Polygon(_) | GeometryValue::MultiPolygon(_) => 2,
            GeometryValue::GeometryCollection(gc) => gc
                .geometries()
                .iter()
                .map(GeometryValue::dimension)
                .max()
                .unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GeometryValue::Point(p) => p.is_empty(),
            GeometryValue::LineString(l) => l.is_empty(),
            GeometryValue::Polygon(p) => p.is_empty(),
            GeometryValue::MultiPoint(mp) => mp.is_empty(),
            GeometryValue::MultiLineString(mls) => mls.is_empty(),
            GeometryValue::MultiPolygon(mp) => mp.is_empty(),
            GeometryValue::GeometryCollection(gc) => gc.is_empty(),
        }
    }

    /// Axis-aligned bounding box over every non-empty point.
    pub fn envelope(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(self.points().into_iter().filter_map(Point::coordinate))
    }

    /// Immediate children, in order.
    ///
    /// A LineString yields its points and a Polygon its rings; a Point has no
    /// components.
    pub fn components(&self) -> Vec<GeometryValue> {
        self.clone().into_components()
    }

    pub fn into_components(self) -> Vec<GeometryValue> {
        match self {
            GeometryValue::Point(_) => vec![],
            GeometryValue::LineString(l) => {
                l.into_points().into_iter().map(GeometryValue::Point).collect()
            }
            GeometryValue::Polygon(p) => p
                .into_rings()
                .into_iter()
                .map(GeometryValue::LineString)
                .collect(),
            GeometryValue::MultiPoint(mp) => {
                mp.into_points().into_iter().map(GeometryValue::Point).collect()
            }
            GeometryValue::MultiLineString(mls) => mls
                .into_lines()
                .into_iter()
                .map(GeometryValue::LineString)
                .collect(),
            GeometryValue::MultiPolygon(mp) => mp
                .into_polygons()
                .into_iter()
                .map(GeometryValue::Polygon)
                .collect(),
            GeometryValue::GeometryCollection(gc) => gc.into_geometries(),
        }
    }

    /// Every leaf point, depth first.
    pub fn points(&self) -> Vec<&Point> {
        match self {
            GeometryValue::Point(p) => vec![p],
            GeometryValue::LineString(l) => l.points().iter().collect(),
            GeometryValue::Polygon(p) => p.points(),
            GeometryValue::MultiPoint(mp) => mp.points().iter().collect(),
            GeometryValue::MultiLineString(mls) => {
                mls.lines().iter().flat_map(|l| l.points()).collect()
            }
            GeometryValue::MultiPolygon(mp) => {
                mp.polygons().iter().flat_map(Polygon::points).collect()
            }
            GeometryValue::GeometryCollection(gc) => {
                gc.geometries().iter().flat_map(GeometryValue::points).collect()
            }
        }
    }

    pub fn has_z(&self) -> bool {
        self.points().iter().any(|p| p.z().is_some())
    }

    pub fn has_m(&self) -> bool {
        self.points().iter().any(|p| p.m().is_some())
    }

    /// Number of members of a collection; 1 for a primitive geometry.
    pub fn num_geometries(&self) -> usize {
        match self {
            GeometryValue::MultiPoint(mp) => mp.len(),
            GeometryValue::MultiLineString(mls) => mls.len(),
            GeometryValue::MultiPolygon(mp) => mp.len(),
            GeometryValue::GeometryCollection(gc) => gc.len(),
            _ => 1,
        }
    }

    /// Returns the n-th member, counting from 1. A primitive geometry is its
    /// own single member.
    pub fn geometry_n(&self, n: usize) -> Option<GeometryValue> {
        let index = n.checked_sub(1)?;
        match self {
            GeometryValue::MultiPoint(mp) => mp.points().get(index).cloned().map(GeometryValue::Point),
            GeometryValue::MultiLineString(mls) => mls
                .lines()
                .get(index)
                .cloned()
                .map(GeometryValue::LineString),
            GeometryValue::MultiPolygon(mp) => mp
                .polygons()
                .get(index)
                .cloned()
                .map(GeometryValue::Polygon),
            GeometryValue::GeometryCollection(gc) => gc.geometries().get(index).cloned(),
            primitive if index == 0 => Some(primitive.clone()),
            _ => None,
        }
    }

    /// Total length of the linear parts.
    pub fn length(&self) -> f64 {
        match self {
            GeometryValue::LineString(l) => l.length(),
            GeometryValue::MultiLineString(mls) => mls.length(),
            GeometryValue::GeometryCollection(gc) => {
                gc.geometries().iter().map(GeometryValue::length).sum()
            }
            _ => 0.0,
        }
    }

    /// Total unsigned area of the polygonal parts.
    pub fn area(&self) -> f64 {
        match self {
            GeometryValue::Polygon(p) => p.area(false, false),
            GeometryValue::MultiPolygon(mp) => mp.area(),
            GeometryValue::GeometryCollection(gc) => {
                gc.geometries().iter().map(GeometryValue::area).sum()
            }
            _ => 0.0,
        }
    }

    /// Centroid for the types that have a built-in formula.
    ///
    /// Returns `None` for empty geometries and for types that only the
    /// acceleration engine can handle.
    pub fn centroid(&self) -> Option<Point> {
        match self {
            GeometryValue::Point(p) if !p.is_empty() => Some(p.clone()),
            GeometryValue::Polygon(p) => p.centroid(),
            _ => None,
        }
    }
}

impl Display for GeometryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wkt::write_value(self))
    }
}

impl From<Point> for GeometryValue {
    fn from(p: Point) -> Self {
        GeometryValue::Point(p)
    }
}

impl From<LineString> for GeometryValue {
    fn from(l: LineString) -> Self {
        GeometryValue::LineString(l)
    }
}

impl From<Polygon> for GeometryValue {
    fn from(p: Polygon) -> Self {
        GeometryValue::Polygon(p)
    }
}

impl From<MultiPoint> for GeometryValue {
    fn from(mp: MultiPoint) -> Self {
        GeometryValue::MultiPoint(mp)
    }
}

impl From<MultiLineString> for GeometryValue {
    fn from(mls: MultiLineString) -> Self {
        GeometryValue::MultiLineString(mls)
    }
}

impl From<MultiPolygon> for GeometryValue {
    fn from(mp: MultiPolygon) -> Self {
        GeometryValue::MultiPolygon(mp)
    }
}

impl From<GeometryCollection> for GeometryValue {
    fn from(gc: GeometryCollection) -> Self {
        GeometryValue::GeometryCollection(gc)
    }
}

/// A top-level geometry: a value tree plus an optional SRID.
///
/// The SRID is carried through the codecs, never interpreted.
///
/// # Examples
///
/// ```rust
/// use geoformat::{Geometry, Point};
///
/// let mut geometry = Geometry::new(Point::new(30.0, 10.0));
/// geometry.set_srid(Some(4326));
/// assert_eq!(geometry.to_string(), "SRID=4326;POINT (30 10)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    value: GeometryValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    srid: Option<i32>,
}

impl Geometry {
    pub fn new(value: impl Into<GeometryValue>) -> Self {
        Self {
            value: value.into(),
            srid: None,
        }
    }

    pub fn with_srid(value: impl Into<GeometryValue>, srid: Option<i32>) -> Self {
        Self {
            value: value.into(),
            srid,
        }
    }

    pub fn value(&self) -> &GeometryValue {
        &self.value
    }

    pub fn into_value(self) -> GeometryValue {
        self.value
    }

    pub fn srid(&self) -> Option<i32> {
        self.srid
    }

    pub fn set_srid(&mut self, srid: Option<i32>) {
        self.srid = srid;
    }
}

impl Deref for Geometry {
    type Target = GeometryValue;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<GeometryValue> for Geometry {
    fn from(value: GeometryValue) -> Self {
        Geometry::new(value)
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wkt::write_ewkt(self))
    }
}
