use serde::{Deserialize, Serialize};

use crate::geometry::{GeometryValue, LineString, Point, Polygon};

/// Multiple point geometries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiPoint {
    points: Vec<Point>,
}

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Multiple line string geometries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiLineString {
    lines: Vec<LineString>,
}

impl MultiLineString {
    pub fn new(lines: Vec<LineString>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[LineString] {
        &self.lines
    }

    pub(crate) fn into_lines(self) -> Vec<LineString> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the component lengths.
    pub fn length(&self) -> f64 {
        self.lines.iter().map(LineString::length).sum()
    }

    /// Closed when every component is closed.
    pub fn is_closed(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(LineString::is_closed)
    }
}

/// Multiple polygon geometries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub(crate) fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Sum of the unsigned component areas, holes subtracted.
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(|p| p.area(false, false)).sum()
    }
}

/// A heterogeneous collection of geometries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryCollection {
    geometries: Vec<GeometryValue>,
}

impl GeometryCollection {
    pub fn new(geometries: Vec<GeometryValue>) -> Self {
        Self { geometries }
    }

    pub fn geometries(&self) -> &[GeometryValue] {
        &self.geometries
    }

    pub(crate) fn into_geometries(self) -> Vec<GeometryValue> {
        self.geometries
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}
