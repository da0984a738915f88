use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::bounding_box::BoundingBox;

/// A coordinate tuple: x (longitude/easting), y (latitude/northing) and
/// optional z and m ordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
}

impl Coordinate {
    /// Creates a new 2D coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Returns a copy with the z ordinate set.
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Returns a copy with the m ordinate set.
    pub fn with_m(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }

    /// Calculates the planar Euclidean distance to another coordinate.
    pub fn distance(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Compares the x/y pair only.
    pub fn same_xy(&self, other: &Coordinate) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 0-dimensional geometry.
///
/// A point without a coordinate is the *empty point*; it is a valid value in
/// every codec (`POINT EMPTY` in WKT).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    coordinate: Option<Coordinate>,
}

impl Point {
    /// Creates a new point at the given coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            coordinate: Some(Coordinate::new(x, y)),
        }
    }

    /// Creates the empty point.
    pub fn empty() -> Self {
        Self { coordinate: None }
    }

    /// Creates a point from a coordinate.
    pub fn from_coordinate(coord: Coordinate) -> Self {
        Self {
            coordinate: Some(coord),
        }
    }

    pub fn x(&self) -> Option<f64> {
        self.coordinate.map(|c| c.x)
    }

    pub fn y(&self) -> Option<f64> {
        self.coordinate.map(|c| c.y)
    }

    pub fn z(&self) -> Option<f64> {
        self.coordinate.and_then(|c| c.z)
    }

    pub fn m(&self) -> Option<f64> {
        self.coordinate.and_then(|c| c.m)
    }

    /// Gets the coordinate, `None` for the empty point.
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinate.is_none()
    }

    /// Distance between two non-empty points.
    pub fn distance(&self, other: &Point) -> Option<f64> {
        match (&self.coordinate, &other.coordinate) {
            (Some(a), Some(b)) => Some(a.distance(b)),
            _ => None,
        }
    }

    /// Vertex equality on x/y. Empty points never match.
    pub fn same_position(&self, other: &Point) -> bool {
        match (&self.coordinate, &other.coordinate) {
            (Some(a), Some(b)) => a.same_xy(b),
            _ => false,
        }
    }

    pub fn envelope(&self) -> Option<BoundingBox> {
        self.coordinate.as_ref().map(BoundingBox::from_coordinate)
    }
}

impl From<Coordinate> for Point {
    fn from(coord: Coordinate) -> Self {
        Point::from_coordinate(coord)
    }
}
