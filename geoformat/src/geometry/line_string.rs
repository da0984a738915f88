use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::geometry::{Coordinate, Point};

/// A 1-dimensional geometry: an ordered sequence of points.
///
/// A LineString with 2 points represents a line segment. A closed LineString
/// (first and last coordinates are equal) represents a ring. Zero points is
/// the empty line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineString {
    points: Vec<Point>,
}

/// A straight segment between two coordinates.
pub type Segment = (Coordinate, Coordinate);

impl LineString {
    /// Creates a new LineString from points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a new LineString from plain coordinates.
    pub fn from_coordinates(coordinates: Vec<Coordinate>) -> Self {
        Self {
            points: coordinates.into_iter().map(Point::from_coordinate).collect(),
        }
    }

    pub fn empty() -> Self {
        Self { points: vec![] }
    }

    /// Gets the points of this LineString.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Non-empty vertex coordinates in order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.points
            .iter()
            .filter_map(|p| p.coordinate().copied())
            .collect()
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the n-th point, counting from 1.
    pub fn point_n(&self, n: usize) -> Option<&Point> {
        n.checked_sub(1).and_then(|i| self.points.get(i))
    }

    pub fn start_point(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn end_point(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Checks if this LineString is closed (first and last coordinates are equal).
    pub fn is_closed(&self) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(first), Some(last)) => first.same_position(last),
            _ => false,
        }
    }

    /// A ring is a closed, simple line.
    pub fn is_ring(&self) -> bool {
        self.is_closed() && self.is_simple()
    }

    /// Calculates the total length of the LineString.
    ///
    /// For geographic coordinates, this gives a rough approximation in degrees.
    /// For projected coordinates, the result is in the same units as the coordinates.
    pub fn length(&self) -> f64 {
        self.segments().iter().map(|(a, b)| a.distance(b)).sum()
    }

    /// Explodes the line into its consecutive segments.
    pub fn segments(&self) -> Vec<Segment> {
        self.coordinates()
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    /// True when no two non-adjacent segments intersect.
    pub fn is_simple(&self) -> bool {
        segments_are_simple(&[(self.segments(), self.is_closed())])
    }

    /// Gets the bounding box of this LineString.
    pub fn envelope(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(self.points.iter().filter_map(Point::coordinate))
    }

    /// Checks if this LineString intersects with another LineString.
    pub fn intersects(&self, other: &LineString) -> bool {
        let (Some(bbox1), Some(bbox2)) = (self.envelope(), other.envelope()) else {
            return false;
        };
        if !bbox1.intersects(&bbox2) {
            return false;
        }

        let theirs = other.segments();
        self.segments().iter().any(|(p1, p2)| {
            theirs
                .iter()
                .any(|(p3, p4)| segments_intersect(p1, p2, p3, p4))
        })
    }
}

/// Pairwise O(n²) test over groups of segments (one group per ring).
///
/// Segments of the same group that follow each other by index, or that wrap
/// around in a closed group, share a vertex and are not compared.
pub(crate) fn segments_are_simple(groups: &[(Vec<Segment>, bool)]) -> bool {
    let exploded: Vec<(usize, usize, &Segment)> = groups
        .iter()
        .enumerate()
        .flat_map(|(g, (segments, _))| segments.iter().enumerate().map(move |(i, s)| (g, i, s)))
        .collect();

    for (a, (ga, ia, sa)) in exploded.iter().enumerate() {
        for (gb, ib, sb) in exploded.iter().skip(a + 1) {
            if ga == gb {
                let (segments, closed) = &groups[*ga];
                let last = segments.len() - 1;
                let consecutive = ia.abs_diff(*ib) == 1;
                let wraps = *closed && last > 1 && ((*ia == 0 && *ib == last) || (*ib == 0 && *ia == last));
                if consecutive || wraps {
                    continue;
                }
            }
            if segments_intersect(&sa.0, &sa.1, &sb.0, &sb.1) {
                return false;
            }
        }
    }
    true
}

/// Checks if two line segments intersect.
pub(crate) fn segments_intersect(
    p1: &Coordinate,
    p2: &Coordinate,
    p3: &Coordinate,
    p4: &Coordinate,
) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // collinear cases
    (o1 == 0 && on_segment(p1, p3, p2))
        || (o2 == 0 && on_segment(p1, p4, p2))
        || (o3 == 0 && on_segment(p3, p1, p4))
        || (o4 == 0 && on_segment(p3, p2, p4))
}

/// Finds the orientation of an ordered triplet of points.
/// Returns:
/// - 0 if collinear
/// - 1 if clockwise
/// - 2 if counterclockwise
fn orientation(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> i32 {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val.abs() < 1e-10 {
        0
    } else if val > 0.0 {
        1
    } else {
        2
    }
}

/// Checks if point q lies on segment pr (assuming p, q, r are collinear).
fn on_segment(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}
