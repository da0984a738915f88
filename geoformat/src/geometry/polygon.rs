use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::geometry::line_string::segments_are_simple;
use crate::geometry::{Coordinate, LineString, Point};

/// A 2-dimensional geometry bounded by rings.
///
/// Ring 0 is the exterior boundary, every following ring is a hole. A polygon
/// with zero rings is empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    rings: Vec<LineString>,
}

impl Polygon {
    /// Creates a polygon from its rings, exterior first.
    pub fn new(rings: Vec<LineString>) -> Self {
        Self { rings }
    }

    pub fn empty() -> Self {
        Self { rings: vec![] }
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[LineString] {
        &self.rings
    }

    pub(crate) fn into_rings(self) -> Vec<LineString> {
        self.rings
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn exterior_ring(&self) -> Option<&LineString> {
        self.rings.first()
    }

    pub fn interior_rings(&self) -> &[LineString] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn num_interior_rings(&self) -> usize {
        self.interior_rings().len()
    }

    /// Returns the n-th hole, counting from 1.
    pub fn interior_ring_n(&self, n: usize) -> Option<&LineString> {
        n.checked_sub(1).and_then(|i| self.interior_rings().get(i))
    }

    /// Every vertex of every ring, in ring order.
    pub fn points(&self) -> Vec<&Point> {
        self.rings.iter().flat_map(|r| r.points()).collect()
    }

    pub fn envelope(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(self.points().into_iter().filter_map(Point::coordinate))
    }

    /// Shoelace area of the exterior ring.
    ///
    /// With `exterior_only == false` the unsigned area of every hole is
    /// subtracted. `signed` keeps the winding sign of the exterior ring
    /// (positive for counter-clockwise).
    pub fn area(&self, exterior_only: bool, signed: bool) -> f64 {
        let Some(exterior) = self.exterior_ring() else {
            return 0.0;
        };

        let doubled = shoelace(&exterior.coordinates());
        let mut area = if signed { doubled / 2.0 } else { (doubled / 2.0).abs() };

        if exterior_only {
            return area;
        }
        for hole in self.interior_rings() {
            area -= Polygon::new(vec![hole.clone()]).area(false, false);
        }
        area
    }

    /// Centroid of the exterior ring.
    ///
    /// A ring with zero signed area yields its first vertex.
    pub fn centroid(&self) -> Option<Point> {
        let pts = self.exterior_ring()?.coordinates();
        if pts.is_empty() {
            return None;
        }

        let a = self.area(true, true);
        if a == 0.0 {
            return Some(Point::from_coordinate(Coordinate::new(pts[0].x, pts[0].y)));
        }

        let n = pts.len();
        let (mut cx, mut cy) = (0.0, 0.0);
        for k in 0..n {
            let p = &pts[k];
            let q = &pts[(k + 1) % n];
            let cross = p.x * q.y - p.y * q.x;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }

        Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
    }

    /// Determines whether a point is bounded by this polygon.
    ///
    /// A point sitting exactly on a vertex answers `vertex_is_in`, a point on
    /// an edge answers `boundary_is_in`. Otherwise a horizontal ray is cast
    /// over the edges of every ring and an odd crossing count means inside.
    pub fn point_in_polygon(&self, point: &Point, boundary_is_in: bool, vertex_is_in: bool) -> bool {
        let Some(p) = point.coordinate() else {
            return false;
        };

        if self.points().iter().any(|vertex| vertex.same_position(point)) {
            return vertex_is_in;
        }

        let mut intersections = 0usize;
        for ring in &self.rings {
            for (v1, v2) in ring_edges(ring) {
                if v1.y == v2.y
                    && v1.y == p.y
                    && p.x > v1.x.min(v2.x)
                    && p.x < v1.x.max(v2.x)
                {
                    // on a horizontal edge
                    return boundary_is_in;
                }
                if p.y > v1.y.min(v2.y)
                    && p.y <= v1.y.max(v2.y)
                    && p.x <= v1.x.max(v2.x)
                    && v1.y != v2.y
                {
                    let x_inters = (p.y - v1.y) * (v2.x - v1.x) / (v2.y - v1.y) + v1.x;
                    if x_inters == p.x {
                        return boundary_is_in;
                    }
                    if v1.x == v2.x || p.x <= x_inters {
                        intersections += 1;
                    }
                }
            }
        }

        intersections % 2 != 0
    }

    /// Checks if the point lies inside or on the boundary.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.point_in_polygon(point, true, true)
    }

    /// True when no two non-adjacent edges of any rings intersect.
    pub fn is_simple(&self) -> bool {
        let groups: Vec<_> = self
            .rings
            .iter()
            .map(|ring| (ring.segments(), ring.is_closed()))
            .collect();
        segments_are_simple(&groups)
    }

    /// The vertex farthest from the centroid.
    pub fn outermost_point(&self) -> Option<Point> {
        let centroid = self.centroid()?;
        let mut best: Option<(f64, &Point)> = None;
        for vertex in self.points() {
            let Some(distance) = centroid.distance(vertex) else {
                continue;
            };
            if best.map_or(true, |(max, _)| distance > max) {
                best = Some((distance, vertex));
            }
        }
        best.map(|(_, vertex)| vertex.clone())
    }
}

/// Twice the signed area of a vertex ring, wrapping around.
fn shoelace(pts: &[Coordinate]) -> f64 {
    let n = pts.len();
    (0..n)
        .map(|k| {
            let p = &pts[k];
            let q = &pts[(k + 1) % n];
            p.x * q.y - p.y * q.x
        })
        .sum()
}

/// Edges of a ring, with the closing edge added when the ring is left open.
fn ring_edges(ring: &LineString) -> Vec<(Coordinate, Coordinate)> {
    let mut edges = ring.segments();
    let coords = ring.coordinates();
    if coords.len() > 2 && !ring.is_closed() {
        edges.push((coords[coords.len() - 1], coords[0]));
    }
    edges
}
