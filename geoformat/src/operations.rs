use crate::config::GeoConfig;
use crate::engine::GeometryEngine;
use crate::errors::{GeoError, GeoResult};
use crate::geometry::{GeometryType, GeometryValue, Point};

/// Computational-geometry entry points that may use the acceleration engine.
///
/// Operations with a built-in fallback (`area`, `centroid` for points and
/// polygons, `length`, point-to-point `distance`) give the same answer with
/// or without an engine. Boolean set operations have no fallback.
#[derive(Clone, Default)]
pub struct SpatialOperations {
    config: GeoConfig,
}

impl SpatialOperations {
    pub fn new(config: GeoConfig) -> Self {
        SpatialOperations { config }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    fn engine(&self) -> Option<&GeometryEngine> {
        self.config.active_engine()
    }

    /// Unsigned area of the polygonal parts.
    pub fn area(&self, geometry: &GeometryValue) -> f64 {
        if let Some(area) = self.engine().and_then(|engine| engine.area(geometry)) {
            log::debug!("area of {} computed by engine", geometry.geometry_type());
            return area;
        }
        geometry.area()
    }

    /// Length of the linear parts.
    pub fn length(&self, geometry: &GeometryValue) -> f64 {
        geometry.length()
    }

    /// Centroid of a geometry; `Ok(None)` for an empty one.
    ///
    /// Only points and polygons have a built-in formula; other types need
    /// the engine.
    pub fn centroid(&self, geometry: &GeometryValue) -> GeoResult<Option<Point>> {
        if geometry.is_empty() {
            return Ok(None);
        }
        if let Some(centroid) = self.engine().and_then(|engine| engine.centroid(geometry)) {
            log::debug!("centroid of {} computed by engine", geometry.geometry_type());
            return Ok(Some(centroid));
        }

        match geometry.geometry_type() {
            GeometryType::Point | GeometryType::Polygon => Ok(geometry.centroid()),
            other => Err(unsupported(&format!("centroid of {}", other))),
        }
    }

    /// Planar distance; without an engine only point-to-point is supported.
    pub fn distance(&self, a: &GeometryValue, b: &GeometryValue) -> GeoResult<f64> {
        if let Some(distance) = self.engine().and_then(|engine| engine.distance(a, b)) {
            return Ok(distance);
        }

        match (a, b) {
            (GeometryValue::Point(p), GeometryValue::Point(q)) => p.distance(q).ok_or_else(|| {
                log::error!("Distance to an empty point is undefined");
                GeoError::InvalidGeometry("Distance to an empty point is undefined".to_string())
            }),
            _ => Err(unsupported(&format!(
                "distance between {} and {}",
                a.geometry_type(),
                b.geometry_type()
            ))),
        }
    }

    pub fn intersection(&self, a: &GeometryValue, b: &GeometryValue) -> GeoResult<GeometryValue> {
        self.engine()
            .and_then(|engine| engine.intersection(a, b))
            .unwrap_or_else(|| Err(unsupported("intersection")))
    }

    pub fn union(&self, a: &GeometryValue, b: &GeometryValue) -> GeoResult<GeometryValue> {
        self.engine()
            .and_then(|engine| engine.union(a, b))
            .unwrap_or_else(|| Err(unsupported("union")))
    }

    pub fn difference(&self, a: &GeometryValue, b: &GeometryValue) -> GeoResult<GeometryValue> {
        self.engine()
            .and_then(|engine| engine.difference(a, b))
            .unwrap_or_else(|| Err(unsupported("difference")))
    }

    pub fn sym_difference(&self, a: &GeometryValue, b: &GeometryValue) -> GeoResult<GeometryValue> {
        self.engine()
            .and_then(|engine| engine.sym_difference(a, b))
            .unwrap_or_else(|| Err(unsupported("sym_difference")))
    }
}

fn unsupported(operation: &str) -> GeoError {
    log::error!("{} requires a geometry engine", operation);
    GeoError::UnsupportedOperation(format!("{} requires a geometry engine", operation))
}
