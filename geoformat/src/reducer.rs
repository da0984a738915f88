//! Collapses sets of geometries to their simplest common representation.

use crate::errors::{GeoError, GeoResult};
use crate::geometry::{Geometry, GeometryType, GeometryValue};

/// Reduces a list of geometries.
///
/// One geometry reduces on its own (see [`reduce_geometry`]). Otherwise
/// collections are flattened one level, in order; a single survivor is
/// returned as is, survivors of one primitive type become the matching
/// `Multi*`, and anything else becomes a `GeometryCollection`.
///
/// The result keeps an SRID only when every input carries the same one.
pub fn reduce(geometries: Vec<Geometry>) -> GeoResult<Geometry> {
    let srid = shared_srid(&geometries);
    let mut geometries = geometries;
    match geometries.len() {
        0 => Err(empty_input()),
        1 => match geometries.pop() {
            Some(geometry) => reduce_geometry(geometry),
            None => Err(empty_input()),
        },
        _ => {
            let values = geometries.into_iter().map(Geometry::into_value);
            Ok(Geometry::with_srid(combine(values)?, srid))
        }
    }
}

/// Reduces one geometry.
///
/// Primitives are already minimal. A `Multi*` holding exactly one member
/// becomes that member; with any other count it is returned unchanged. A
/// `GeometryCollection` is rebuilt from its members the way [`reduce`]
/// combines a list.
pub fn reduce_geometry(geometry: Geometry) -> GeoResult<Geometry> {
    let srid = geometry.srid();
    match geometry.geometry_type() {
        GeometryType::Point | GeometryType::LineString | GeometryType::Polygon => Ok(geometry),
        GeometryType::MultiPoint | GeometryType::MultiLineString | GeometryType::MultiPolygon => {
            if geometry.num_geometries() != 1 {
                return Ok(geometry);
            }
            let mut components = geometry.into_value().into_components();
            match components.pop() {
                Some(only) => Ok(Geometry::with_srid(only, srid)),
                None => Err(empty_input()),
            }
        }
        GeometryType::GeometryCollection => {
            let value = combine(std::iter::once(geometry.into_value()))?;
            Ok(Geometry::with_srid(value, srid))
        }
    }
}

fn combine(values: impl Iterator<Item = GeometryValue>) -> GeoResult<GeometryValue> {
    let mut flat = Vec::new();
    for value in values {
        if value.geometry_type().is_collection() {
            flat.extend(value.into_components());
        } else {
            flat.push(value);
        }
    }

    let Some(first) = flat.first().map(GeometryValue::geometry_type) else {
        return Err(empty_input());
    };
    if flat.len() == 1 {
        log::debug!("Reduced to a single {}", first);
        return Ok(flat.remove(0));
    }

    let homogeneous = flat.iter().all(|v| v.geometry_type() == first);
    let target = match first.multi() {
        Some(multi) if homogeneous => multi,
        _ => GeometryType::GeometryCollection,
    };
    log::debug!("Reduced {} geometries to a {}", flat.len(), target);
    GeometryValue::collect(target, flat)
}

fn shared_srid(geometries: &[Geometry]) -> Option<i32> {
    let first = geometries.first()?.srid();
    geometries
        .iter()
        .all(|g| g.srid() == first)
        .then_some(first)
        .flatten()
}

fn empty_input() -> GeoError {
    log::error!("Cannot reduce an empty set of geometries");
    GeoError::EmptyInput
}
