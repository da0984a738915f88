//! Optional acceleration engine.
//!
//! An engine is an external geometry library (GEOS-like) reached through the
//! narrow [`GeometryEngineProvider`] capability interface. Every method has a
//! default that reports "not handled", so an engine implements only what it
//! accelerates. The crate never requires an engine: operations with a
//! built-in fallback produce identical results without one, operations
//! without a fallback fail with `UnsupportedOperation`.

use std::any::Any;
use std::fmt::{self, Debug};
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use crate::config::GeoConfig;
use crate::errors::GeoResult;
use crate::geometry::{Geometry, GeometryValue, Point};

/// Opaque engine-side representation of a prepared geometry.
pub type EngineHandle = Arc<dyn Any + Send + Sync>;

/// Capability interface of an acceleration engine.
///
/// Each method returns `None` when the engine does not handle the request,
/// in which case the caller takes its fallback path (if any).
pub trait GeometryEngineProvider: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Probed once per configuration to decide whether the engine is usable.
    fn is_available(&self) -> bool {
        true
    }

    fn parse_wkt(&self, _wkt: &str) -> Option<GeoResult<Geometry>> {
        None
    }

    fn write_wkt(&self, _geometry: &Geometry) -> Option<String> {
        None
    }

    fn area(&self, _geometry: &GeometryValue) -> Option<f64> {
        None
    }

    fn centroid(&self, _geometry: &GeometryValue) -> Option<Point> {
        None
    }

    fn distance(&self, _a: &GeometryValue, _b: &GeometryValue) -> Option<f64> {
        None
    }

    fn intersection(&self, _a: &GeometryValue, _b: &GeometryValue) -> Option<GeoResult<GeometryValue>> {
        None
    }

    fn union(&self, _a: &GeometryValue, _b: &GeometryValue) -> Option<GeoResult<GeometryValue>> {
        None
    }

    fn difference(&self, _a: &GeometryValue, _b: &GeometryValue) -> Option<GeoResult<GeometryValue>> {
        None
    }

    fn sym_difference(
        &self,
        _a: &GeometryValue,
        _b: &GeometryValue,
    ) -> Option<GeoResult<GeometryValue>> {
        None
    }

    /// Builds an engine-side handle that later calls may reuse.
    fn prepare(&self, _geometry: &GeometryValue) -> Option<EngineHandle> {
        None
    }
}

/// Shared handle to an acceleration engine.
///
/// Cheap to clone; derefs to the provider so capability methods can be
/// called directly on the wrapper.
#[derive(Clone)]
pub struct GeometryEngine {
    inner: Arc<dyn GeometryEngineProvider>,
}

impl GeometryEngine {
    pub fn new<T: GeometryEngineProvider + 'static>(inner: T) -> Self {
        GeometryEngine {
            inner: Arc::new(inner),
        }
    }

    /// Wraps an already shared provider.
    pub fn from_arc(inner: Arc<dyn GeometryEngineProvider>) -> Self {
        GeometryEngine { inner }
    }
}

impl Deref for GeometryEngine {
    type Target = Arc<dyn GeometryEngineProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for GeometryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryEngine")
            .field("name", &self.inner.name())
            .finish()
    }
}

/// A geometry with an advisory, lazily prepared engine handle.
///
/// The handle is computed at most once and only while an engine is active;
/// it never affects the geometry value itself.
pub struct PreparedGeometry {
    geometry: Geometry,
    handle: OnceLock<Option<EngineHandle>>,
}

impl PreparedGeometry {
    pub fn new(geometry: Geometry) -> Self {
        PreparedGeometry {
            geometry,
            handle: OnceLock::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn into_geometry(self) -> Geometry {
        self.geometry
    }

    /// Returns the cached handle, preparing it with the active engine on
    /// first use.
    pub fn handle(&self, config: &GeoConfig) -> Option<EngineHandle> {
        if let Some(handle) = self.handle.get() {
            return handle.clone();
        }
        let engine = config.active_engine()?;
        self.handle
            .get_or_init(|| {
                log::debug!(
                    "Preparing {} with engine {}",
                    self.geometry.geometry_type(),
                    engine.name()
                );
                engine.prepare(self.geometry.value())
            })
            .clone()
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.handle.get(), Some(Some(_)))
    }
}

impl Deref for PreparedGeometry {
    type Target = Geometry;

    fn deref(&self) -> &Self::Target {
        &self.geometry
    }
}
