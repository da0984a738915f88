//! Format codecs and the registry the loader resolves them from.

pub mod geohash;
pub mod geojson;
pub mod wkb;
pub mod wkt;
mod wkt_parser;

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::GeoConfig;
use crate::errors::{GeoError, GeoResult};
use crate::format::{Encoded, Format, FormatArgs};
use crate::geometry::Geometry;

pub use geohash::{Direction, GeoHashCell, GeoHashCodec};
pub use geojson::GeoJsonCodec;
pub use wkb::WkbCodec;
pub use wkt::WktCodec;

/// Contract every format adapter satisfies.
///
/// `read` fails with a `Parse` error on malformed input and never returns a
/// partial geometry. `write` returns `None` only when the format cannot
/// express the (empty) geometry.
pub trait GeoCodecProvider: Send + Sync {
    /// The tag this codec is registered under.
    fn format(&self) -> Format;

    fn read(&self, raw: &[u8], args: &FormatArgs) -> GeoResult<Geometry>;

    fn write(&self, geometry: &Geometry, args: &FormatArgs) -> GeoResult<Option<Encoded>>;
}

/// Shared handle to a codec implementation.
#[derive(Clone)]
pub struct GeoCodec {
    inner: Arc<dyn GeoCodecProvider>,
}

impl GeoCodec {
    pub fn new<T: GeoCodecProvider + 'static>(inner: T) -> Self {
        GeoCodec {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for GeoCodec {
    type Target = Arc<dyn GeoCodecProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Format tag to codec lookup.
///
/// Registration may happen while other threads read; the latest registration
/// for a tag wins.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: Arc<RwLock<HashMap<Format, GeoCodec>>>,
}

impl CodecRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in codec.
    pub fn with_builtin(config: &GeoConfig) -> Self {
        let registry = Self::new();
        registry.register(GeoCodec::new(WktCodec::new(config.clone())));
        registry.register(GeoCodec::new(WktCodec::extended(config.clone())));
        registry.register(GeoCodec::new(WkbCodec::new()));
        registry.register(GeoCodec::new(WkbCodec::extended()));
        registry.register(GeoCodec::new(GeoJsonCodec::new()));
        registry.register(GeoCodec::new(GeoHashCodec::new(config.clone())));
        registry
    }

    /// Registers a codec under its own tag, replacing any previous one.
    pub fn register(&self, codec: GeoCodec) {
        let format = codec.format();
        if self.codecs.write().insert(format, codec).is_some() {
            log::debug!("Replaced codec for {}", format);
        }
    }

    pub fn get(&self, format: Format) -> Option<GeoCodec> {
        self.codecs.read().get(&format).cloned()
    }

    /// Like [`get`](Self::get) but fails with `UnknownFormat`.
    pub fn require(&self, format: Format) -> GeoResult<GeoCodec> {
        self.get(format).ok_or_else(|| {
            log::error!("No codec registered for format {}", format);
            GeoError::UnknownFormat(format!("no codec registered for '{}'", format))
        })
    }

    pub fn formats(&self) -> Vec<Format> {
        let mut formats: Vec<Format> = self.codecs.read().keys().copied().collect();
        formats.sort_by_key(|f| f.as_str());
        formats
    }
}

/// Decodes raw input of a text format as UTF-8.
pub(crate) fn text_input(raw: &[u8], format: Format) -> GeoResult<&str> {
    std::str::from_utf8(raw).map_err(|e| {
        log::error!("{} input is not valid UTF-8: {}", format, e);
        GeoError::parse(format.as_str(), format!("input is not valid UTF-8: {}", e))
    })
}
