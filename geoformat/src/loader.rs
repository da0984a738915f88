//! Entry point tying detection, codec lookup and reduction together.

use std::path::Path;

use crate::codec::{CodecRegistry, GeoCodec};
use crate::config::GeoConfig;
use crate::detector;
use crate::errors::{GeoError, GeoResult};
use crate::format::{Encoded, Format, FormatArgs};
use crate::geometry::Geometry;
use crate::reducer;

/// Loads geometries from any registered format.
///
/// # Examples
///
/// ```rust
/// use geoformat::{FormatArgs, GeometryType, Loader};
///
/// let loader = Loader::default();
/// let geometry = loader
///     .load(b"POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))", None, &FormatArgs::default())
///     .unwrap();
/// assert_eq!(geometry.geometry_type(), GeometryType::Polygon);
/// assert_eq!(geometry.area(), 16.0);
/// ```
#[derive(Clone)]
pub struct Loader {
    config: GeoConfig,
    registry: CodecRegistry,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(GeoConfig::default())
    }
}

impl Loader {
    /// A loader with every built-in codec registered.
    pub fn new(config: GeoConfig) -> Self {
        let registry = CodecRegistry::with_builtin(&config);
        Loader { config, registry }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Adds a codec, replacing the one registered for the same format.
    pub fn register(&self, codec: GeoCodec) {
        self.registry.register(codec);
    }

    /// Decodes one input.
    ///
    /// Without a `hint` the format is detected from the input; an input that
    /// matches nothing fails with `UnknownFormat`.
    pub fn load(&self, raw: &[u8], hint: Option<Format>, args: &FormatArgs) -> GeoResult<Geometry> {
        let (format, args) = self.resolve(raw, hint, args)?;
        let codec = self.registry.require(format)?;
        log::debug!("Loading {} bytes as {}", raw.len(), format);
        codec.read(raw, &args)
    }

    /// Decodes every item with one codec and reduces the results.
    ///
    /// Without a `hint` the format is detected from the first item. The
    /// first failing item aborts the load.
    pub fn load_all<I, T>(&self, items: I, hint: Option<Format>, args: &FormatArgs) -> GeoResult<Geometry>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut items = items.into_iter().peekable();
        let Some(first) = items.peek() else {
            log::error!("No items to load");
            return Err(GeoError::EmptyInput);
        };

        let (format, args) = self.resolve(first.as_ref(), hint, args)?;
        let codec = self.registry.require(format)?;

        let mut geometries = Vec::new();
        for item in items {
            geometries.push(codec.read(item.as_ref(), &args)?);
        }
        log::debug!("Loaded {} {} items", geometries.len(), format);
        reducer::reduce(geometries)
    }

    /// Reads a file and loads its content.
    pub fn load_file(&self, path: impl AsRef<Path>, hint: Option<Format>, args: &FormatArgs) -> GeoResult<Geometry> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| {
            log::error!("Failed to read {}: {}", path.display(), e);
            e
        })?;
        self.load(&raw, hint, args)
    }

    /// Encodes a geometry with the codec registered for `format`.
    pub fn write(&self, geometry: &Geometry, format: Format, args: &FormatArgs) -> GeoResult<Option<Encoded>> {
        self.registry.require(format)?.write(geometry, args)
    }

    fn resolve(&self, raw: &[u8], hint: Option<Format>, args: &FormatArgs) -> GeoResult<(Format, FormatArgs)> {
        if let Some(format) = hint {
            return Ok((format, args.clone()));
        }
        match detector::detect(raw) {
            Some(detection) => {
                log::debug!("Detected {} (hex: {})", detection.format, detection.hex);
                let args = args.clone().with_hex(args.hex || detection.hex);
                Ok((detection.format, args))
            }
            None => {
                log::error!("Could not detect the format of the input");
                Err(GeoError::UnknownFormat(
                    "could not detect the input format".to_string(),
                ))
            }
        }
    }
}
