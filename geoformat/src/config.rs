//! Configuration handed to the codecs, the loader and the spatial operations.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use crate::engine::GeometryEngine;
use crate::errors::{GeoError, GeoResult};

/// Default precision (degrees) used to hash the corners of an envelope.
pub const DEFAULT_ENVELOPE_PRECISION: f64 = 1e-7;

/// Default cap on the fractional digits read when deriving a GeoHash precision.
pub const DEFAULT_MAX_AUTO_DIGITS: usize = 12;

/// Longest fractional part an `f64` can carry meaningfully.
const MAX_DIGITS_LIMIT: usize = 17;

const ENGINE_UNSET: u8 = 0;
const ENGINE_FORCED_ON: u8 = 1;
const ENGINE_FORCED_OFF: u8 = 2;

/// Shared configuration handle.
///
/// Cloning is cheap; all clones see the same engine state. There is no
/// process-wide configuration: every component receives the handle it
/// should use.
///
/// # Examples
///
/// ```rust
/// use geoformat::GeoConfig;
///
/// let config = GeoConfig::builder()
///     .max_auto_digits(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_auto_digits(), 8);
/// assert!(!config.engine_available());
/// ```
#[derive(Clone)]
pub struct GeoConfig {
    inner: Arc<GeoConfigInner>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoConfig {
    /// Creates a configuration with default values and no engine.
    pub fn new() -> Self {
        GeoConfig {
            inner: Arc::new(GeoConfigInner::new(
                None,
                DEFAULT_ENVELOPE_PRECISION,
                DEFAULT_MAX_AUTO_DIGITS,
            )),
        }
    }

    pub fn builder() -> GeoConfigBuilder {
        GeoConfigBuilder::new()
    }

    /// The configured engine, whether or not it is currently active.
    pub fn engine(&self) -> Option<&GeometryEngine> {
        self.inner.engine.as_ref()
    }

    /// Whether accelerated code paths should run.
    ///
    /// Without an override the engine is probed once and the answer cached.
    pub fn engine_available(&self) -> bool {
        self.inner.engine_available()
    }

    /// The engine to use for the current call, if any.
    pub fn active_engine(&self) -> Option<&GeometryEngine> {
        if self.engine_available() {
            self.inner.engine.as_ref()
        } else {
            None
        }
    }

    /// Overrides engine availability: `Some(true)` skips the probe,
    /// `Some(false)` forces the fallback paths, `None` restores probing.
    ///
    /// Intended for tests comparing the accelerated and fallback paths.
    pub fn force_engine(&self, state: Option<bool>) {
        self.inner.force_engine(state)
    }

    pub fn envelope_precision(&self) -> f64 {
        self.inner.envelope_precision
    }

    pub fn max_auto_digits(&self) -> usize {
        self.inner.max_auto_digits
    }
}

struct GeoConfigInner {
    /// Optional acceleration engine
    engine: Option<GeometryEngine>,
    /// Cached result of probing the engine
    available: OnceLock<bool>,
    /// Test override, one of the ENGINE_* states
    override_state: AtomicU8,
    envelope_precision: f64,
    max_auto_digits: usize,
}

impl GeoConfigInner {
    fn new(engine: Option<GeometryEngine>, envelope_precision: f64, max_auto_digits: usize) -> Self {
        GeoConfigInner {
            engine,
            available: OnceLock::new(),
            override_state: AtomicU8::new(ENGINE_UNSET),
            envelope_precision,
            max_auto_digits,
        }
    }

    fn engine_available(&self) -> bool {
        match self.override_state.load(Ordering::Acquire) {
            ENGINE_FORCED_OFF => false,
            ENGINE_FORCED_ON => self.engine.is_some(),
            _ => *self.available.get_or_init(|| match &self.engine {
                Some(engine) => {
                    let available = engine.is_available();
                    log::debug!("Geometry engine {} available: {}", engine.name(), available);
                    available
                }
                None => false,
            }),
        }
    }

    fn force_engine(&self, state: Option<bool>) {
        let value = match state {
            Some(true) => ENGINE_FORCED_ON,
            Some(false) => ENGINE_FORCED_OFF,
            None => ENGINE_UNSET,
        };
        self.override_state.store(value, Ordering::Release);
    }
}

/// Fluent builder for [`GeoConfig`].
///
/// The first invalid setting is remembered and returned from [`build`](Self::build);
/// later settings are ignored once an error has been captured.
#[derive(Default)]
pub struct GeoConfigBuilder {
    error: Option<GeoError>,
    engine: Option<GeometryEngine>,
    force_engine: Option<bool>,
    envelope_precision: Option<f64>,
    max_auto_digits: Option<usize>,
}

impl GeoConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an acceleration engine.
    pub fn engine(mut self, engine: GeometryEngine) -> Self {
        if self.error.is_none() {
            self.engine = Some(engine);
        }
        self
    }

    /// Starts the configuration with an engine override, see
    /// [`GeoConfig::force_engine`].
    pub fn force_engine(mut self, state: bool) -> Self {
        if self.error.is_none() {
            self.force_engine = Some(state);
        }
        self
    }

    /// Sets the precision (degrees) used to hash envelope corners.
    pub fn envelope_precision(mut self, precision: f64) -> Self {
        if self.error.is_none() {
            if precision.is_finite() && precision > 0.0 {
                self.envelope_precision = Some(precision);
            } else {
                log::error!("Envelope precision must be a positive number, got {}", precision);
                self.error = Some(GeoError::InvalidGeometry(format!(
                    "Envelope precision must be a positive number, got {}",
                    precision
                )));
            }
        }
        self
    }

    /// Caps the fractional digits read when deriving a GeoHash precision.
    pub fn max_auto_digits(mut self, digits: usize) -> Self {
        if self.error.is_none() {
            if (1..=MAX_DIGITS_LIMIT).contains(&digits) {
                self.max_auto_digits = Some(digits);
            } else {
                log::error!("Auto precision digits must be between 1 and {}", MAX_DIGITS_LIMIT);
                self.error = Some(GeoError::InvalidGeometry(format!(
                    "Auto precision digits must be between 1 and {}, got {}",
                    MAX_DIGITS_LIMIT, digits
                )));
            }
        }
        self
    }

    /// Returns the configuration, or the first error captured while building.
    pub fn build(self) -> GeoResult<GeoConfig> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let inner = GeoConfigInner::new(
            self.engine,
            self.envelope_precision.unwrap_or(DEFAULT_ENVELOPE_PRECISION),
            self.max_auto_digits.unwrap_or(DEFAULT_MAX_AUTO_DIGITS),
        );
        inner.force_engine(self.force_engine);

        Ok(GeoConfig {
            inner: Arc::new(inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GeometryEngineProvider;
    use crate::errors::ErrorKind;
    use std::sync::atomic::AtomicUsize;

    struct ProbedEngine {
        available: bool,
        probes: Arc<AtomicUsize>,
    }

    impl GeometryEngineProvider for ProbedEngine {
        fn name(&self) -> &str {
            "probed"
        }

        fn is_available(&self) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.available
        }
    }

    fn config_with(available: bool) -> (GeoConfig, Arc<AtomicUsize>) {
        let probes = Arc::new(AtomicUsize::new(0));
        let config = GeoConfig::builder()
            .engine(GeometryEngine::new(ProbedEngine {
                available,
                probes: probes.clone(),
            }))
            .build()
            .unwrap();
        (config, probes)
    }

    #[test]
    fn test_defaults() {
        let config = GeoConfig::default();
        assert!(config.engine().is_none());
        assert!(!config.engine_available());
        assert!(config.active_engine().is_none());
        assert_eq!(config.envelope_precision(), DEFAULT_ENVELOPE_PRECISION);
        assert_eq!(config.max_auto_digits(), DEFAULT_MAX_AUTO_DIGITS);
    }

    #[test]
    fn test_engine_probed_once() {
        let (config, probes) = config_with(true);
        assert!(config.engine_available());
        assert!(config.clone().engine_available());
        assert!(config.active_engine().is_some());
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unavailable_engine_is_inactive() {
        let (config, _) = config_with(false);
        assert!(config.engine().is_some());
        assert!(!config.engine_available());
        assert!(config.active_engine().is_none());
    }

    #[test]
    fn test_force_engine_override() {
        let (config, probes) = config_with(false);

        config.force_engine(Some(true));
        assert!(config.engine_available());
        config.force_engine(Some(false));
        assert!(!config.engine_available());
        assert_eq!(probes.load(Ordering::SeqCst), 0);

        config.force_engine(None);
        assert!(!config.engine_available());
        assert_eq!(probes.load(Ordering::SeqCst), 1);

        let bare = GeoConfig::default();
        bare.force_engine(Some(true));
        assert!(!bare.engine_available());
    }

    #[test]
    fn test_builder_force_engine() {
        let probes = Arc::new(AtomicUsize::new(0));
        let config = GeoConfig::builder()
            .engine(GeometryEngine::new(ProbedEngine {
                available: true,
                probes: probes.clone(),
            }))
            .force_engine(false)
            .build()
            .unwrap();
        assert!(!config.engine_available());
        assert_eq!(probes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_builder_keeps_first_error() {
        let err = GeoConfig::builder()
            .envelope_precision(-1.0)
            .max_auto_digits(99)
            .build()
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
        assert!(err.to_string().contains("Envelope precision"));

        assert!(GeoConfig::builder().max_auto_digits(0).build().is_err());
        assert!(GeoConfig::builder().envelope_precision(f64::NAN).build().is_err());
    }

    #[test]
    fn test_builder_values() {
        let config = GeoConfig::builder()
            .envelope_precision(1e-5)
            .max_auto_digits(6)
            .build()
            .unwrap();
        assert_eq!(config.envelope_precision(), 1e-5);
        assert_eq!(config.max_auto_digits(), 6);
    }
}
