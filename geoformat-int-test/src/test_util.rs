use geoformat::engine::EngineHandle;
use geoformat::{
    BoundingBox, GeoConfig, GeoError, GeoResult, Geometry, GeometryEngine, GeometryEngineProvider,
    GeometryValue, Loader, Point, WktCodec,
};
use std::backtrace::Backtrace;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::{env, fs};

/// Runs a test between its setup and teardown.
///
/// Teardown runs even when the test fails or panics; the failure is reported
/// with the captured backtrace afterwards.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> GeoResult<()>,
    B: Fn() -> GeoResult<TestContext>,
    A: Fn(TestContext) -> GeoResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let backtrace = Backtrace::capture();
    let test_ctx = ctx.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| test(test_ctx)));
    let after_result = after(ctx);

    let failure = match result {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("Test failed: {:?}", e)),
        Err(panic_err) => Some(if let Some(s) = panic_err.downcast_ref::<&str>() {
            format!("Panic: {}", s)
        } else if let Some(s) = panic_err.downcast_ref::<String>() {
            format!("Panic: {}", s)
        } else {
            "Panic: unknown payload".to_string()
        }),
    };

    if let Some(failure) = failure {
        eprintln!("\n==================== TEST FAILED ====================");
        eprintln!("{}", failure);
        let bt = backtrace.to_string();
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
        eprintln!("=====================================================\n");
        panic!("{}", failure);
    }

    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    loader: Loader,
    engine: Option<Arc<ReferenceEngine>>,
}

impl TestContext {
    pub fn new(path: String, loader: Loader, engine: Option<Arc<ReferenceEngine>>) -> Self {
        Self {
            path,
            loader,
            engine,
        }
    }

    /// Scratch directory for fixture files.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn loader(&self) -> Loader {
        self.loader.clone()
    }

    pub fn config(&self) -> GeoConfig {
        self.loader.config().clone()
    }

    pub fn engine(&self) -> Option<Arc<ReferenceEngine>> {
        self.engine.clone()
    }

    /// Writes a fixture file into the scratch directory.
    pub fn write_fixture(&self, name: &str, content: &[u8]) -> GeoResult<PathBuf> {
        let path = PathBuf::from(&self.path).join(name);
        fs::write(&path, content)?;
        Ok(path)
    }
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    let temp_dir = env::temp_dir();
    temp_dir.join(id.to_string()).to_string_lossy().into_owned()
}

pub fn create_test_context() -> GeoResult<TestContext> {
    let path = random_path();
    fs::create_dir_all(&path)?;
    Ok(TestContext::new(path, Loader::default(), None))
}

pub fn create_engine_test_context() -> GeoResult<TestContext> {
    let path = random_path();
    fs::create_dir_all(&path)?;

    let engine = Arc::new(ReferenceEngine::default());
    let config = GeoConfig::builder()
        .engine(GeometryEngine::from_arc(engine.clone()))
        .build()?;
    Ok(TestContext::new(path, Loader::new(config), Some(engine)))
}

pub fn cleanup(ctx: TestContext) -> GeoResult<()> {
    if std::path::Path::new(ctx.path()).exists() {
        fs::remove_dir_all(ctx.path())?;
    }
    Ok(())
}

/// A conforming engine built from the library's own algorithms.
///
/// Every accelerated call is counted so tests can tell which path ran.
/// Boolean set operations are limited to envelope-aligned rectangles.
#[derive(Default)]
pub struct ReferenceEngine {
    calls: AtomicUsize,
}

impl ReferenceEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl GeometryEngineProvider for ReferenceEngine {
    fn name(&self) -> &str {
        "reference"
    }

    fn parse_wkt(&self, wkt: &str) -> Option<GeoResult<Geometry>> {
        self.hit();
        Some(WktCodec::new(GeoConfig::default()).read_str(wkt))
    }

    fn write_wkt(&self, geometry: &Geometry) -> Option<String> {
        self.hit();
        Some(geometry.value().to_string())
    }

    fn area(&self, geometry: &GeometryValue) -> Option<f64> {
        self.hit();
        Some(geometry.area())
    }

    fn centroid(&self, geometry: &GeometryValue) -> Option<Point> {
        self.hit();
        match geometry {
            GeometryValue::MultiPoint(mp) if !mp.is_empty() => {
                let points = geometry.points();
                let n = points.len() as f64;
                let x = points.iter().filter_map(|p| p.x()).sum::<f64>() / n;
                let y = points.iter().filter_map(|p| p.y()).sum::<f64>() / n;
                Some(Point::new(x, y))
            }
            other => other.centroid(),
        }
    }

    fn distance(&self, a: &GeometryValue, b: &GeometryValue) -> Option<f64> {
        self.hit();
        match (a, b) {
            (GeometryValue::Point(p), GeometryValue::Point(q)) => p.distance(q),
            _ => None,
        }
    }

    fn intersection(&self, a: &GeometryValue, b: &GeometryValue) -> Option<GeoResult<GeometryValue>> {
        self.hit();
        let (a, b) = (a.envelope()?, b.envelope()?);
        Some(match a.intersection(&b) {
            Some(overlap) => Ok(overlap.to_polygon().into()),
            None => Err(GeoError::InvalidGeometry("envelopes are disjoint".to_string())),
        })
    }

    fn prepare(&self, geometry: &GeometryValue) -> Option<EngineHandle> {
        self.hit();
        let envelope: BoundingBox = geometry.envelope()?;
        Some(Arc::new(envelope))
    }
}
