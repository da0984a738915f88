use geoformat::{
    BoundingBox, Coordinate, ErrorKind, Format, FormatArgs, GeoError, Geometry, GeometryType,
    GeometryValue, LineString, MultiPoint, Point, Polygon, PreparedGeometry, SpatialOperations,
    WktCodec,
};
use geoformat_int_test::test_util::{cleanup, create_engine_test_context, create_test_context, run_test};
use std::sync::Arc;

fn square(x: f64, y: f64, size: f64) -> GeometryValue {
    BoundingBox::new(x, y, x + size, y + size).to_polygon().into()
}

fn engine_calls(ctx: &geoformat_int_test::test_util::TestContext) -> usize {
    ctx.engine().map(|engine| engine.calls()).unwrap_or_default()
}

#[test]
fn test_results_do_not_depend_on_engine() {
    run_test(
        create_engine_test_context,
        |ctx| {
            let config = ctx.config();
            let ops = SpatialOperations::new(config.clone());
            let codec = WktCodec::new(config.clone());
            let shape = codec.read_str("POLYGON ((0 0, 8 0, 8 6, 0 6, 0 0), (2 2, 4 2, 4 4, 2 4, 2 2))")?;

            let before = engine_calls(&ctx);
            let accelerated = (
                ops.area(shape.value()),
                ops.centroid(shape.value())?,
                codec.write_string(&shape),
            );
            assert!(engine_calls(&ctx) > before);

            config.force_engine(Some(false));
            let before = engine_calls(&ctx);
            let fallback = (
                ops.area(shape.value()),
                ops.centroid(shape.value())?,
                codec.write_string(&shape),
            );
            assert_eq!(engine_calls(&ctx), before);
            assert_eq!(accelerated, fallback);
            assert_eq!(fallback.0, 44.0);

            config.force_engine(None);
            assert!(config.active_engine().is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_engine_extends_coverage() {
    run_test(
        create_engine_test_context,
        |ctx| {
            let config = ctx.config();
            let ops = SpatialOperations::new(config.clone());
            let points: GeometryValue =
                MultiPoint::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 6.0)]).into();

            assert_eq!(ops.centroid(&points)?, Some(Point::new(2.0, 2.0)));

            config.force_engine(Some(false));
            assert_eq!(
                ops.centroid(&points).unwrap_err().kind(),
                ErrorKind::UnsupportedOperation
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_boolean_operations_need_engine() {
    run_test(
        create_test_context,
        |ctx| {
            let ops = SpatialOperations::new(ctx.config());
            let (a, b) = (square(0.0, 0.0, 4.0), square(2.0, 2.0, 4.0));

            let results: [Result<GeometryValue, GeoError>; 4] = [
                ops.intersection(&a, &b),
                ops.union(&a, &b),
                ops.difference(&a, &b),
                ops.sym_difference(&a, &b),
            ];
            for result in results {
                assert_eq!(result.unwrap_err().kind(), ErrorKind::UnsupportedOperation);
            }

            let line: GeometryValue =
                LineString::from_coordinates(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]).into();
            assert_eq!(
                ops.distance(&line, &a).unwrap_err().kind(),
                ErrorKind::UnsupportedOperation
            );
            assert_eq!(
                ops.distance(&Point::new(0.0, 0.0).into(), &Point::new(3.0, 4.0).into())?,
                5.0
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_intersection_with_engine() {
    run_test(
        create_engine_test_context,
        |ctx| {
            let ops = SpatialOperations::new(ctx.config());

            let overlap = ops.intersection(&square(0.0, 0.0, 4.0), &square(2.0, 2.0, 4.0))?;
            assert_eq!(overlap, square(2.0, 2.0, 2.0));
            assert_eq!(ops.area(&overlap), 4.0);

            let err = ops
                .intersection(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidGeometry);

            // the reference engine only accelerates intersection
            assert_eq!(
                ops.union(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0)).unwrap_err().kind(),
                ErrorKind::UnsupportedOperation
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_prepared_geometry_is_cached() {
    run_test(
        create_engine_test_context,
        |ctx| {
            let config = ctx.config();
            let prepared = PreparedGeometry::new(Geometry::new(Polygon::new(vec![
                LineString::from_coordinates(vec![
                    Coordinate::new(0.0, 0.0),
                    Coordinate::new(3.0, 0.0),
                    Coordinate::new(3.0, 3.0),
                    Coordinate::new(0.0, 0.0),
                ]),
            ])));
            assert!(!prepared.is_prepared());

            let calls = engine_calls(&ctx);
            let first = prepared.handle(&config).expect("engine should prepare");
            let second = prepared.handle(&config).expect("handle should be cached");
            assert_eq!(engine_calls(&ctx), calls + 1);
            assert!(Arc::ptr_eq(&first, &second));
            assert!(prepared.is_prepared());

            let envelope = first.downcast_ref::<BoundingBox>().copied();
            assert_eq!(envelope, Some(BoundingBox::new(0.0, 0.0, 3.0, 3.0)));
            // preparing leaves the geometry untouched
            assert_eq!(prepared.geometry_type(), GeometryType::Polygon);
            assert_eq!(prepared.area(), 4.5);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_prepared_geometry_without_engine() {
    run_test(
        create_engine_test_context,
        |ctx| {
            let config = ctx.config();
            config.force_engine(Some(false));

            let prepared = PreparedGeometry::new(Geometry::new(square(0.0, 0.0, 1.0)));
            assert!(prepared.handle(&config).is_none());
            assert!(!prepared.is_prepared());

            // a later activation can still prepare it
            config.force_engine(None);
            assert!(prepared.handle(&config).is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_engine_shared_across_threads() {
    run_test(
        create_engine_test_context,
        |ctx| {
            let loader = ctx.loader();
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let loader = loader.clone();
                    std::thread::spawn(move || {
                        let ops = SpatialOperations::new(loader.config().clone());
                        let mut total = 0.0;
                        for size in 1..=25 {
                            let text = format!(
                                "POLYGON ((0 0, {s} 0, {s} {s}, 0 {s}, 0 0))",
                                s = size + i
                            );
                            let geometry = loader.load(text.as_bytes(), Some(Format::Wkt), &FormatArgs::default())?;
                            total += ops.area(geometry.value());
                        }
                        Ok::<_, GeoError>(total)
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let total = handle.join().expect("engine thread panicked")?;
                let expected: f64 = (1..=25).map(|s| ((s + i) * (s + i)) as f64).sum();
                assert_eq!(total, expected);
            }
            // each load parses through the engine and each area is accelerated
            assert!(engine_calls(&ctx) >= 200);
            Ok(())
        },
        cleanup,
    )
}
