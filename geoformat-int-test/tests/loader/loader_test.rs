use geoformat::{
    Encoded, ErrorKind, Format, FormatArgs, GeoCodec, GeoCodecProvider, GeoResult, Geometry,
    GeometryType, GeometryValue, MultiPoint, Point,
};
use geoformat_int_test::test_util::{cleanup, create_test_context, run_test};

/// Reads every `<wpt lat=".." lon=".."/>` of a GPX document as one point.
struct WaypointCodec;

impl GeoCodecProvider for WaypointCodec {
    fn format(&self) -> Format {
        Format::Gpx
    }

    fn read(&self, raw: &[u8], _args: &FormatArgs) -> GeoResult<Geometry> {
        let text = String::from_utf8_lossy(raw);
        let attribute = |tag: &str, name: &str| -> Option<f64> {
            let start = tag.find(&format!("{}=\"", name))? + name.len() + 2;
            let end = start + tag[start..].find('"')?;
            tag[start..end].parse().ok()
        };

        let mut points = Vec::new();
        for tag in text.split("<wpt").skip(1) {
            match (attribute(tag, "lon"), attribute(tag, "lat")) {
                (Some(x), Some(y)) => points.push(Point::new(x, y)),
                _ => return Err(geoformat::GeoError::parse("gpx", "waypoint without lat/lon")),
            }
        }
        Ok(Geometry::new(MultiPoint::new(points)))
    }

    fn write(&self, _geometry: &Geometry, _args: &FormatArgs) -> GeoResult<Option<Encoded>> {
        Ok(None)
    }
}

#[test]
fn test_load_file_per_format() {
    run_test(
        create_test_context,
        |ctx| {
            let loader = ctx.loader();
            let args = FormatArgs::default();

            let wkt = ctx.write_fixture("shape.wkt", b"POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))\n")?;
            let json = ctx.write_fixture(
                "shape.json",
                br#"{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}"#,
            )?;
            let expected = loader.load_file(&wkt, None, &args)?;
            assert_eq!(expected.area(), 100.0);

            let wkb_bytes = loader
                .write(&expected, Format::Wkb, &args)?
                .map(Encoded::into_bytes)
                .unwrap_or_default();
            let wkb = ctx.write_fixture("shape.wkb", &wkb_bytes)?;

            assert_eq!(loader.load_file(&json, None, &args)?, expected);
            assert_eq!(loader.load_file(&wkb, None, &args)?, expected);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_load_file_errors() {
    run_test(
        create_test_context,
        |ctx| {
            let loader = ctx.loader();
            let args = FormatArgs::default();

            let missing = std::path::Path::new(ctx.path()).join("missing.wkt");
            assert_eq!(loader.load_file(&missing, None, &args).unwrap_err().kind(), ErrorKind::IOError);

            let empty = ctx.write_fixture("empty.txt", b"")?;
            assert_eq!(
                loader.load_file(&empty, None, &args).unwrap_err().kind(),
                ErrorKind::UnknownFormat
            );

            let broken = ctx.write_fixture("broken.wkt", b"LINESTRING (0 0, 1")?;
            assert_eq!(loader.load_file(&broken, None, &args).unwrap_err().kind(), ErrorKind::ParseError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_hex_wkb_detection() {
    run_test(
        create_test_context,
        |ctx| {
            let loader = ctx.loader();
            let args = FormatArgs::default();

            let point = loader.load(b"0101000000000000000000F03F0000000000000040", None, &args)?;
            assert_eq!(point.value(), &GeometryValue::from(Point::new(1.0, 2.0)));

            // lower case and surrounding whitespace are accepted
            let lower = loader.load(b"\n0101000000000000000000f03f0000000000000040 \n", None, &args)?;
            assert_eq!(lower, point);

            let ewkb = loader.write(
                &Geometry::with_srid(Point::new(1.0, 2.0), Some(4326)),
                Format::Ewkb,
                &FormatArgs::default().with_hex(true),
            )?;
            let text = ewkb.as_ref().and_then(Encoded::as_text).unwrap_or_default().to_string();
            assert!(text.starts_with("0101000020"), "{}", text);

            let read = loader.load(text.as_bytes(), None, &args)?;
            assert_eq!(read.srid(), Some(4326));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_custom_codec() {
    run_test(
        create_test_context,
        |ctx| {
            let loader = ctx.loader();
            let gpx = br#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="52.518611" lon="13.376111"><name>Reichstag</name></wpt>
  <wpt lat="52.516272" lon="13.377722"><name>Brandenburger Tor</name></wpt>
</gpx>"#;

            let err = loader.load(gpx, None, &FormatArgs::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownFormat);

            loader.register(GeoCodec::new(WaypointCodec));
            assert!(loader.registry().formats().contains(&Format::Gpx));

            let waypoints = loader.load(gpx, None, &FormatArgs::default())?;
            assert_eq!(waypoints.geometry_type(), GeometryType::MultiPoint);
            assert_eq!(waypoints.num_geometries(), 2);

            // both items reduce into one multipoint
            let all = loader.load_all([&gpx[..], &gpx[..]], None, &FormatArgs::default())?;
            assert_eq!(all.geometry_type(), GeometryType::MultiPoint);
            assert_eq!(all.num_geometries(), 4);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_load_all_mixed_formats_with_hint() {
    run_test(
        create_test_context,
        |ctx| {
            let loader = ctx.loader();
            let args = FormatArgs::default();

            let features = br#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,1]}},
                {"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[0,0],[2,2]]}}
            ]}"#;
            let collection = loader.load(features, None, &args)?;
            assert_eq!(collection.geometry_type(), GeometryType::GeometryCollection);

            let lines = loader.load_all(
                ["LINESTRING (0 0, 1 1)", "MULTILINESTRING ((2 2, 3 3), (4 4, 5 5))"],
                Some(Format::Wkt),
                &args,
            )?;
            assert_eq!(lines.geometry_type(), GeometryType::MultiLineString);
            assert_eq!(lines.num_geometries(), 3);

            let err = loader
                .load_all(["POINT (0 0)", r#"{"type":"Point","coordinates":[1,1]}"#], None, &args)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_shared_loader_across_threads() {
    run_test(
        create_test_context,
        |ctx| {
            let loader = ctx.loader();
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let loader = loader.clone();
                    std::thread::spawn(move || {
                        let text = format!("POINT ({} {})", i, i * 2);
                        let geometry = loader.load(text.as_bytes(), None, &FormatArgs::default())?;
                        let json = loader.write(&geometry, Format::Json, &FormatArgs::default())?;
                        let back = loader.load(
                            json.map(Encoded::into_bytes).unwrap_or_default().as_slice(),
                            None,
                            &FormatArgs::default(),
                        )?;
                        assert_eq!(back, geometry);
                        Ok::<_, geoformat::GeoError>(())
                    })
                })
                .collect();

            for handle in handles {
                handle.join().expect("loader thread panicked")?;
            }
            Ok(())
        },
        cleanup,
    )
}
