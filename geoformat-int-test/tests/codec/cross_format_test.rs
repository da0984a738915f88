#[cfg(test)]
mod cross_format_tests {
    use geoformat::{
        Coordinate, Encoded, Format, FormatArgs, Geometry, GeometryCollection, GeometryValue,
        LineString, Loader, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
    };

    fn line(coords: &[(f64, f64)]) -> LineString {
        LineString::from_coordinates(coords.iter().map(|&(x, y)| Coordinate::new(x, y)).collect())
    }

    fn polygon_with_hole() -> Polygon {
        Polygon::new(vec![
            line(&[(35.0, 10.0), (45.0, 45.0), (15.0, 40.0), (10.0, 20.0), (35.0, 10.0)]),
            line(&[(20.0, 30.0), (35.0, 35.0), (30.0, 20.0), (20.0, 30.0)]),
        ])
    }

    /// Geometries every lossless format can carry (no M values).
    fn samples() -> Vec<GeometryValue> {
        vec![
            Point::new(30.0, 10.0).into(),
            Point::new(-71.064544, 42.28787).into(),
            Point::from_coordinate(Coordinate::new(1.0, 2.0).with_z(3.0)).into(),
            Point::empty().into(),
            line(&[(30.0, 10.0), (10.0, 30.0), (40.0, 40.0)]).into(),
            LineString::empty().into(),
            polygon_with_hole().into(),
            Polygon::empty().into(),
            MultiPoint::new(vec![Point::new(10.0, 40.0), Point::new(40.0, 30.0)]).into(),
            MultiPoint::new(vec![Point::empty(), Point::new(1.0, 2.0)]).into(),
            MultiLineString::new(vec![
                line(&[(10.0, 10.0), (20.0, 20.0), (10.0, 40.0)]),
                line(&[(40.0, 40.0), (30.0, 30.0), (40.0, 20.0), (30.0, 10.0)]),
            ])
            .into(),
            MultiPolygon::new(vec![
                Polygon::new(vec![line(&[(30.0, 20.0), (45.0, 40.0), (10.0, 40.0), (30.0, 20.0)])]),
                polygon_with_hole(),
            ])
            .into(),
            GeometryCollection::new(vec![
                Point::new(4.0, 6.0).into(),
                line(&[(4.0, 6.0), (7.0, 10.0)]).into(),
                Polygon::empty().into(),
            ])
            .into(),
        ]
    }

    fn round_trip(loader: &Loader, geometry: &Geometry, format: Format, args: &FormatArgs) -> Geometry {
        let encoded = loader
            .write(geometry, format, args)
            .unwrap()
            .unwrap_or_else(|| panic!("{} could not write {}", format, geometry));
        // detection must route the written output back to a compatible codec
        loader
            .load(encoded.as_bytes(), None, &FormatArgs::default())
            .unwrap_or_else(|e| panic!("{} failed to read back {}: {}", format, geometry, e))
    }

    #[test]
    fn test_lossless_formats_round_trip() {
        let loader = Loader::default();
        let formats = [
            (Format::Wkt, FormatArgs::default()),
            (Format::Ewkt, FormatArgs::default()),
            (Format::Wkb, FormatArgs::default()),
            (Format::Wkb, FormatArgs::default().with_hex(true)),
            (Format::Ewkb, FormatArgs::default()),
            (Format::Json, FormatArgs::default()),
        ];

        for value in samples() {
            let geometry = Geometry::new(value);
            for (format, args) in &formats {
                let read = round_trip(&loader, &geometry, *format, args);
                assert_eq!(read, geometry, "{} via {} {:?}", geometry, format, args);
            }
        }
    }

    #[test]
    fn test_srid_survives_extended_formats() {
        let loader = Loader::default();
        let geometry = Geometry::with_srid(polygon_with_hole(), Some(4326));

        for format in [Format::Ewkt, Format::Ewkb] {
            let read = round_trip(&loader, &geometry, format, &FormatArgs::default());
            assert_eq!(read, geometry, "{}", format);
        }
        for format in [Format::Wkt, Format::Wkb, Format::Json] {
            let read = round_trip(&loader, &geometry, format, &FormatArgs::default());
            assert_eq!(read.srid(), None, "{}", format);
            assert_eq!(read.value(), geometry.value(), "{}", format);
        }
    }

    #[test]
    fn test_measures_survive_wkt_and_wkb() {
        let loader = Loader::default();
        let geometry = Geometry::new(LineString::new(vec![
            Point::from_coordinate(Coordinate::new(1.0, 2.0).with_m(5.0)),
            Point::from_coordinate(Coordinate::new(3.0, 4.0).with_m(6.0)),
        ]));

        for format in [Format::Wkt, Format::Wkb, Format::Ewkb] {
            let read = round_trip(&loader, &geometry, format, &FormatArgs::default());
            assert_eq!(read, geometry, "{}", format);
        }

        let json = loader.write(&geometry, Format::Json, &FormatArgs::default()).unwrap();
        let read = loader
            .load(json.unwrap().as_bytes(), None, &FormatArgs::default())
            .unwrap();
        assert!(!read.has_m());
    }

    #[test]
    fn test_wkt_text_matches_across_paths() {
        let loader = Loader::default();
        let wkt = "POLYGON ((35 10, 45 45, 15 40, 10 20, 35 10), (20 30, 35 35, 30 20, 20 30))";
        let from_wkt = loader.load(wkt.as_bytes(), None, &FormatArgs::default()).unwrap();

        let wkb = loader.write(&from_wkt, Format::Wkb, &FormatArgs::default()).unwrap().unwrap();
        let from_wkb = loader.load(wkb.as_bytes(), None, &FormatArgs::default()).unwrap();

        assert_eq!(
            loader.write(&from_wkb, Format::Wkt, &FormatArgs::default()).unwrap(),
            Some(Encoded::Text(wkt.to_string()))
        );
    }

    #[test]
    fn test_empty_collection_per_format() {
        let loader = Loader::default();
        let empty = Geometry::new(GeometryCollection::default());

        assert_eq!(
            loader.write(&empty, Format::Wkt, &FormatArgs::default()).unwrap(),
            Some(Encoded::Text("GEOMETRYCOLLECTION EMPTY".to_string()))
        );
        assert!(loader.write(&empty, Format::Wkb, &FormatArgs::default()).unwrap().is_some());
        assert_eq!(loader.write(&empty, Format::Json, &FormatArgs::default()).unwrap(), None);
        assert_eq!(loader.write(&empty, Format::GeoHash, &FormatArgs::default()).unwrap(), None);
    }
}
