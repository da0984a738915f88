#[cfg(test)]
mod wkt_tests {
    use geoformat::{
        Coordinate, ErrorKind, GeoConfig, Geometry, GeometryType, GeometryValue, LineString,
        MultiPoint, Point, Polygon, WktCodec,
    };
    use rand::Rng;

    fn random_coordinate(rng: &mut impl Rng) -> Coordinate {
        Coordinate::new(rng.random_range(-180.0..180.0), rng.random_range(-90.0..90.0))
    }

    fn random_ring(rng: &mut impl Rng) -> LineString {
        let n = rng.random_range(3..12);
        let mut coords: Vec<Coordinate> = (0..n).map(|_| random_coordinate(rng)).collect();
        coords.push(coords[0]);
        LineString::from_coordinates(coords)
    }

    fn random_geometry(rng: &mut impl Rng) -> GeometryValue {
        match rng.random_range(0..4) {
            0 => Point::from_coordinate(random_coordinate(rng)).into(),
            1 => {
                let n = rng.random_range(2..20);
                LineString::from_coordinates((0..n).map(|_| random_coordinate(rng)).collect()).into()
            }
            2 => {
                let rings = rng.random_range(1..4);
                Polygon::new((0..rings).map(|_| random_ring(rng)).collect()).into()
            }
            _ => {
                let n = rng.random_range(1..10);
                MultiPoint::new((0..n).map(|_| Point::from_coordinate(random_coordinate(rng))).collect())
                    .into()
            }
        }
    }

    #[test]
    fn test_random_geometries_round_trip() {
        let codec = WktCodec::new(GeoConfig::default());
        let mut rng = rand::rng();

        for _ in 0..500 {
            let geometry = Geometry::new(random_geometry(&mut rng));
            let text = codec.write_string(&geometry);
            let read = codec.read_str(&text).unwrap();
            assert_eq!(read, geometry, "{}", text);
            // canonical output is a fixed point
            assert_eq!(codec.write_string(&read), text);
        }
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let codec = WktCodec::new(GeoConfig::default());
        let canonical = codec.read_str("MULTIPOINT ((10 40), (40 30))").unwrap();

        for text in [
            "multipoint ((10 40), (40 30))",
            "MultiPoint((10 40),(40 30))",
            "  MULTIPOINT (10 40, 40 30)  ",
            "MULTIPOINT\n(\t(10 40) ,\n(40 30))",
        ] {
            assert_eq!(codec.read_str(text).unwrap(), canonical, "{}", text);
        }
    }

    #[test]
    fn test_dimension_tags() {
        let codec = WktCodec::new(GeoConfig::default());

        let z = codec.read_str("POINT Z (1 2 3)").unwrap();
        assert!(z.has_z());
        assert!(!z.has_m());
        assert_eq!(codec.write_string(&z), "POINT Z (1 2 3)");

        let m = codec.read_str("LINESTRING M (0 0 4, 1 1 5)").unwrap();
        assert!(m.has_m());
        assert_eq!(codec.write_string(&m), "LINESTRING M (0 0 4, 1 1 5)");

        let zm = codec.read_str("POINT ZM (1 2 3 4)").unwrap();
        assert_eq!(zm.value(), &GeometryValue::from(Point::from_coordinate(
            Coordinate::new(1.0, 2.0).with_z(3.0).with_m(4.0)
        )));
    }

    #[test]
    fn test_extended_wkt() {
        let codec = WktCodec::extended(GeoConfig::default());
        let geometry = codec.read_str("SRID=3857;POINT (1 2)").unwrap();
        assert_eq!(geometry.srid(), Some(3857));
        assert_eq!(codec.write_string(&geometry), "SRID=3857;POINT (1 2)");

        let plain = WktCodec::new(GeoConfig::default());
        assert_eq!(plain.write_string(&geometry), "POINT (1 2)");
    }

    #[test]
    fn test_malformed_input() {
        let codec = WktCodec::new(GeoConfig::default());
        for text in [
            "",
            "POINT",
            "POINT (1)",
            "POINT (1 2",
            "POINT (1 2))",
            "POINT (a b)",
            "LINESTRING (0 0, )",
            "POLYGON ((0 0, 1 1)",
            "CIRCLE (0 0, 1)",
            "SRID=abc;POINT (1 2)",
            "GEOMETRYCOLLECTION (POINT (1 2), )",
        ] {
            let err = codec.read_str(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseError, "{}", text);
        }
    }

    #[test]
    fn test_nested_collection() {
        let codec = WktCodec::new(GeoConfig::default());
        let text = "GEOMETRYCOLLECTION (POINT (4 6), GEOMETRYCOLLECTION (LINESTRING (4 6, 7 10)))";
        let geometry = codec.read_str(text).unwrap();

        assert_eq!(geometry.geometry_type(), GeometryType::GeometryCollection);
        assert_eq!(geometry.num_geometries(), 2);
        assert_eq!(
            geometry.geometry_n(2).map(|g| g.geometry_type()),
            Some(GeometryType::GeometryCollection)
        );
        assert_eq!(codec.write_string(&geometry), text);
    }
}
