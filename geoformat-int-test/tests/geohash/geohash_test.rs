#[cfg(test)]
mod geohash_tests {
    use geoformat::{
        Direction, ErrorKind, Format, FormatArgs, GeoHashCodec, Geometry, GeometryType, GeometryValue,
        LineString, Loader, Point,
    };
    use geoformat::codec::geohash::MAX_HASH_LENGTH;
    use rand::Rng;

    const BASE32: &[u8] = b"0123456789bcdefghjkmnpqrstuvwxyz";

    fn random_hash(rng: &mut impl Rng, length: usize) -> String {
        (0..length)
            .map(|_| BASE32[rng.random_range(0..BASE32.len())] as char)
            .collect()
    }

    #[test]
    fn test_centre_encodes_back_to_hash() {
        let geohash = GeoHashCodec::default();
        let mut rng = rand::rng();

        for _ in 0..1000 {
            let length = rng.random_range(1..=MAX_HASH_LENGTH);
            let hash = random_hash(&mut rng, length);
            let cell = geohash.decode(&hash).unwrap();
            let centre = cell.center();

            assert!(cell.contains(&centre), "{} centre {:?}", hash, centre);
            assert_eq!(geohash.encode_with_length(&centre, length).unwrap(), hash);
        }
    }

    #[test]
    fn test_random_points_fall_in_their_cell() {
        let geohash = GeoHashCodec::default();
        let mut rng = rand::rng();

        for _ in 0..1000 {
            let point = Point::new(rng.random_range(-179.9..179.9), rng.random_range(-89.9..89.9));
            let hash = geohash.encode_with_length(&point, 9).unwrap();
            let cell = geohash.decode(&hash).unwrap();

            assert!(cell.min_lon <= point.x().unwrap() && point.x().unwrap() <= cell.max_lon);
            assert!(cell.min_lat <= point.y().unwrap() && point.y().unwrap() <= cell.max_lat);
            // shorter hashes name the enclosing cells
            assert!(geohash.encode_with_length(&point, 5).unwrap().starts_with(&hash[..5]));
        }
    }

    #[test]
    fn test_walking_right_circles_the_globe() {
        let geohash = GeoHashCodec::default();
        let mut rng = rand::rng();

        for length in 1..=3 {
            let start = random_hash(&mut rng, length);
            // one column per longitude bit pattern
            let columns = 1usize << (5 * length).div_ceil(2);
            let mut hash = start.clone();
            for step in 1..=columns {
                hash = geohash.adjacent(&hash, Direction::Right).unwrap();
                if step < columns {
                    assert_ne!(hash, start, "{} returned early after {} steps", start, step);
                }
            }
            assert_eq!(hash, start);
        }
    }

    #[test]
    fn test_known_neighbours() {
        let geohash = GeoHashCodec::default();
        assert_eq!(geohash.adjacent("xn7", Direction::Top).unwrap(), "xne");
        assert_eq!(geohash.adjacent("xn7", Direction::Right).unwrap(), "xnk");
        assert_eq!(geohash.adjacent("xn7", Direction::Bottom).unwrap(), "xn5");
        assert_eq!(geohash.adjacent("xn7", Direction::Left).unwrap(), "xn6");

        let around = geohash.neighbours("xn7").unwrap();
        assert_eq!(around, ["xne", "xns", "xnk", "xnh", "xn5", "xn4", "xn6", "xnd"].map(String::from));
    }

    #[test]
    fn test_neighbours_touch_the_cell() {
        let geohash = GeoHashCodec::default();
        let cell = geohash.decode("u4pruyd").unwrap();

        for neighbour in geohash.neighbours("u4pruyd").unwrap() {
            let other = geohash.decode(&neighbour).unwrap();
            let touches_lon = other.max_lon == cell.min_lon
                || other.min_lon == cell.max_lon
                || other.min_lon == cell.min_lon;
            let touches_lat = other.max_lat == cell.min_lat
                || other.min_lat == cell.max_lat
                || other.min_lat == cell.min_lat;
            assert!(touches_lon && touches_lat, "{}", neighbour);
        }
    }

    #[test]
    fn test_grid_reading_through_loader() {
        let loader = Loader::default();
        let centre = loader.load(b"u4pruydqqvj", None, &FormatArgs::default()).unwrap();
        let grid = loader
            .load(b"u4pruydqqvj", None, &FormatArgs::default().with_as_grid(true))
            .unwrap();

        assert_eq!(centre.geometry_type(), GeometryType::Point);
        assert_eq!(grid.geometry_type(), GeometryType::Polygon);

        let geohash = GeoHashCodec::default();
        let cell = geohash.decode("u4pruydqqvj").unwrap();
        assert!(cell.contains(&centre.centroid().unwrap()));
        assert_eq!(grid.value(), &GeometryValue::from(cell.to_polygon()));
    }

    #[test]
    fn test_geometry_hash_is_common_cell() {
        let loader = Loader::default();
        let point = Geometry::new(Point::new(10.40744, 57.64911));
        let hash = loader
            .write(&point, Format::GeoHash, &FormatArgs::default())
            .unwrap()
            .unwrap();
        assert_eq!(hash.as_text(), Some("u4pruydqqv"));

        let coarse = loader
            .write(&point, Format::GeoHash, &FormatArgs::default().with_precision(1.0))
            .unwrap()
            .unwrap();
        assert_eq!(coarse.as_text(), Some("u4p"));

        let line = Geometry::new(LineString::new(vec![
            Point::new(10.4074, 57.6491),
            Point::new(10.4075, 57.6492),
        ]));
        let common = loader
            .write(&line, Format::GeoHash, &FormatArgs::default())
            .unwrap()
            .unwrap();
        let text = common.as_text().unwrap();
        assert!(text.starts_with("u4pru"), "{}", text);

        // the shared cell holds both ends of the line
        let cell = GeoHashCodec::default().decode(text).unwrap();
        assert!(cell.min_lon <= 10.4074 && 10.4075 <= cell.max_lon);
        assert!(cell.min_lat <= 57.6491 && 57.6492 <= cell.max_lat);
    }

    #[test]
    fn test_invalid_hashes() {
        let geohash = GeoHashCodec::default();
        for hash in ["", "abc", "u4pa", "U4PR", "u4p r"] {
            assert_eq!(geohash.decode(hash).unwrap_err().kind(), ErrorKind::ParseError, "{}", hash);
        }
        assert!(geohash.adjacent("ai", Direction::Top).is_err());
        let overlong = "u4pruydqqvj".repeat(2);
        assert_eq!(geohash.decode(&overlong).unwrap_err().kind(), ErrorKind::ParseError);
        assert!(geohash.encode_with_length(&Point::new(0.0, 0.0), 0).is_err());
        assert!(geohash.encode(&Point::empty(), None).is_err());
    }
}
