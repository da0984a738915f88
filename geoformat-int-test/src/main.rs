use geoformat::{
    Format, FormatArgs, GeoHashCodec, GeoResult, Geometry, GeometryValue, MultiPoint, Point,
};
use geoformat_int_test::test_util::{cleanup, create_test_context};
use rand::Rng;

fn main() -> GeoResult<()> {
    println!("Starting stress test...");
    let ctx = create_test_context()?;
    let loader = ctx.loader();
    let mut rng = rand::rng();

    let count = 100000;
    let points: Vec<Point> = (0..count)
        .map(|_| Point::new(rng.random_range(-180.0..180.0), rng.random_range(-90.0..90.0)))
        .collect();

    let start = std::time::Instant::now();
    let texts: Vec<String> = points.iter().map(|p| GeometryValue::from(p.clone()).to_string()).collect();
    println!("Wrote {} WKT points in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    let multi = loader.load_all(&texts, Some(Format::Wkt), &FormatArgs::default())?;
    println!(
        "Loaded and reduced {} WKT points in {:?}",
        multi.num_geometries(),
        start.elapsed()
    );

    let geohash = GeoHashCodec::default();
    let start = std::time::Instant::now();
    let mut hashes = Vec::with_capacity(count);
    for point in &points {
        hashes.push(geohash.encode_with_length(point, 12)?);
    }
    println!("Encoded {} geohashes in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    for hash in &hashes {
        geohash.decode(hash)?;
    }
    println!("Decoded {} geohashes in {:?}", count, start.elapsed());

    let geometry = Geometry::new(MultiPoint::new(points));
    for format in [Format::Wkt, Format::Wkb, Format::Json] {
        let start = std::time::Instant::now();
        let encoded = loader.write(&geometry, format, &FormatArgs::default())?;
        let bytes = encoded.map(|e| e.into_bytes()).unwrap_or_default();
        let written = start.elapsed();

        let start = std::time::Instant::now();
        let decoded = loader.load(&bytes, Some(format), &FormatArgs::default())?;
        println!(
            "{}: wrote {} bytes in {:?}, read back {} points in {:?}",
            format,
            bytes.len(),
            written,
            decoded.num_geometries(),
            start.elapsed()
        );
    }

    cleanup(ctx)?;
    Ok(())
}
