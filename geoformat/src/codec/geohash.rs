//! GeoHash: base-32 names for recursively bisected latitude/longitude cells.
//!
//! Bits alternate between longitude and latitude, starting with longitude at
//! global bit 0, five bits per symbol.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::codec::{text_input, GeoCodecProvider};
use crate::config::GeoConfig;
use crate::errors::{GeoError, GeoResult};
use crate::format::{Encoded, Format, FormatArgs};
use crate::geometry::{Coordinate, Geometry, GeometryValue, LineString, Point, Polygon};

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Longest hash accepted or produced. Past 20 symbols a cell spans only a
/// few `f64` steps and its centre no longer re-encodes to the same hash.
pub const MAX_HASH_LENGTH: usize = 20;

/// Most decimals used when rounding a decoded centre.
const MAX_CENTER_DECIMALS: i32 = 15;

const FORMAT: &str = "geohash";

/// Neighbour tables per direction, `[even length, odd length]`.
const NEIGHBOURS: [[&[u8; 32]; 2]; 4] = [
    // top
    [b"p0r21436x8zb9dcf5h7kjnmqesgutwvy", b"bc01fg45238967deuvhjyznpkmstqrwx"],
    // right
    [b"bc01fg45238967deuvhjyznpkmstqrwx", b"p0r21436x8zb9dcf5h7kjnmqesgutwvy"],
    // bottom
    [b"14365h7k9dcfesgujnmqp0r2twvyx8zb", b"238967debc01fg45kmstqrwxuvhjyznp"],
    // left
    [b"238967debc01fg45kmstqrwxuvhjyznp", b"14365h7k9dcfesgujnmqp0r2twvyx8zb"],
];

/// Symbols on the edge of their parent cell, per direction.
const BORDERS: [[&str; 2]; 4] = [
    ["prxz", "bcfguvyz"],
    ["bcfguvyz", "prxz"],
    ["028b", "0145hjnp"],
    ["0145hjnp", "028b"],
];

/// Direction of an adjacent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    fn index(&self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Right => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
        }
    }
}

impl FromStr for Direction {
    type Err = GeoError;

    /// Accepts `top/right/bottom/left` and `north/east/south/west`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" | "north" => Ok(Direction::Top),
            "right" | "east" => Ok(Direction::Right),
            "bottom" | "south" => Ok(Direction::Bottom),
            "left" | "west" => Ok(Direction::Left),
            other => {
                log::error!("Unknown direction '{}'", other);
                Err(GeoError::InvalidGeometry(format!("unknown direction '{}'", other)))
            }
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The cell named by a hash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoHashCell {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    /// Half-height of the cell
    pub lat_error: f64,
    /// Half-width of the cell
    pub lon_error: f64,
}

impl GeoHashCell {
    /// Cell midpoint, rounded to the fewest decimals that keep it strictly
    /// inside the cell. The exact midpoint is used when rounding would leave it.
    pub fn center(&self) -> Point {
        let lon = (self.min_lon + self.max_lon) / 2.0;
        let lat = (self.min_lat + self.max_lat) / 2.0;
        let rounded = Point::new(round_within(lon, self.lon_error), round_within(lat, self.lat_error));
        if self.contains(&rounded) {
            rounded
        } else {
            Point::new(lon, lat)
        }
    }

    /// The cell as a closed ring polygon, starting at the north-west corner.
    pub fn to_polygon(&self) -> Polygon {
        let ring = [
            (self.min_lon, self.max_lat),
            (self.max_lon, self.max_lat),
            (self.max_lon, self.min_lat),
            (self.min_lon, self.min_lat),
            (self.min_lon, self.max_lat),
        ];
        Polygon::new(vec![LineString::from_coordinates(
            ring.iter().map(|&(x, y)| Coordinate::new(x, y)).collect(),
        )])
    }

    pub fn contains(&self, point: &Point) -> bool {
        match (point.x(), point.y()) {
            (Some(x), Some(y)) => {
                x > self.min_lon && x <= self.max_lon && y > self.min_lat && y <= self.max_lat
            }
            _ => false,
        }
    }
}

/// Rounds `value` to `d = max(0, floor(-log10(2 * error)) + 1)` decimals.
fn round_within(value: f64, error: f64) -> f64 {
    let decimals = ((-(2.0 * error).log10()).floor() as i32 + 1).clamp(0, MAX_CENTER_DECIMALS);
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// GeoHash encoder/decoder and neighbour algebra.
///
/// As a codec, `read` yields the cell centre (or the cell polygon with
/// `as_grid`), and `write` hashes a point or the smallest cell containing a
/// geometry's envelope.
pub struct GeoHashCodec {
    config: GeoConfig,
}

impl Default for GeoHashCodec {
    fn default() -> Self {
        Self::new(GeoConfig::default())
    }
}

impl GeoHashCodec {
    pub fn new(config: GeoConfig) -> Self {
        GeoHashCodec { config }
    }

    /// Encodes a point, bisecting until the cell half-size is at most
    /// `precision` degrees on one axis.
    ///
    /// Without a precision one is derived from the fractional digits of the
    /// coordinates: half a unit in the last digit of the more precise one.
    pub fn encode(&self, point: &Point, precision: Option<f64>) -> GeoResult<String> {
        let (x, y) = finite_xy(point)?;
        let precision = match precision {
            Some(p) if p.is_finite() && p > 0.0 => p,
            Some(p) => {
                log::error!("GeoHash precision must be a positive number, got {}", p);
                return Err(GeoError::InvalidGeometry(format!(
                    "GeoHash precision must be a positive number, got {}",
                    p
                )));
            }
            None => self.auto_precision(x, y),
        };
        Ok(encode_xy(x, y, |_, error| error <= precision))
    }

    /// Encodes a point to a hash of exactly `length` symbols.
    pub fn encode_with_length(&self, point: &Point, length: usize) -> GeoResult<String> {
        let (x, y) = finite_xy(point)?;
        if !(1..=MAX_HASH_LENGTH).contains(&length) {
            log::error!("GeoHash length must be between 1 and {}", MAX_HASH_LENGTH);
            return Err(GeoError::InvalidGeometry(format!(
                "GeoHash length must be between 1 and {}, got {}",
                MAX_HASH_LENGTH, length
            )));
        }
        Ok(encode_xy(x, y, |len, _| len >= length))
    }

    fn auto_precision(&self, x: f64, y: f64) -> f64 {
        let max_digits = self.config.max_auto_digits();
        let digits = fraction_digits(x).max(fraction_digits(y)).min(max_digits);
        10f64.powi(-(digits as i32)) / 2.0
    }

    /// Decodes a hash into its cell.
    pub fn decode(&self, hash: &str) -> GeoResult<GeoHashCell> {
        let symbols = symbols(hash)?;

        let (mut min_lat, mut max_lat) = (-90.0, 90.0);
        let (mut min_lon, mut max_lon) = (-180.0, 180.0);
        let (mut lat_error, mut lon_error) = (90.0, 180.0);

        for (position, value) in symbols.into_iter().enumerate() {
            let lon_first = position % 2 == 0;
            for bit in (0..5).rev() {
                let set = (value >> bit) & 1 == 1;
                let is_lon = ((4 - bit) % 2 == 0) == lon_first;
                let (min, max) = if is_lon {
                    (&mut min_lon, &mut max_lon)
                } else {
                    (&mut min_lat, &mut max_lat)
                };
                let mid = (*min + *max) / 2.0;
                if set {
                    *min = mid;
                } else {
                    *max = mid;
                }
            }
            if lon_first {
                lat_error /= 4.0;
                lon_error /= 8.0;
            } else {
                lat_error /= 8.0;
                lon_error /= 4.0;
            }
        }

        Ok(GeoHashCell {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            lat_error,
            lon_error,
        })
    }

    /// The hash of the same length next to `hash` in `direction`.
    ///
    /// Crossing the edge of the parent cell moves the parent first. The
    /// empty hash is its own neighbour.
    pub fn adjacent(&self, hash: &str, direction: Direction) -> GeoResult<String> {
        symbols(hash)?;
        Ok(adjacent_unchecked(hash.as_bytes(), direction))
    }

    /// All 8 surrounding cells, clockwise from the top one.
    pub fn neighbours(&self, hash: &str) -> GeoResult<[String; 8]> {
        let top = self.adjacent(hash, Direction::Top)?;
        let right = self.adjacent(hash, Direction::Right)?;
        let bottom = self.adjacent(hash, Direction::Bottom)?;
        let left = self.adjacent(hash, Direction::Left)?;
        let top_right = adjacent_unchecked(top.as_bytes(), Direction::Right);
        let bottom_right = adjacent_unchecked(bottom.as_bytes(), Direction::Right);
        let bottom_left = adjacent_unchecked(bottom.as_bytes(), Direction::Left);
        let top_left = adjacent_unchecked(top.as_bytes(), Direction::Left);
        Ok([top, top_right, right, bottom_right, bottom, bottom_left, left, top_left])
    }

    /// Decodes a hash to its centre point, or to the cell polygon when
    /// `as_grid` is set.
    pub fn read_str(&self, hash: &str, as_grid: bool) -> GeoResult<Geometry> {
        let cell = self.decode(hash.trim())?;
        if as_grid {
            Ok(Geometry::new(cell.to_polygon()))
        } else {
            Ok(Geometry::new(cell.center()))
        }
    }

    /// Hashes a geometry. `None` for an empty geometry.
    ///
    /// Points are encoded directly. Other geometries get the longest prefix
    /// shared by the hashes of their envelope corners, which is the smallest
    /// cell that holds the whole envelope (empty when it spans top-level
    /// cells).
    pub fn write_geometry(&self, geometry: &Geometry, precision: Option<f64>) -> GeoResult<Option<String>> {
        if geometry.is_empty() {
            return Ok(None);
        }
        if let GeometryValue::Point(point) = geometry.value() {
            return self.encode(point, precision).map(Some);
        }

        let Some(envelope) = geometry.envelope() else {
            return Ok(None);
        };
        let precision = self.config.envelope_precision();
        let mut hashes = Vec::with_capacity(4);
        for corner in envelope.corners() {
            hashes.push(self.encode(&Point::from_coordinate(corner), Some(precision))?);
        }

        let first = hashes[0].as_bytes();
        let shared = (0..first.len())
            .take_while(|&i| hashes.iter().all(|h| h.as_bytes().get(i) == Some(&first[i])))
            .count();
        Ok(Some(hashes[0][..shared].to_string()))
    }
}

impl GeoCodecProvider for GeoHashCodec {
    fn format(&self) -> Format {
        Format::GeoHash
    }

    fn read(&self, raw: &[u8], args: &FormatArgs) -> GeoResult<Geometry> {
        self.read_str(text_input(raw, Format::GeoHash)?, args.as_grid)
    }

    fn write(&self, geometry: &Geometry, args: &FormatArgs) -> GeoResult<Option<Encoded>> {
        Ok(self.write_geometry(geometry, args.precision)?.map(Encoded::Text))
    }
}

fn finite_xy(point: &Point) -> GeoResult<(f64, f64)> {
    match (point.x(), point.y()) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok((x, y)),
        (Some(x), Some(y)) => {
            log::error!("Cannot hash non-finite coordinate ({}, {})", x, y);
            Err(GeoError::InvalidGeometry(format!(
                "cannot hash non-finite coordinate ({}, {})",
                x, y
            )))
        }
        _ => {
            log::error!("Cannot hash an empty point");
            Err(GeoError::InvalidGeometry("cannot hash an empty point".to_string()))
        }
    }
}

/// Fractional digits in the shortest round-trip rendering of `value`.
fn fraction_digits(value: f64) -> usize {
    let text = value.to_string();
    match text.split_once('.') {
        Some((_, fraction)) => fraction.trim_end_matches('0').len(),
        None => 0,
    }
}

/// Bisects until `done(symbols_written, min_half_size)` holds.
fn encode_xy(x: f64, y: f64, done: impl Fn(usize, f64) -> bool) -> String {
    let (mut min_lat, mut max_lat) = (-90.0, 90.0);
    let (mut min_lon, mut max_lon) = (-180.0, 180.0);
    let (mut lat_error, mut lon_error) = (90.0_f64, 180.0_f64);
    let mut hash = String::new();
    let mut bit = 0usize;

    loop {
        let mut symbol = 0usize;
        for _ in 0..5 {
            symbol <<= 1;
            if bit % 2 == 0 {
                let mid = (min_lon + max_lon) / 2.0;
                if x > mid {
                    symbol |= 1;
                    min_lon = mid;
                } else {
                    max_lon = mid;
                }
                lon_error /= 2.0;
            } else {
                let mid = (min_lat + max_lat) / 2.0;
                if y > mid {
                    symbol |= 1;
                    min_lat = mid;
                } else {
                    max_lat = mid;
                }
                lat_error /= 2.0;
            }
            bit += 1;
        }
        hash.push(BASE32[symbol] as char);

        if done(hash.len(), lat_error.min(lon_error)) || hash.len() >= MAX_HASH_LENGTH {
            return hash;
        }
    }
}

/// Symbol values of a hash; empty, overlong and foreign-character hashes are
/// rejected.
fn symbols(hash: &str) -> GeoResult<Vec<u8>> {
    if hash.is_empty() {
        log::error!("Empty geohash");
        return Err(GeoError::parse(FORMAT, "empty geohash"));
    }
    if hash.chars().count() > MAX_HASH_LENGTH {
        log::error!("Geohash '{}' is longer than {} symbols", hash, MAX_HASH_LENGTH);
        return Err(GeoError::parse(
            FORMAT,
            format!("geohash '{}' is longer than {} symbols", hash, MAX_HASH_LENGTH),
        ));
    }
    hash.chars()
        .enumerate()
        .map(|(position, c)| {
            BASE32
                .iter()
                .position(|&b| b as char == c)
                .map(|v| v as u8)
                .ok_or_else(|| {
                    log::error!("Invalid geohash character '{}' in '{}'", c, hash);
                    GeoError::parse(
                        FORMAT,
                        format!("invalid character '{}' at position {} in '{}'", c, position, hash),
                    )
                })
        })
        .collect()
}

fn adjacent_unchecked(hash: &[u8], direction: Direction) -> String {
    let Some((&last, base)) = hash.split_last() else {
        return String::new();
    };
    let parity = hash.len() % 2;
    let d = direction.index();

    let mut result = if !base.is_empty() && BORDERS[d][parity].as_bytes().contains(&last) {
        adjacent_unchecked(base, direction)
    } else {
        String::from_utf8_lossy(base).into_owned()
    };

    // every valid symbol occurs once in each neighbour table
    let index = NEIGHBOURS[d][parity]
        .iter()
        .position(|&c| c == last)
        .unwrap_or_default();
    result.push(BASE32[index] as char);
    result
}
