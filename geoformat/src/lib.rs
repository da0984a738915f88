//! # geoformat - vector geometry model and interchange codecs
//!
//! This crate provides an in-memory geometry model (points, lines, polygons
//! and their collections) with readers and writers for the common geometry
//! interchange formats.
//!
//! ## Features
//!
//! - **Geometry model**: closed [`GeometryValue`] sum type with area,
//!   centroid, envelope, length and point-in-polygon
//! - **WKT/EWKT**: recursive-descent reader and canonical writer
//! - **WKB/EWKB**: either byte order on input, raw or hex text
//! - **GeoJSON**: geometries, features and feature collections
//! - **GeoHash**: adaptive encoding, cell decoding and neighbour lookup
//! - **Format detection**: sniffs the format from a short input prefix
//! - **Reduction**: collapses geometry lists to the simplest common type
//! - **Acceleration engine**: optional pluggable [`GeometryEngine`]
//!
//! ## Quick Start
//!
//! ```rust
//! use geoformat::{Format, FormatArgs, GeometryType, Loader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = Loader::default();
//!
//! // Format detected from the input
//! let geometry = loader.load(b"POINT (30 10)", None, &FormatArgs::default())?;
//! assert_eq!(geometry.geometry_type(), GeometryType::Point);
//!
//! // Several items are reduced to one geometry
//! let points = loader.load_all(["POINT (0 0)", "POINT (1 1)"], None, &FormatArgs::default())?;
//! assert_eq!(points.geometry_type(), GeometryType::MultiPoint);
//!
//! // Any registered format can be written back
//! let json = loader.write(&points, Format::Json, &FormatArgs::default())?;
//! assert!(json.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## GeoHash
//!
//! ```rust
//! use geoformat::{Direction, GeoHashCodec, Point};
//!
//! let geohash = GeoHashCodec::default();
//! let hash = geohash.encode_with_length(&Point::new(10.40744, 57.64911), 11).unwrap();
//! assert_eq!(hash, "u4pruydqqvj");
//! assert_eq!(geohash.adjacent("xn7", Direction::Top).unwrap(), "xne");
//! ```

pub mod bounding_box;
pub mod codec;
pub mod config;
pub mod detector;
pub mod engine;
pub mod errors;
pub mod format;
pub mod geometry;
pub mod loader;
pub mod operations;
pub mod reducer;

pub use bounding_box::BoundingBox;
pub use config::{GeoConfig, GeoConfigBuilder};
pub use errors::{ErrorKind, GeoError, GeoResult};
pub use format::{Detection, Encoded, Format, FormatArgs};

// Re-export geometry types
pub use geometry::{
    Coordinate, Geometry, GeometryCollection, GeometryType, GeometryValue, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

// Re-export codecs
pub use codec::{
    CodecRegistry, Direction, GeoCodec, GeoCodecProvider, GeoHashCell, GeoHashCodec,
    GeoJsonCodec, WkbCodec, WktCodec,
};

// Re-export engine and operations
pub use engine::{GeometryEngine, GeometryEngineProvider, PreparedGeometry};
pub use operations::SpatialOperations;

pub use detector::detect;
pub use loader::Loader;
pub use reducer::{reduce, reduce_geometry};
