use std::fmt::{self, Display};

/// Interchange format tags understood by the detector and the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Wkt,
    Ewkt,
    Wkb,
    Ewkb,
    /// GeoJSON; also accepted as `geojson`.
    Json,
    Kml,
    Gpx,
    GeoRss,
    GeoHash,
    GoogleGeocode,
}

impl Format {
    pub const ALL: [Format; 10] = [
        Format::Wkt,
        Format::Ewkt,
        Format::Wkb,
        Format::Ewkb,
        Format::Json,
        Format::Kml,
        Format::Gpx,
        Format::GeoRss,
        Format::GeoHash,
        Format::GoogleGeocode,
    ];

    /// Canonical lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Wkt => "wkt",
            Format::Ewkt => "ewkt",
            Format::Wkb => "wkb",
            Format::Ewkb => "ewkb",
            Format::Json => "json",
            Format::Kml => "kml",
            Format::Gpx => "gpx",
            Format::GeoRss => "georss",
            Format::GeoHash => "geohash",
            Format::GoogleGeocode => "google_geocode",
        }
    }

    /// Resolves a tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Format> {
        let tag = tag.trim().to_ascii_lowercase();
        if tag == "geojson" {
            return Some(Format::Json);
        }
        Format::ALL.iter().copied().find(|f| f.as_str() == tag)
    }

    /// Binary formats produce [`Encoded::Binary`] unless hex output is asked for.
    pub fn is_binary(&self) -> bool {
        matches!(self, Format::Wkb | Format::Ewkb)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of sniffing raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub format: Format,
    /// The payload is hex text rather than raw bytes.
    pub hex: bool,
}

impl Detection {
    pub fn new(format: Format) -> Self {
        Self { format, hex: false }
    }

    pub fn hex(format: Format) -> Self {
        Self { format, hex: true }
    }
}

/// Per-call codec options.
///
/// Every codec ignores the options it has no use for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatArgs {
    /// WKB/EWKB: read or write hex text instead of raw bytes.
    pub hex: bool,
    /// GeoHash: encode precision (half-width of the cell, in degrees).
    pub precision: Option<f64>,
    /// GeoHash: decode to the cell polygon instead of its centre point.
    pub as_grid: bool,
}

impl FormatArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hex(mut self, hex: bool) -> Self {
        self.hex = hex;
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_as_grid(mut self, as_grid: bool) -> Self {
        self.as_grid = as_grid;
        self
    }
}

/// Output of a codec write.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Text(String),
    Binary(Vec<u8>),
}

impl Encoded {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Encoded::Text(text) => Some(text),
            Encoded::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Encoded::Text(text) => text.as_bytes(),
            Encoded::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Encoded::Text(text) => text.into_bytes(),
            Encoded::Binary(bytes) => bytes,
        }
    }
}

impl Display for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoded::Text(text) => f.write_str(text),
            Encoded::Binary(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}
