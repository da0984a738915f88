//! Error types shared by the geometry model, the codecs and the loader.

use std::fmt::{self, Display};
use std::io;
use thiserror::Error;

/// Errors raised by geoformat operations.
///
/// Codecs fail fast on the first structural violation, so a `Parse` error
/// always names the fragment that could not be understood.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Malformed codec input (bad JSON, WKT grammar mismatch, truncated binary...).
    #[error("Invalid {format} input: {message}")]
    Parse {
        /// Tag of the format being decoded.
        format: &'static str,
        /// Description of the offending fragment.
        message: String,
    },

    /// No codec is registered for a tag, or detection failed without a hint.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Reduction was asked to combine zero geometries.
    #[error("Cannot reduce an empty set of geometries")]
    EmptyInput,

    /// The operation needs the acceleration engine and has no fallback.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A geometry or argument violates a model invariant.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl GeoError {
    /// Creates a parse error for the given format tag.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        GeoError::Parse {
            format,
            message: message.into(),
        }
    }

    /// Returns the fieldless kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoError::Parse { .. } => ErrorKind::ParseError,
            GeoError::UnknownFormat(_) => ErrorKind::UnknownFormat,
            GeoError::EmptyInput => ErrorKind::EmptyInput,
            GeoError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            GeoError::InvalidGeometry(_) => ErrorKind::InvalidGeometry,
            GeoError::Io(_) => ErrorKind::IOError,
        }
    }
}

/// Error kinds for matching on [`GeoError`] without destructuring it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// Malformed codec input
    ParseError,
    /// No codec for the tag or undetectable input
    UnknownFormat,
    /// Reduction over zero geometries
    EmptyInput,
    /// Operation requires the acceleration engine
    UnsupportedOperation,
    /// Model invariant violated
    InvalidGeometry,
    /// Reading raw input failed
    IOError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ParseError => write!(f, "Parse error"),
            ErrorKind::UnknownFormat => write!(f, "Unknown format"),
            ErrorKind::EmptyInput => write!(f, "Empty input"),
            ErrorKind::UnsupportedOperation => write!(f, "Unsupported operation"),
            ErrorKind::InvalidGeometry => write!(f, "Invalid geometry"),
            ErrorKind::IOError => write!(f, "IO error"),
        }
    }
}

/// Result type for geoformat operations
pub type GeoResult<T> = Result<T, GeoError>;
