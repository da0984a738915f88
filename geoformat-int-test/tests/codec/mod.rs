//! Codec integration tests.
//!
//! Round trips through every built-in format, driven through the loader so
//! detection of written output is exercised as well.

mod cross_format_test;
mod wkt_test;
