//! Input format sniffing.

use crate::format::{Detection, Format};

/// Bytes inspected for an XML dialect marker.
pub const XML_SCAN_LIMIT: usize = 256;

/// Bytes inspected for the GeoHash alphabet.
const GEOHASH_SCAN_LIMIT: usize = 8;

/// The shortest WKB (an empty line string) is 9 bytes, 18 hex digits.
const MIN_HEX_WKB_LENGTH: usize = 18;

const XML_MARKERS: [(&[u8], Format); 6] = [
    (b"<kml", Format::Kml),
    (b"<coordinate", Format::Kml),
    (b"<gpx", Format::Gpx),
    (b"<georss", Format::GeoRss),
    (b"<rss", Format::GeoRss),
    (b"<feed", Format::GeoRss),
];

/// Guesses the format of raw input from a bounded prefix.
///
/// Returns `None` when nothing matches; that is an answer, not an error.
/// Only the first few bytes are looked at, except for `<` inputs where up to
/// [`XML_SCAN_LIMIT`] bytes are scanned for a dialect marker.
pub fn detect(raw: &[u8]) -> Option<Detection> {
    let start = raw.iter().position(|b| !b.is_ascii_whitespace())?;
    let input = &raw[start..];

    match input[0] {
        0x01 => {
            // EWKB flags live in the high byte of the little endian type word
            let flagged = input.get(4).is_some_and(|&b| b != 0);
            Some(Detection::new(if flagged { Format::Ewkb } else { Format::Wkb }))
        }
        b'0' if input.get(1) == Some(&b'1') && input.len() >= MIN_HEX_WKB_LENGTH => {
            let flagged = input.get(8..10).is_some_and(|byte| byte != b"00");
            Some(Detection::hex(if flagged { Format::Ewkb } else { Format::Wkb }))
        }
        b'{' => Some(Detection::new(Format::Json)),
        b'S' => Some(Detection::new(Format::Ewkt)),
        b'P' | b'L' | b'M' | b'G' => Some(Detection::new(Format::Wkt)),
        b'<' => {
            let head = &input[..input.len().min(XML_SCAN_LIMIT)];
            XML_MARKERS
                .iter()
                .find(|(marker, _)| contains(head, marker))
                .map(|(_, format)| Detection::new(*format))
        }
        _ => detect_geohash(input),
    }
}

fn detect_geohash(input: &[u8]) -> Option<Detection> {
    let head = &input[..input.len().min(GEOHASH_SCAN_LIMIT)];
    let end = head
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    let head = &head[..end];

    let is_geohash = !head.is_empty()
        && head
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    is_geohash.then(|| Detection::new(Format::GeoHash))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
