//! Fixed settings. The dashboard takes no flags, files or environment
//! configuration; everything it needs is here.

use crate::data::loader::TextEncoding;
use crate::data::source::SourceDescriptor;

pub const MATCHES_URL: &str =
    "https://drive.google.com/uc?export=download&id=1ZCqwqbFRHdwHTCO4LWQezWB99LfynPJB";
pub const DELIVERIES_URL: &str =
    "https://drive.google.com/uc?export=download&id=1kQXChtwZxkYrbzvVY5k4s-ffs6dVCVXK";

pub const REQUEST_TIMEOUT_SECS: u64 = 60;
pub const USER_AGENT_STRING: &str = concat!("ipl-dashboard/", env!("CARGO_PKG_VERSION"));

/// How many leading bytes are scanned for an HTML error page.
pub const HTML_SNIFF_LEN: usize = 200;

/// Decoding order. Latin-1 accepts any byte, so cp1252 is only reached
/// when the text fails to parse as CSV under Latin-1 as well.
pub const ENCODING_FALLBACK: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

pub const WINDOW_TITLE: &str = "IPL Dashboard";
pub const WINDOW_SIZE: [f32; 2] = [1100.0, 720.0];
pub const WINDOW_MIN_SIZE: [f32; 2] = [600.0, 400.0];

/// Match records: a flat CSV.
pub fn matches_source() -> SourceDescriptor {
    SourceDescriptor::raw(MATCHES_URL)
}

/// Ball-by-ball records: a zip holding one CSV whose name is not assumed.
pub fn deliveries_source() -> SourceDescriptor {
    SourceDescriptor::zip(DELIVERIES_URL)
}
