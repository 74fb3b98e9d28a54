use std::borrow::Cow;
use std::fmt;
use std::io::{Cursor, Read};

use thiserror::Error;
use zip::ZipArchive;

use super::fetch::{Fetcher, HttpFetcher};
use super::model::Table;
use super::source::{Container, SourceDescriptor};
use crate::config::{ENCODING_FALLBACK, HTML_SNIFF_LEN};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be turned into a [`Table`].
/// Every variant's message is meant to be shown to the end user as-is.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not download {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("{url} returned an HTML page instead of data (file too large or permission denied)")]
    UpstreamRejected { url: String },

    #[error("downloaded file is not a valid zip archive: {reason}")]
    BadArchive { reason: String },

    #[error("{}", missing_member_message(.member))]
    NoCsvInArchive { member: Option<String> },

    #[error("could not decode the file as CSV with any supported encoding ({attempts})")]
    UndecodableText { attempts: String },
}

fn missing_member_message(member: &Option<String>) -> String {
    match member {
        Some(name) => format!("archive has no member named {name}"),
        None => "archive contains no .csv file".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Text encodings
// ---------------------------------------------------------------------------

/// Candidate encodings for third-party CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Latin1 => write!(f, "latin-1"),
            TextEncoding::Windows1252 => write!(f, "cp1252"),
        }
    }
}

impl TextEncoding {
    /// Decode the whole payload or nothing.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, String> {
        match self {
            TextEncoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text))),
                Err(e) => Err(format!("invalid utf-8 at byte {}", e.valid_up_to())),
            },
            // Every byte maps to the code point of the same value.
            TextEncoding::Latin1 => Ok(encoding_rs::mem::decode_latin1(bytes)),
            // encoding_rs maps every byte for cp1252, so this never fails.
            TextEncoding::Windows1252 => {
                Ok(encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes).0)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Download and decode one dataset over HTTP.
pub fn load(descriptor: &SourceDescriptor) -> Result<Table, LoadError> {
    let fetcher = http_fetcher(&descriptor.url)?;
    load_with(&fetcher, descriptor)
}

/// Build the HTTP client; a failure counts against the dataset at `url`.
pub fn http_fetcher(url: &str) -> Result<HttpFetcher, LoadError> {
    HttpFetcher::new().map_err(|e| LoadError::FetchFailed {
        url: url.to_string(),
        reason: format!("{e:#}"),
    })
}

/// Load one dataset through the given fetcher.
///
/// Steps: fetch, reject disguised HTML pages, unpack the archive when the
/// descriptor says so, then decode under [`ENCODING_FALLBACK`]. Nothing is
/// retried and nothing is cached.
pub fn load_with(fetcher: &dyn Fetcher, descriptor: &SourceDescriptor) -> Result<Table, LoadError> {
    let url = &descriptor.url;
    log::info!("fetching {url} ({})", descriptor.container);

    let fetched = fetcher.fetch(url).map_err(|e| LoadError::FetchFailed {
        url: url.clone(),
        reason: format!("{e:#}"),
    })?;
    if !fetched.is_success() {
        return Err(LoadError::FetchFailed {
            url: url.clone(),
            reason: format!("HTTP status {}", fetched.status),
        });
    }

    if looks_like_html(&fetched.bytes) {
        log::warn!("{url} served an HTML page instead of data");
        return Err(LoadError::UpstreamRejected { url: url.clone() });
    }

    let payload = match descriptor.container {
        Container::Raw => fetched.bytes,
        Container::Zip => extract_csv(&fetched.bytes, descriptor.inner_file.as_deref())?,
    };

    let (table, encoding) = decode_table(&payload)?;
    log::info!(
        "loaded {url}: {} rows x {} columns ({encoding})",
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Disguised error pages
// ---------------------------------------------------------------------------

/// Heuristic: file hosts answer oversized or restricted downloads with an
/// HTML page and a 200 status. Scans the first [`HTML_SNIFF_LEN`] bytes for
/// `<html`, ignoring case. A real CSV that starts with that text is
/// misclassified.
pub fn looks_like_html(bytes: &[u8]) -> bool {
    let prefix = &bytes[..bytes.len().min(HTML_SNIFF_LEN)];
    prefix
        .to_ascii_lowercase()
        .windows(b"<html".len())
        .any(|w| w == b"<html")
}

// ---------------------------------------------------------------------------
// Archive unpacking
// ---------------------------------------------------------------------------

const MAX_PREALLOC: u64 = 64 << 20;

/// Pull the CSV member out of a zip payload.
///
/// With no explicit `inner_file`, the first entry (in central-directory
/// order) whose name ends in `.csv` wins.
pub fn extract_csv(bytes: &[u8], inner_file: Option<&str>) -> Result<Vec<u8>, LoadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| LoadError::BadArchive {
        reason: e.to_string(),
    })?;

    let index = match inner_file {
        Some(name) => archive
            .index_for_name(name)
            .ok_or_else(|| LoadError::NoCsvInArchive {
                member: Some(name.to_string()),
            })?,
        None => first_csv_index(&mut archive)?
            .ok_or(LoadError::NoCsvInArchive { member: None })?,
    };

    let mut entry = archive.by_index(index).map_err(|e| LoadError::BadArchive {
        reason: e.to_string(),
    })?;
    log::debug!("extracting {} ({} bytes)", entry.name(), entry.size());

    // The declared size is untrusted; only use it as a bounded hint.
    let hint = usize::try_from(entry.size().min(MAX_PREALLOC)).unwrap_or(0);
    let mut out = Vec::with_capacity(hint);
    entry
        .read_to_end(&mut out)
        .map_err(|e| LoadError::BadArchive {
            reason: format!("reading {}: {e}", entry.name()),
        })?;
    Ok(out)
}

fn first_csv_index(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<Option<usize>, LoadError> {
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(|e| LoadError::BadArchive {
            reason: e.to_string(),
        })?;
        if !entry.is_dir() && entry.name().ends_with(".csv") {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Try each encoding of [`ENCODING_FALLBACK`] in order and keep the first
/// one that both decodes and parses. Returns the winning encoding too.
pub fn decode_table(payload: &[u8]) -> Result<(Table, TextEncoding), LoadError> {
    let mut failures = Vec::with_capacity(ENCODING_FALLBACK.len());

    for encoding in ENCODING_FALLBACK {
        let attempt = encoding
            .decode(payload)
            .and_then(|text| parse_csv(&text));
        match attempt {
            Ok(table) => return Ok((table, encoding)),
            Err(reason) => {
                log::debug!("{encoding} attempt failed: {reason}");
                failures.push(format!("{encoding}: {reason}"));
            }
        }
    }

    Err(LoadError::UndecodableText {
        attempts: failures.join("; "),
    })
}

/// Parse comma-separated text whose first record is the header.
///
/// Rows shorter than the header are padded with empty cells; rows longer
/// than the header fail the parse.
pub fn parse_csv(text: &str) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("reading header: {e}"))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err("no header row".to_string());
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("row {}: {e}", row_no + 1))?;
        if record.len() > headers.len() {
            return Err(format!(
                "row {}: expected {} fields, found {}",
                row_no + 1,
                headers.len(),
                record.len()
            ));
        }
        let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(Table::from_text_rows(headers, rows))
}
