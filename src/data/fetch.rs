use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::config::{REQUEST_TIMEOUT_SECS, USER_AGENT_STRING};

// ---------------------------------------------------------------------------
// FetchResult – raw response for one load call
// ---------------------------------------------------------------------------

/// Body bytes plus the HTTP status they arrived with.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl FetchResult {
    pub fn ok(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            bytes: bytes.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// Fetcher – the network seam
// ---------------------------------------------------------------------------

/// Something that can turn a URL into bytes.
///
/// An `Err` means the request never produced a response (DNS, connect,
/// timeout, truncated body). A response with a non-success status is
/// returned as `Ok` and judged by the caller.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<FetchResult>;
}

/// Blocking HTTP GET with a fixed timeout and no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResult> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_STRING)
            .send()
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .with_context(|| format!("reading body from {url}"))?;
        log::debug!("GET {url} -> {status} ({} bytes)", bytes.len());
        Ok(FetchResult {
            status,
            bytes: bytes.to_vec(),
        })
    }
}
