//! HTTP HEAD / size probing.
//!
//! Uses the curl crate (libcurl) to fetch response headers and read
//! `Content-Length` before the real download starts. The request carries
//! `Accept-Encoding: deflate` so the server does not answer for a gzipped
//! representation; `Content-Length` then matches the bytes the streamed GET
//! will actually deliver.

mod parse;

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;

use crate::config::TransferTuning;

/// Overall cap on the HEAD round trip; headers either arrive quickly or not at all.
const HEAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a HEAD request: status plus the headers the downloader needs.
#[derive(Debug, Clone)]
pub struct HeadProbe {
    /// Final HTTP status code after redirects.
    pub status: u32,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
}

impl HeadProbe {
    /// True if the server answered the probe with 200; anything else means
    /// no trustworthy size was obtained and the download must not start.
    pub fn ok(&self) -> bool {
        self.status == 200
    }
}

/// Performs a HEAD request and returns the status and parsed metadata.
///
/// Follows redirects. Transport failures (DNS, refused connection, timeout)
/// are errors; a non-200 status is reported through [`HeadProbe::status`],
/// not as an error.
pub fn probe(url: &str, tuning: &TransferTuning) -> Result<HeadProbe> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(tuning.max_redirects)?;
    easy.connect_timeout(tuning.connect_timeout)?;
    easy.timeout(HEAD_TIMEOUT)?;

    let mut list = curl::easy::List::new();
    list.append("Accept-Encoding: deflate")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform().context("HEAD request failed")?;
    }

    let status = easy.response_code().context("no response code")?;
    tracing::debug!(url, status, "HEAD probe answered");

    let parsed = parse::parse_headers(&headers);
    Ok(HeadProbe {
        status,
        content_length: parsed.content_length,
        content_disposition: parsed.content_disposition,
    })
}
