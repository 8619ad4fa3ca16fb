//! Streaming single-artifact downloader.
//!
//! Issues one GET and writes the body to a caller-supplied sink in bounded
//! chunks, flushing after every chunk so partial progress is durable if the
//! process dies mid-transfer. The caller provides the expected byte count
//! from a prior HEAD probe; whether the stream delivered exactly that many
//! bytes is reported as an outcome, not an error.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::TransferTuning;

/// Abort if throughput stays below 1 KiB/s for this long; keeps slow links
/// alive while still catching stalled transfers well before the hard timeout.
const LOW_SPEED_TIME: Duration = Duration::from_secs(60);

/// Fatal transfer failure. Distinct from an incomplete-but-clean stream,
/// which is reported via [`FetchOutcome::complete`].
#[derive(Debug, Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, DNS, connection drop, etc.).
    #[error("transport: {0}")]
    Curl(#[from] curl::Error),
    /// GET response had a non-2xx status.
    #[error("GET returned HTTP {0}")]
    Http(u32),
    /// Writing or flushing the destination failed (disk full, permission denied).
    #[error("writing destination: {0}")]
    Sink(#[from] io::Error),
}

/// Options for a single fetch call.
#[derive(Default)]
pub struct FetchOptions<'a> {
    /// Invoked after each written chunk with `received / expected` as a
    /// fraction. May exceed 1.0 if the server under-reported the size.
    pub progress: Option<&'a mut dyn FnMut(f64)>,
    /// Record wall-clock durations for the two transfer phases.
    pub collect_timing: bool,
}

/// Wall-clock timing of a fetch, split at the first body byte.
#[derive(Debug, Clone, Copy)]
pub struct TransferTiming {
    /// Request start until the first body byte arrived.
    pub first_byte: Duration,
    /// First body byte until the stream ended.
    pub body: Duration,
}

/// What a fetch produced. `complete` is the success flag promised to callers:
/// true iff the byte count matches the HEAD-probed size exactly.
#[derive(Debug)]
pub struct FetchOutcome {
    pub complete: bool,
    pub bytes_written: u64,
    pub expected_len: u64,
    pub timing: Option<TransferTiming>,
}

/// Downloads `url` with a streamed GET, writing every chunk to `sink`.
///
/// Chunk size is bounded by `tuning.chunk_size` (the curl receive buffer).
/// Empty chunks are skipped without a write or a progress callback. A non-2xx
/// status, a transport failure, or a sink I/O error aborts the call with
/// [`TransferError`]; a size mismatch does not.
pub fn fetch_to_writer<W: Write + ?Sized>(
    url: &str,
    sink: &mut W,
    expected_len: u64,
    tuning: &TransferTuning,
    opts: FetchOptions<'_>,
) -> Result<FetchOutcome, TransferError> {
    let FetchOptions {
        mut progress,
        collect_timing,
    } = opts;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(tuning.max_redirects)?;
    easy.buffer_size(tuning.chunk_size)?;
    easy.connect_timeout(tuning.connect_timeout)?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(LOW_SPEED_TIME)?;
    easy.timeout(tuning.transfer_timeout)?;
    // Fail at end of headers on HTTP >= 400 so no error page reaches the sink.
    easy.fail_on_error(true)?;

    let mut received: u64 = 0;
    let mut sink_error: Option<io::Error> = None;
    let mut first_byte_at: Option<Instant> = None;
    let started = Instant::now();

    // The transfer borrows the locals above; drop it before inspecting them.
    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if data.is_empty() {
                // keep-alive artifact: nothing to write or report
                return Ok(0);
            }
            if first_byte_at.is_none() {
                first_byte_at = Some(Instant::now());
            }
            if let Err(e) = sink.write_all(data).and_then(|()| sink.flush()) {
                sink_error = Some(e);
                return Ok(0); // abort transfer
            }
            received += data.len() as u64;
            tracing::trace!(len = data.len(), received, expected_len, "chunk written");
            if let Some(cb) = progress.as_mut() {
                cb(progress_fraction(received, expected_len));
            }
            Ok(data.len())
        })?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        if e.is_write_error() {
            if let Some(io_err) = sink_error.take() {
                return Err(TransferError::Sink(io_err));
            }
        }
        if e.is_http_returned_error() {
            let status = easy.response_code().unwrap_or(0);
            return Err(TransferError::Http(status));
        }
        return Err(TransferError::Curl(e));
    }

    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(TransferError::Http(status));
    }

    let finished = Instant::now();
    let timing = if collect_timing {
        // A body-less response (expected size 0) never sets first_byte_at.
        let first_byte = first_byte_at.unwrap_or(finished);
        Some(TransferTiming {
            first_byte: first_byte.duration_since(started),
            body: finished.duration_since(first_byte),
        })
    } else {
        None
    };

    let complete = received == expected_len;
    if !complete {
        tracing::warn!(received, expected_len, url, "transfer size mismatch");
    }

    Ok(FetchOutcome {
        complete,
        bytes_written: received,
        expected_len,
        timing,
    })
}

/// Fraction of the expected size received so far. An expected size of zero
/// reports 1.0 rather than dividing by zero.
fn progress_fraction(received: u64, expected: u64) -> f64 {
    if expected == 0 {
        return 1.0;
    }
    received as f64 / expected as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_exact_completion_is_one() {
        assert_eq!(progress_fraction(1_048_576, 1_048_576), 1.0);
    }

    #[test]
    fn fraction_zero_expected_reports_done() {
        assert_eq!(progress_fraction(0, 0), 1.0);
    }

    #[test]
    fn fraction_may_exceed_one_on_misreported_size() {
        assert!(progress_fraction(1500, 1000) > 1.0);
    }

    #[test]
    fn fraction_is_monotonic_in_received() {
        let expected = 10_000;
        let mut last = 0.0;
        for received in (0..=expected).step_by(1234) {
            let f = progress_fraction(received, expected);
            assert!(f >= last);
            last = f;
        }
    }
}
