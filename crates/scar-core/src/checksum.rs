//! MD5 digest of downloaded artifacts.
//!
//! Computed on demand after a download, not inline with the transfer, and
//! never compared against a reference value here; callers decide what to do
//! with the hex string.

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 4 * 1024;

/// Compute MD5 over a readable source, consuming it to end-of-stream.
/// Reads in fixed-size blocks to keep memory use bounded; suitable for large files.
pub fn md5_reader<R: Read + ?Sized>(source: &mut R) -> Result<String> {
    let mut hasher = Md5::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = source.read(&mut buf).context("read for digest")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}

/// Compute MD5 of a file and return the digest as lowercase hex.
pub fn md5_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    md5_reader(&mut f)
}
