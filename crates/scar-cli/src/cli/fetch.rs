//! The fetch operation behind the CLI: probe, stream, report.

use anyhow::{bail, Context, Result};
use scar_core::checksum;
use scar_core::config::ScarConfig;
use scar_core::downloader::{self, FetchOptions};
use scar_core::fetch_head;
use scar_core::url_model;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use super::Cli;

const PROGRESS_INTERVAL_MS: u64 = 500;

pub fn run_fetch(args: &Cli, cfg: &ScarConfig) -> Result<()> {
    let tuning = cfg.tuning();

    let probe = fetch_head::probe(&args.url, &tuning)?;
    if !probe.ok() {
        bail!("HEAD {} returned HTTP {}", args.url, probe.status);
    }
    let expected = probe
        .content_length
        .with_context(|| format!("{}: server did not report Content-Length", args.url))?;
    tracing::info!(expected, url = %args.url, "artifact size probed");

    let out_path: PathBuf = match &args.out {
        Some(p) => p.clone(),
        None => PathBuf::from(url_model::derive_filename(
            &args.url,
            probe.content_disposition.as_deref(),
        )),
    };

    let mut file =
        File::create(&out_path).with_context(|| format!("create {}", out_path.display()))?;

    let total_mib = expected as f64 / 1_048_576.0;
    let mut last_print = Instant::now();
    let mut on_progress = |fraction: f64| {
        let now = Instant::now();
        if now.duration_since(last_print).as_millis() as u64 >= PROGRESS_INTERVAL_MS
            || fraction >= 1.0
        {
            let done_mib = fraction * total_mib;
            print!(
                "\r  {:.1} / {:.1} MiB ({:.1}%)  ",
                done_mib,
                total_mib,
                fraction * 100.0
            );
            let _ = io::stdout().flush();
            last_print = now;
        }
    };

    let outcome = downloader::fetch_to_writer(
        &args.url,
        &mut file,
        expected,
        &tuning,
        FetchOptions {
            progress: Some(&mut on_progress),
            collect_timing: args.timed,
        },
    )?;
    println!();

    if !outcome.complete {
        bail!(
            "incomplete transfer: received {} of {} bytes",
            outcome.bytes_written,
            outcome.expected_len
        );
    }

    println!(
        "Saved {} ({} bytes)",
        out_path.display(),
        outcome.bytes_written
    );
    if let Some(timing) = &outcome.timing {
        println!(
            "First byte after {:.3}s, body streamed in {:.3}s",
            timing.first_byte.as_secs_f64(),
            timing.body.as_secs_f64()
        );
    }
    if args.md5 {
        let digest = checksum::md5_path(&out_path)?;
        println!("{}  {}", digest, out_path.display());
    }
    Ok(())
}
