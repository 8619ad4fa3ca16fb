//! CLI for the scar artifact downloader.

mod fetch;

use anyhow::Result;
use clap::{ArgAction, Parser};
use scar_core::config;
use std::path::PathBuf;

/// Download a single artifact over HTTP(S) to a local file.
#[derive(Debug, Parser)]
#[command(name = "scar")]
#[command(about = "scar: fetch one remote artifact, with optional timing and MD5", long_about = None)]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Remote artifact URL.
    #[arg(short = 'u', long)]
    pub url: String,

    /// Local file where to store the remote artifact (default: name derived from the URL).
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Increases log verbosity (-VV for info, -VVV for debug).
    #[arg(short = 'V', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Print version and exit.
    #[arg(long, action = ArgAction::Version, value_parser = clap::value_parser!(bool))]
    version: (),

    /// Print the MD5 digest of the downloaded file.
    #[arg(long)]
    pub md5: bool,

    /// Report request and transfer timing after the download.
    #[arg(long)]
    pub timed: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        fetch::run_fetch(&self, &cfg)
    }
}
