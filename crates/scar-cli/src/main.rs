use scar_core::logging;

mod cli;

use crate::cli::Cli;
use clap::Parser;

fn main() {
    // Parse first so the -V count can pick the log level.
    let cli = Cli::parse();

    if logging::init_logging(cli.verbose).is_err() {
        logging::init_logging_stderr(cli.verbose);
    }

    if let Err(err) = cli.run() {
        eprintln!("scar error: {:#}", err);
        std::process::exit(1);
    }
}
