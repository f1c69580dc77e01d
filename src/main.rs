//! hookdoc - WordPress hook documentation extractor
//!
//! Scans a PHP codebase for documented action and filter hooks and writes
//! them to a JSON file.

use clap::error::ErrorKind;
use clap::Parser;
use hookdoc::cli::{generate, Cli};
use hookdoc::HookdocError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Parse CLI arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(HookdocError::Usage(err.to_string()).exit_code());
        }
    };

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = generate(&cli) {
        eprintln!("Error: {}", err);
        std::process::exit(err.exit_code());
    }
}
