//! ACS Extract binary
//!
//! Reads an ACS routine and writes its flat decision table.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use acs_extract::cli::{self, Args};
use acs_extract::config::Config;
use acs_extract::error::EXIT_OK;
use acs_extract::extract_file;
use acs_extract::logging::init_logging;

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    if cli::wants_help(argv.get(1..).unwrap_or_default()) {
        if let Err(e) = cli::print_help() {
            eprintln!("{e}");
        }
        return ExitCode::from(EXIT_OK);
    }

    let args = match Args::try_parse_from(&argv) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&Config::default());
            error!(error = %e, "invalid configuration");
            return ExitCode::from(e.exit_code());
        }
    };
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %args.input.display(),
        "ACS Extract"
    );
    args.warn_unknown_options();

    match extract_file(&args.input, args.output(), &config) {
        Ok(_) => ExitCode::from(EXIT_OK),
        Err(e) => {
            match e.line() {
                Some(line) => error!(line, error = %e, "extraction failed"),
                None => error!(error = %e, "extraction failed"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}
