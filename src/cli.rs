//! Command-line arguments
//!
//! `acs-extract <input> [<output>] [debug] [options]`. The positional form
//! mirrors the classic tool: an optional output path, then bare option words.

use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::condition::CombineMode;
use crate::config::{Config, ConfigOverrides, LogLevel};
use crate::error::Result;
use crate::output::{ComparatorStyle, OutputFormat};

/// Bare option word that turns on trace logging
const DEBUG_WORD: &str = "debug";

/// Reads in an ACS routine and generates a CSV list of rules.
///
/// If you do not specify an output file, the input filename is used with
/// the extension .csv (or .json).
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "acs-extract", version)]
pub struct Args {
    /// ACS routine source file
    pub input: PathBuf,

    /// Output file, followed by bare options (`debug` shows lots of debug messages)
    #[arg(value_name = "OUTPUT|OPTION")]
    pub rest: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Output format (csv, json)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// How AND combines alternative sets (merge, distribute)
    #[arg(long, value_name = "MODE")]
    pub combine: Option<CombineMode>,

    /// Print comparators as symbols (`>`) instead of mnemonics (`GT`)
    #[arg(long)]
    pub symbolic: bool,

    /// JSON config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Whether the raw arguments ask for usage text
///
/// `args` excludes the program name. Checked before clap runs, since `?`
/// and `-?` are not valid clap input.
pub fn wants_help<S: AsRef<str>>(args: &[S]) -> bool {
    match args.first().map(AsRef::as_ref) {
        None => true,
        Some(first) => {
            matches!(first, "?" | "-?" | "--help") || first.eq_ignore_ascii_case("help")
        }
    }
}

/// Print usage text to stdout
pub fn print_help() -> std::io::Result<()> {
    Args::command().print_long_help()
}

impl Args {
    /// Explicit output path: the first trailing word, unless it is `debug`
    pub fn output(&self) -> Option<&Path> {
        self.rest
            .first()
            .filter(|word| !is_debug_word(word))
            .map(Path::new)
    }

    /// A bare `debug` appears among the trailing words
    pub fn debug(&self) -> bool {
        self.rest.iter().any(|word| is_debug_word(word))
    }

    /// Trailing words that are neither the output path nor a known option
    pub fn unknown_options(&self) -> impl Iterator<Item = &str> + '_ {
        let skip = usize::from(self.output().is_some());
        self.rest
            .iter()
            .skip(skip)
            .map(String::as_str)
            .filter(|word| !is_debug_word(word))
    }

    /// Settings given on the command line
    ///
    /// `--log-level` wins over a bare `debug`.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_level: self
                .log_level
                .or_else(|| self.debug().then_some(LogLevel::Trace)),
            combine_mode: self.combine,
            format: self.format,
            comparator_style: self.symbolic.then_some(ComparatorStyle::Symbolic),
        }
    }

    /// Layer environment, config file and command line into one config
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(path) = &self.config {
            config = config.apply_overrides(ConfigOverrides::from_json_file(path)?);
        }
        Ok(config.apply_overrides(self.overrides()))
    }

    /// Log trailing words that were ignored
    pub fn warn_unknown_options(&self) {
        for word in self.unknown_options() {
            warn!(option = word, "ignoring unknown option");
        }
    }
}

#[inline]
fn is_debug_word(word: &str) -> bool {
    word.eq_ignore_ascii_case(DEBUG_WORD)
}
