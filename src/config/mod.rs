//! Run configuration
//!
//! Settings come from four layers, highest precedence first: command-line
//! options, a JSON config file, `ACS_EXTRACT_*` environment variables and
//! the built-in defaults.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::condition::CombineMode;
use crate::error::{AcsError, Result};
use crate::output::{ComparatorStyle, OutputFormat};

/// Environment variable holding the log level
pub const ENV_LOG_LEVEL: &str = "ACS_EXTRACT_LOG_LEVEL";
/// Environment variable holding the combine mode
pub const ENV_COMBINE: &str = "ACS_EXTRACT_COMBINE";

/// Log level, matching the tracing levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = AcsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(AcsError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Tracing filter directive for this level
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Effective settings for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub log_level: LogLevel,
    pub combine_mode: CombineMode,
    pub format: OutputFormat,
    pub comparator_style: ComparatorStyle,
}

/// A partial configuration; `None` leaves the lower layer's value in place
///
/// This is also the shape of the JSON config file:
///
/// ```json
/// { "log_level": "debug", "combine_mode": "distribute", "format": "csv", "comparator_style": "symbolic" }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub log_level: Option<LogLevel>,
    pub combine_mode: Option<CombineMode>,
    pub format: Option<OutputFormat>,
    pub comparator_style: Option<ComparatorStyle>,
}

impl ConfigOverrides {
    /// Read overrides from a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| AcsError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| AcsError::InvalidConfig(format!("bad config file: {e}")))
    }
}

impl Config {
    /// Defaults overlaid with `ACS_EXTRACT_LOG_LEVEL` and `ACS_EXTRACT_COMBINE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = level.parse()?;
        }
        if let Some(mode) = lookup(ENV_COMBINE) {
            config.combine_mode = mode.parse()?;
        }
        Ok(config)
    }

    /// Replace every setting the overrides provide
    #[must_use]
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(mode) = overrides.combine_mode {
            self.combine_mode = mode;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(style) = overrides.comparator_style {
            self.comparator_style = style;
        }
        self
    }

    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    #[must_use]
    pub fn with_combine_mode(mut self, mode: CombineMode) -> Self {
        self.combine_mode = mode;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
