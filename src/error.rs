//! Error types for the ACS extractor
//!
//! Fatal problems are [`AcsError`] values and abort the run. Recoverable
//! problems are [`Anomaly`] values: they are logged and collected, and the
//! compilation carries on.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a successful run or a help request
pub const EXIT_OK: u8 = 0;
/// Exit status when the input routine cannot be read
pub const EXIT_INPUT: u8 = 4;
/// Exit status for any fatal compilation or output error
pub const EXIT_FATAL: u8 = 8;

/// Main error type for the ACS extractor
#[derive(Error, Debug)]
pub enum AcsError {
    #[error("Error @{line}: {name} is not a valid PROC name")]
    InvalidRoutine { name: String, line: usize },

    #[error("Error @{line}: not a valid SET R/W variable: {found}")]
    InvalidTarget { found: String, line: usize },

    #[error("Error @{line}: SET variable {found} doesn't match PROC {routine}")]
    TargetMismatch {
        found: String,
        routine: String,
        line: usize,
    },

    #[error("Error @{line}: expected {expected}, found {found}")]
    MissingToken {
        expected: &'static str,
        found: String,
        line: usize,
    },

    #[error("Error @{line}: invalid comparison operator {found}")]
    InvalidComparator { found: String, line: usize },

    #[error("Error @{line}: invalid comparison: {left} {comparator} {right}")]
    InvalidComparison {
        left: String,
        comparator: String,
        right: String,
        line: usize,
    },

    #[error("Error @{line}: SELECT subject is not a variable: {found}")]
    InvalidSelect { found: String, line: usize },

    #[error("Error @{line}: program logic error, condition stack mixed up while closing {construct}")]
    ScopeMismatch { construct: &'static str, line: usize },

    #[error("Error @{line}: EXIT found before any SET statement")]
    ExitWithoutRule { line: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Problem writing output file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Problem writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Problem writing CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("Problem writing JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl AcsError {
    /// Source line the error was raised at, for compilation errors
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidRoutine { line, .. }
            | Self::InvalidTarget { line, .. }
            | Self::TargetMismatch { line, .. }
            | Self::MissingToken { line, .. }
            | Self::InvalidComparator { line, .. }
            | Self::InvalidComparison { line, .. }
            | Self::InvalidSelect { line, .. }
            | Self::ScopeMismatch { line, .. }
            | Self::ExitWithoutRule { line } => Some(*line),
            _ => None,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Input { .. } => EXIT_INPUT,
            _ => EXIT_FATAL,
        }
    }
}

/// Result type alias for the ACS extractor
pub type Result<T> = std::result::Result<T, AcsError>;

// ============================================================================
// Recoverable anomalies
// ============================================================================

/// A problem in the routine that is reported but does not stop compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub line: usize,
    pub kind: AnomalyKind,
}

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// A statement keyword the compiler does not handle
    UnknownKeyword { keyword: String },
    /// `'VALUE' = &VAR` form, usually a value missing its `&`
    SwappedOperands {
        left: String,
        comparator: String,
        right: String,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AnomalyKind::UnknownKeyword { keyword } => {
                write!(f, "Error @{}: Unknown keyword : {}... Moving on.", self.line, keyword)
            }
            AnomalyKind::SwappedOperands {
                left,
                comparator,
                right,
            } => write!(
                f,
                "Error @{}: Possible missed &: {} {} {}",
                self.line, left, comparator, right
            ),
        }
    }
}
