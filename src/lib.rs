//! ACS Extract - compiles DFSMS ACS routines into flat decision tables
//!
//! An ACS routine picks a storage class, data class, management class or
//! storage group through nested IF / SELECT / DO logic. This crate unfolds
//! that nesting into independent rules: each rule is a value plus the AND of
//! the variable tests under which it is assigned, one row per OR branch.

pub mod cli;
pub mod compiler;
pub mod condition;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod token;

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::compiler::{compile, RoutineKind};
use crate::config::Config;
use crate::error::{AcsError, Result};
use crate::output::{derive_output_path, write_table};

// ============================================================================
// Run Summary
// ============================================================================

/// What one extraction produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub routine: Option<RoutineKind>,
    pub rules: usize,
    pub rows: usize,
    pub variables: usize,
    pub filter_lists: usize,
    pub anomalies: usize,
    pub output: PathBuf,
}

// ============================================================================
// Input
// ============================================================================

/// Read a routine from disk
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| AcsError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_source(bytes))
}

/// Decode routine bytes as UTF-8, falling back to ISO-8859-1
///
/// Routines downloaded from the host through a Latin-1 code page carry `¬`
/// as the single byte 0xAC.
pub fn decode_source(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Compile `input` and write the decision table
///
/// Without `output` the table goes next to the input, with the extension
/// of the configured format. Nothing is written if compilation fails.
pub fn extract_file(input: &Path, output: Option<&Path>, config: &Config) -> Result<RunSummary> {
    let source = read_source(input)?;
    let table = compile(&source, config.combine_mode)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| derive_output_path(input, config.format));
    let file = File::create(&output).map_err(|source| AcsError::Output {
        path: output.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_table(&table, config.format, config.comparator_style, &mut writer)?;
    writer.flush().map_err(|source| AcsError::Output {
        path: output.clone(),
        source,
    })?;

    let summary = RunSummary {
        routine: table.routine,
        rules: table.rules.len(),
        rows: table.row_count(),
        variables: table.variables.len(),
        filter_lists: table.filter_lists.len(),
        anomalies: table.anomalies.len(),
        output,
    };
    info!(
        routine = table.routine_name(),
        rules = summary.rules,
        rows = summary.rows,
        variables = summary.variables,
        filter_lists = summary.filter_lists,
        anomalies = summary.anomalies,
        output = %summary.output.display(),
        "Done."
    );
    Ok(summary)
}
