//! Decision table writers
//!
//! CSV is the primary format: one header row, one row per rule and
//! alternative, then the filter-list section. JSON dumps the whole table.

mod csv;
mod json;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::compiler::DecisionTable;
use crate::condition::{Comparator, Condition};
use crate::error::{AcsError, Result};

pub use self::csv::write_csv;
pub use self::json::write_json;

/// Output file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension used when no output path is given
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = AcsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(AcsError::InvalidConfig(format!(
                "unknown output format '{s}', expected one of: csv, json"
            ))),
        }
    }
}

/// How comparators are spelled in CSV cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparatorStyle {
    /// `GT 1000`
    #[default]
    Mnemonic,
    /// `> 1000`
    Symbolic,
}

impl ComparatorStyle {
    #[inline]
    pub fn render(&self, comparator: Comparator) -> &'static str {
        match self {
            ComparatorStyle::Mnemonic => comparator.mnemonic(),
            ComparatorStyle::Symbolic => comparator.symbol(),
        }
    }
}

/// Output path for `input` when none is given: same name, new extension
pub fn derive_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Write `table` in the requested format
pub fn write_table<W: Write>(
    table: &DecisionTable,
    format: OutputFormat,
    style: ComparatorStyle,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(table, style, out),
        OutputFormat::Json => write_json(table, out),
    }
}

/// Cell text for one variable of one condition
///
/// Tests on the variable are joined with `"; "`; an EQ test shows only its
/// value.
pub fn render_cell(condition: &Condition, variable: &str, style: ComparatorStyle) -> String {
    let mut cell = String::new();
    for (i, pair) in condition.pairs_for(variable).enumerate() {
        if i > 0 {
            cell.push_str("; ");
        }
        if pair.comparator != Comparator::Eq {
            cell.push_str(style.render(pair.comparator));
            cell.push(' ');
        }
        cell.push_str(&pair.value);
    }
    cell
}
