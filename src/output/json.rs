//! JSON writer

use std::io::Write;

use crate::compiler::DecisionTable;
use crate::error::Result;

/// Pretty-print the whole table, anomalies included
pub fn write_json<W: Write>(table: &DecisionTable, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, table)?;
    out.write_all(b"\n")?;
    Ok(())
}
