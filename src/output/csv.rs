//! CSV writer

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

use crate::compiler::{DecisionTable, FilterList, Rule};
use crate::error::Result;
use crate::output::{render_cell, ComparatorStyle};

/// Write the rule rows, a blank line, then the FILTLISTS section
pub fn write_csv<W: Write>(table: &DecisionTable, style: ComparatorStyle, out: &mut W) -> Result<()> {
    {
        let mut writer = WriterBuilder::new().from_writer(&mut *out);

        let mut header = Vec::with_capacity(table.variables.len() + 4);
        header.push(table.routine_name());
        header.extend(table.variables.iter());
        header.extend(["Seq", "Exit", "LineNum"]);
        writer.write_record(&header)?;

        for rule in &table.rules {
            write_rule(&mut writer, rule, table, style)?;
        }
        writer.flush()?;
    }

    out.write_all(b"\n")?;

    {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(&mut *out);
        writer.write_record(["FILTLISTS"])?;
        writer.write_record(["NAME", "INCLUDE", "EXCLUDE"])?;
        writer.flush()?;
    }

    for list in &table.filter_lists {
        write_filter_list(out, list)?;
    }
    Ok(())
}

/// `NAME,"include","exclude"`: the pattern fields are always quoted
fn write_filter_list<W: Write>(out: &mut W, list: &FilterList) -> Result<()> {
    {
        let mut name = WriterBuilder::new()
            .terminator(Terminator::Any(b','))
            .from_writer(&mut *out);
        name.write_record([&list.name])?;
        name.flush()?;
    }

    let mut patterns = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(&mut *out);
    patterns.write_record([&list.include, &list.exclude])?;
    patterns.flush()?;
    Ok(())
}

fn write_rule<W: Write>(
    writer: &mut csv::Writer<W>,
    rule: &Rule,
    table: &DecisionTable,
    style: ComparatorStyle,
) -> Result<()> {
    let sequence = rule.sequence.to_string();
    let exit = if rule.has_exit { "Y" } else { "N" };
    let line = rule.line.to_string();

    for condition in rule.rows() {
        let mut record = Vec::with_capacity(table.variables.len() + 4);
        record.push(rule.target.clone());
        for variable in table.variables.iter() {
            record.push(render_cell(condition, variable, style));
        }
        record.push(sequence.clone());
        record.push(exit.to_string());
        record.push(line.clone());
        writer.write_record(&record)?;
    }
    Ok(())
}
