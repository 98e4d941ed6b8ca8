use crate::table::{Cell, Table};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Load a table from a CSV file. The header row names the columns;
/// numeric-looking fields become numbers, empty fields become nulls,
/// everything else stays a string.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path).with_context(|| format!("open {}", path.display()))?;
    let columns: Vec<String> = rdr
        .headers()
        .context("read csv header")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut table = Table::new(columns);
    for record in rdr.records() {
        let record = record.context("read csv record")?;
        table.push_row(record.iter().map(parse_field))?;
    }
    Ok(table)
}

fn parse_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        Cell::Null
    } else if let Ok(v) = trimmed.parse::<f64>() {
        Cell::Num(v)
    } else {
        Cell::Str(field.to_string())
    }
}

/// Save a table as CSV with a header row. Nulls become empty fields.
pub fn save_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|cell| match cell {
            Cell::Str(s) => s.clone(),
            Cell::Num(v) => v.to_string(),
            Cell::Null => String::new(),
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a table as pretty JSON.
pub fn save_json<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(table)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
