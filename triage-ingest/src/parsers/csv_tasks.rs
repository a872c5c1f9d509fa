//! Task lists exported as CSV.
//!
//! Expected header (order-independent, case-insensitive):
//!   id,title,due_date,estimated_hours,importance,dependencies
//!
//! `dependencies` holds `;`-separated ids. Empty cells are left out of the
//! record entirely so the engine applies its defaults silently. Values are
//! kept as text; numeric coercion is the validator's job.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::types::RawTask;

/// Integer-looking ids become JSON numbers so `1` in a CSV matches `1` in a
/// dependency list of a JSON export.
fn id_value(cell: &str) -> Value {
    match cell.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(cell),
    }
}

fn parse_dependencies(cell: &str) -> Value {
    Value::Array(
        cell.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(id_value)
            .collect(),
    )
}

fn read_records<R: Read>(rdr: R) -> Result<Vec<RawTask>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let mut out = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading CSV row {}", row + 1))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut task = RawTask::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            let value = match header.as_str() {
                "id" => id_value(cell),
                "dependencies" => parse_dependencies(cell),
                _ => Value::from(cell),
            };
            task.insert(header.clone(), value);
        }
        out.push(task);
    }

    Ok(out)
}

/// Parse CSV text into raw task records.
pub fn parse_tasks_csv_str(text: &str) -> Result<Vec<RawTask>> {
    read_records(text.as_bytes())
}

/// Parse a CSV file into raw task records.
pub fn read_csv_tasks(path: impl AsRef<Path>) -> Result<Vec<RawTask>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_records(file).with_context(|| format!("parsing {}", path.display()))
}
