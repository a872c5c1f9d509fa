//! triage-ingest: loads task lists from files into raw, unvalidated records.
//!
//! This crate is the data-source boundary. It only fails on I/O and syntax
//! errors; field-level problems are left for `triage-core`'s validator.

pub mod parsers;
pub mod types;

use anyhow::{Result, bail};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub use parsers::csv_tasks::{parse_tasks_csv_str, read_csv_tasks};
pub use parsers::json_tasks::{parse_tasks_json_str, read_json_tasks};
pub use types::{RawTask, TaskFileFormat};

/// Load a task batch, choosing the parser from the file extension.
pub fn load_tasks(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let batch = match TaskFileFormat::from_path(path) {
        Some(TaskFileFormat::Json) => read_json_tasks(path)?,
        Some(TaskFileFormat::Csv) => {
            Value::Array(read_csv_tasks(path)?.into_iter().map(Value::Object).collect())
        }
        None => bail!(
            "unsupported task file {} (expected .json or .csv)",
            path.display()
        ),
    };

    debug!(
        path = %path.display(),
        records = batch.as_array().map_or(0, Vec::len),
        "loaded task batch"
    );
    Ok(batch)
}
