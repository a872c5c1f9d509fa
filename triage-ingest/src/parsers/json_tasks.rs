//! Task lists as JSON: either a bare array of task objects, or an object
//! wrapping one under `"tasks"` (the shape of an analyze request body).

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Extract the task batch from a parsed document.
///
/// The batch is returned as-is, malformed or not; judging its shape is the
/// validator's job, which degrades to warnings instead of failing.
pub fn task_batch(doc: Value) -> Value {
    match doc {
        Value::Object(mut map) if map.contains_key("tasks") => {
            map.remove("tasks").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub fn parse_tasks_json_str(text: &str) -> Result<Value> {
    let doc: Value = serde_json::from_str(text).context("parsing task JSON")?;
    Ok(task_batch(doc))
}

pub fn read_json_tasks(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_tasks_json_str(&text).with_context(|| format!("parsing {}", path.display()))
}
