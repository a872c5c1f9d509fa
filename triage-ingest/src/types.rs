use serde::{Deserialize, Serialize};
use std::path::Path;

/// Loosely-typed task record, exactly as read from a source.
pub type RawTask = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskFileFormat {
    Json,
    Csv,
}

impl TaskFileFormat {
    /// Guess the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(TaskFileFormat::Json),
            "csv" => Some(TaskFileFormat::Csv),
            _ => None,
        }
    }
}
