//! Task model for the prioritization engine.
//!
//! `TaskRecord` is the normalized, typed shape every scoring stage works on.
//! Raw input arrives as loosely-typed JSON objects and only becomes a
//! `TaskRecord` through `crate::validate`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default title for records that arrive without one.
pub const DEFAULT_TITLE: &str = "Untitled Task";
/// Default effort estimate, in hours.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 2.0;
/// Default importance on the 1-10 scale.
pub const DEFAULT_IMPORTANCE: i64 = 5;

pub const MAX_TITLE_CHARS: usize = 500;
pub const MIN_ESTIMATED_HOURS: f64 = 0.1;
pub const MAX_ESTIMATED_HOURS: f64 = 1000.0;
pub const MIN_IMPORTANCE: i64 = 1;
pub const MAX_IMPORTANCE: i64 = 10;

/// Task identifier: integers (as handed out by a database) or free-form strings.
///
/// Ordering puts every integer id before every string id, so `1 < 2 < "a"`.
/// `Int(1)` and `Str("1")` are different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Int(i64),
    Str(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(n) => write!(f, "{n}"),
            TaskId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Int(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Str(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Str(s)
    }
}

/// Normalized task.
///
/// Immutable for the duration of a scoring run; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,

    /// Calendar date the task is due, if any.
    pub due_date: Option<NaiveDate>,

    /// Hours, within [0.1, 1000].
    pub estimated_hours: f64,

    /// 1-10, higher means more important.
    pub importance: i64,

    /// Ids this task depends on. Ids that match no task in the batch are inert.
    pub dependencies: Vec<TaskId>,
}

impl TaskRecord {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            estimated_hours: DEFAULT_ESTIMATED_HOURS,
            importance: DEFAULT_IMPORTANCE,
            dependencies: Vec::new(),
        }
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_dependencies<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}
