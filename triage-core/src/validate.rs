//! Validation and normalization of raw task records.
//!
//! Nothing here fails. Every defect in a record is repaired with a documented
//! default and reported as a warning string, so a partially broken batch can
//! still be scored.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::strategy::Strategy;
use crate::task::{
    DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE, DEFAULT_TITLE, MAX_ESTIMATED_HOURS,
    MAX_IMPORTANCE, MAX_TITLE_CHARS, MIN_ESTIMATED_HOURS, MIN_IMPORTANCE, TaskId, TaskRecord,
};

/// ISO calendar date, as accepted in `due_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert a JSON scalar into a task id. `None` for null.
pub fn task_id_from_value(value: &Value) -> Option<TaskId> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => TaskId::Int(i),
            // `1.0` names the same task as `1`.
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 9.0e18 => TaskId::Int(f as i64),
                _ => TaskId::Str(n.to_string()),
            },
        }),
        Value::String(s) => Some(TaskId::Str(s.clone())),
        other => Some(TaskId::Str(other.to_string())),
    }
}

pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).ok(),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if n.as_u64().is_some() {
                Some(i64::MAX)
            } else {
                let f = n.as_f64()?;
                // Truncate toward zero; out-of-range floats saturate and get clamped later.
                f.is_finite().then(|| f.trunc() as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn title_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        Value::Array(items) if items.is_empty() => return None,
        Value::Object(map) if map.is_empty() => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

fn truncate_title(title: &str) -> String {
    let truncated: String = title.chars().take(MAX_TITLE_CHARS).collect();
    // A cut can expose inner whitespace at the end; trim it so a second pass is a no-op.
    truncated.trim_end().to_string()
}

/// Normalize one raw record. `index` is the record's position in its batch
/// and only used to synthesize a missing id.
pub fn validate_task(raw: &Map<String, Value>, index: usize) -> (TaskRecord, Vec<String>) {
    let mut warnings = Vec::new();

    let id = match raw.get("id").and_then(task_id_from_value) {
        Some(id) => id,
        None => {
            let id = TaskId::Str(format!("task-{index}"));
            warnings.push(format!("Task {index}: missing id, generated '{id}'"));
            id
        }
    };

    let title = match raw.get("title").and_then(title_text) {
        Some(text) => truncate_title(&text),
        None => {
            warnings.push(format!("Task {id}: missing title, using '{DEFAULT_TITLE}'"));
            DEFAULT_TITLE.to_string()
        }
    };

    let due_date = match raw.get("due_date") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let parsed = parse_date(v);
            if parsed.is_none() {
                warnings.push(format!(
                    "Task {id}: invalid due_date {v}, expected YYYY-MM-DD; ignoring it"
                ));
            }
            parsed
        }
    };

    let estimated_hours = match raw.get("estimated_hours") {
        None => DEFAULT_ESTIMATED_HOURS,
        Some(v) => match coerce_f64(v) {
            Some(h) if h < MIN_ESTIMATED_HOURS => {
                warnings.push(format!(
                    "Task {id}: estimated_hours too low, set to {MIN_ESTIMATED_HOURS}"
                ));
                MIN_ESTIMATED_HOURS
            }
            Some(h) if h > MAX_ESTIMATED_HOURS => {
                warnings.push(format!(
                    "Task {id}: estimated_hours too high, capped at {MAX_ESTIMATED_HOURS}"
                ));
                MAX_ESTIMATED_HOURS
            }
            Some(h) => h,
            None => {
                warnings.push(format!(
                    "Task {id}: invalid estimated_hours {v}, using default ({DEFAULT_ESTIMATED_HOURS}h)"
                ));
                DEFAULT_ESTIMATED_HOURS
            }
        },
    };

    let importance = match raw.get("importance") {
        None => DEFAULT_IMPORTANCE,
        Some(v) => match coerce_i64(v) {
            Some(i) if i < MIN_IMPORTANCE => {
                warnings.push(format!(
                    "Task {id}: importance below {MIN_IMPORTANCE}, set to {MIN_IMPORTANCE}"
                ));
                MIN_IMPORTANCE
            }
            Some(i) if i > MAX_IMPORTANCE => {
                warnings.push(format!(
                    "Task {id}: importance above {MAX_IMPORTANCE}, capped at {MAX_IMPORTANCE}"
                ));
                MAX_IMPORTANCE
            }
            Some(i) => i,
            None => {
                warnings.push(format!(
                    "Task {id}: invalid importance {v}, using default ({DEFAULT_IMPORTANCE})"
                ));
                DEFAULT_IMPORTANCE
            }
        },
    };

    let dependencies = match raw.get("dependencies") {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(task_id_from_value).collect(),
        Some(_) => {
            warnings.push(format!(
                "Task {id}: dependencies must be a list, using an empty list"
            ));
            Vec::new()
        }
    };

    let record = TaskRecord {
        id,
        title,
        due_date,
        estimated_hours,
        importance,
        dependencies,
    };
    (record, warnings)
}

/// Normalize a whole batch.
///
/// A batch that is null, not a list, or empty yields no records and exactly
/// one warning. Entries that are not objects are skipped with a warning.
pub fn validate_task_list(tasks: &Value) -> (Vec<TaskRecord>, Vec<String>) {
    let items = match tasks {
        Value::Null => return (Vec::new(), vec!["No tasks provided".to_string()]),
        Value::Array(items) if items.is_empty() => {
            return (Vec::new(), vec!["Empty task list provided".to_string()]);
        }
        Value::Array(items) => items,
        _ => return (Vec::new(), vec!["Tasks must be a list".to_string()]),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut warnings = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let Value::Object(raw) = item else {
            warnings.push(format!("Task at index {index}: not an object, skipped"));
            continue;
        };
        let (record, w) = validate_task(raw, index);
        records.push(record);
        warnings.extend(w);
    }

    (records, warnings)
}

/// Resolve a requested strategy. Unknown or ill-typed requests fall back to
/// `smart_balance` with a warning; an absent request falls back silently.
pub fn validate_strategy(strategy: Option<&Value>) -> (Strategy, Option<String>) {
    let default = Strategy::default();
    match strategy {
        None | Some(Value::Null) => (default, None),
        Some(Value::String(name)) => match Strategy::from_name(name) {
            Some(s) => (s, None),
            None => (
                default,
                Some(format!(
                    "Unknown strategy '{}', using default '{default}'",
                    name.trim().to_lowercase()
                )),
            ),
        },
        Some(_) => (
            default,
            Some(format!("Invalid strategy type, using default '{default}'")),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_clean_record_has_no_warnings() {
        let raw = obj(json!({
            "id": 3,
            "title": "  Ship release  ",
            "due_date": "2026-10-20",
            "estimated_hours": 1.5,
            "importance": 8,
            "dependencies": [1, 2]
        }));
        let (t, w) = validate_task(&raw, 0);
        assert!(w.is_empty(), "{w:?}");
        assert_eq!(t.id, TaskId::Int(3));
        assert_eq!(t.title, "Ship release");
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(t.estimated_hours, 1.5);
        assert_eq!(t.importance, 8);
        assert_eq!(t.dependencies, vec![TaskId::Int(1), TaskId::Int(2)]);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let (t, w) = validate_task(&obj(json!({})), 4);
        assert_eq!(t.id, TaskId::Str("task-4".into()));
        assert_eq!(t.title, DEFAULT_TITLE);
        assert_eq!(t.due_date, None);
        assert_eq!(t.estimated_hours, DEFAULT_ESTIMATED_HOURS);
        assert_eq!(t.importance, DEFAULT_IMPORTANCE);
        assert!(t.dependencies.is_empty());
        // id + title only; absent hours/importance/date/deps are silent.
        assert_eq!(w.len(), 2);
        assert!(w[0].contains("task-4"));
    }

    #[test]
    fn test_blank_title_and_truncation() {
        let (t, w) = validate_task(&obj(json!({"id": 1, "title": "   "})), 0);
        assert_eq!(t.title, DEFAULT_TITLE);
        assert_eq!(w.len(), 1);

        let long = "x".repeat(600);
        let (t, w) = validate_task(&obj(json!({"id": 1, "title": long})), 0);
        assert_eq!(t.title.chars().count(), MAX_TITLE_CHARS);
        assert!(w.is_empty());
    }

    #[test]
    fn test_invalid_date_is_dropped_with_warning() {
        let (t, w) = validate_task(&obj(json!({"id": 1, "title": "a", "due_date": "next friday"})), 0);
        assert_eq!(t.due_date, None);
        assert_eq!(w.len(), 1);
        assert!(w[0].contains("due_date"));

        let (t, w) = validate_task(&obj(json!({"id": 1, "title": "a", "due_date": 20261020})), 0);
        assert_eq!(t.due_date, None);
        assert_eq!(w.len(), 1);

        let (_, w) = validate_task(&obj(json!({"id": 1, "title": "a", "due_date": null})), 0);
        assert!(w.is_empty());
    }

    #[test]
    fn test_hours_coercion_and_clamping() {
        let cases = [
            (json!("3.5"), 3.5, 0),
            (json!(0.01), MIN_ESTIMATED_HOURS, 1),
            (json!(5000), MAX_ESTIMATED_HOURS, 1),
            (json!("lots"), DEFAULT_ESTIMATED_HOURS, 1),
            (json!(null), DEFAULT_ESTIMATED_HOURS, 1),
            (json!([1]), DEFAULT_ESTIMATED_HOURS, 1),
        ];
        for (input, expected, warns) in cases {
            let (t, w) = validate_task(
                &obj(json!({"id": 1, "title": "a", "estimated_hours": input})),
                0,
            );
            assert_eq!(t.estimated_hours, expected, "input {input}");
            assert_eq!(w.len(), warns, "input {input}: {w:?}");
        }
    }

    #[test]
    fn test_importance_coercion_and_clamping() {
        let cases = [
            (json!("7"), 7, 0),
            (json!(7.9), 7, 0),
            (json!(0), 1, 1),
            (json!(-3), 1, 1),
            (json!(11), 10, 1),
            (json!("very"), 5, 1),
            (json!("7.5"), 5, 1),
            (json!(1e19), 10, 1),
            (json!(-1e19), 1, 1),
        ];
        for (input, expected, warns) in cases {
            let (t, w) = validate_task(&obj(json!({"id": 1, "title": "a", "importance": input})), 0);
            assert_eq!(t.importance, expected, "input {input}");
            assert_eq!(w.len(), warns, "input {input}: {w:?}");
        }
    }

    #[test]
    fn test_dependencies_normalization() {
        let (t, w) = validate_task(
            &obj(json!({"id": 1, "title": "a", "dependencies": [2, null, "x", 2]})),
            0,
        );
        assert!(w.is_empty());
        assert_eq!(
            t.dependencies,
            vec![TaskId::Int(2), TaskId::Str("x".into()), TaskId::Int(2)]
        );

        let (t, w) = validate_task(&obj(json!({"id": 1, "title": "a", "dependencies": "2,3"})), 0);
        assert!(t.dependencies.is_empty());
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn test_validate_task_list_shapes() {
        let (t, w) = validate_task_list(&json!(null));
        assert!(t.is_empty());
        assert_eq!(w, vec!["No tasks provided"]);

        let (t, w) = validate_task_list(&json!({"id": 1}));
        assert!(t.is_empty());
        assert_eq!(w, vec!["Tasks must be a list"]);

        let (t, w) = validate_task_list(&json!([]));
        assert!(t.is_empty());
        assert_eq!(w, vec!["Empty task list provided"]);

        let (t, w) = validate_task_list(&json!([{"id": 1, "title": "a"}, 42, "x"]));
        assert_eq!(t.len(), 1);
        assert_eq!(w.len(), 2);
        assert!(w[0].contains("index 1"));
        assert!(w[1].contains("index 2"));
    }

    #[test]
    fn test_normalizing_twice_is_idempotent() {
        let raw = json!([{
            "title": format!("  {}  tail", "y".repeat(498)),
            "due_date": "2026-11-02",
            "estimated_hours": 0.0,
            "importance": 42,
            "dependencies": [null, "task-9"]
        }]);
        let (first, w1) = validate_task_list(&raw);
        assert!(!w1.is_empty());

        let round_trip = serde_json::to_value(&first).unwrap();
        let (second, w2) = validate_task_list(&round_trip);
        assert!(w2.is_empty(), "{w2:?}");
        assert_eq!(first, second);
    }

    #[test]
    fn test_falsy_titles_use_default() {
        for title in [json!(0), json!(0.0), json!(false), json!([]), json!({})] {
            let (t, w) = validate_task(&obj(json!({"id": 1, "title": title})), 0);
            assert_eq!(t.title, DEFAULT_TITLE, "title {title}");
            assert_eq!(w.len(), 1, "title {title}: {w:?}");
        }
        let (t, w) = validate_task(&obj(json!({"id": 1, "title": 42})), 0);
        assert_eq!(t.title, "42");
        assert!(w.is_empty());
    }

    #[test]
    fn test_integral_float_ids_match_integer_ids() {
        let (t, _) = validate_task(
            &obj(json!({"id": 1.0, "title": "a", "dependencies": [2.0, 2.5, -3.0]})),
            0,
        );
        assert_eq!(t.id, TaskId::Int(1));
        assert_eq!(
            t.dependencies,
            vec![TaskId::Int(2), TaskId::Str("2.5".into()), TaskId::Int(-3)]
        );
    }

    #[test]
    fn test_hours_survive_json_text_round_trip() {
        let raw = json!([
            {"id": 1, "title": "a", "estimated_hours": 105.67851225548681},
            {"id": 2, "title": "b", "estimated_hours": 252.76806264540946},
            {"id": 3, "title": "c", "estimated_hours": 0.30000000000000004},
        ]);
        let (first, _) = validate_task_list(&raw);

        let text = serde_json::to_string(&first).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        let (second, w) = validate_task_list(&reparsed);
        assert!(w.is_empty(), "{w:?}");
        assert_eq!(first, second);
        assert_eq!(second[0].estimated_hours, 105.67851225548681);
    }

    #[test]
    fn test_validate_strategy() {
        assert_eq!(validate_strategy(None), (Strategy::SmartBalance, None));
        assert_eq!(validate_strategy(Some(&json!(null))), (Strategy::SmartBalance, None));
        assert_eq!(
            validate_strategy(Some(&json!(" Fastest_Wins "))),
            (Strategy::FastestWins, None)
        );

        let (s, w) = validate_strategy(Some(&json!("yolo")));
        assert_eq!(s, Strategy::SmartBalance);
        assert!(w.unwrap().contains("yolo"));

        let (s, w) = validate_strategy(Some(&json!(3)));
        assert_eq!(s, Strategy::SmartBalance);
        assert!(w.is_some());
    }
}
