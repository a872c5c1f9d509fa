//! Human-readable rationale for a scored task.

use crate::scoring::FactorScores;
use crate::task::TaskRecord;

const FALLBACK: &str = "Standard priority task";

/// Hours as shown to people: `2.0h`, `0.5h`, `1.25h`.
pub(crate) fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.1}")
    } else {
        format!("{hours}")
    }
}

fn due_clause(days: i64) -> Option<String> {
    match days {
        d if d < 0 => Some(format!("OVERDUE by {} day(s)", d.unsigned_abs())),
        0 => Some("Due TODAY".to_string()),
        1 => Some("Due tomorrow".to_string()),
        2..=3 => Some(format!("Due in {days} days")),
        4..=7 => Some("Due this week".to_string()),
        _ => None,
    }
}

/// Pipe-joined clauses describing why a task scored the way it did.
///
/// `days_until_due` is the calendar distance; `working_days_until_due` is only
/// mentioned when it differs from it and the task is not overdue.
pub fn explain(
    task: &TaskRecord,
    scores: &FactorScores,
    days_until_due: Option<i64>,
    working_days_until_due: Option<i64>,
) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(days) = days_until_due {
        if let Some(clause) = due_clause(days) {
            clauses.push(clause);
            if let Some(wd) = working_days_until_due {
                if days >= 0 && wd != days {
                    clauses.push(format!("{wd} working day(s) left"));
                }
            }
        }
    }

    match task.importance {
        i if i >= 8 => clauses.push(format!("High importance ({i}/10)")),
        i if i >= 6 => clauses.push(format!("Medium-high importance ({i}/10)")),
        _ => {}
    }

    let hours = task.estimated_hours;
    if hours <= 1.0 {
        clauses.push(format!("Quick win ({}h)", format_hours(hours)));
    } else if hours >= 8.0 {
        clauses.push(format!("Large task ({}h)", format_hours(hours)));
    }

    if scores.dependency >= 7.0 {
        clauses.push("Blocks other tasks".to_string());
    } else if scores.dependency <= 3.0 {
        clauses.push("Blocked by dependencies".to_string());
    }

    if clauses.is_empty() {
        FALLBACK.to_string()
    } else {
        clauses.join(" | ")
    }
}
