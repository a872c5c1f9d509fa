//! Top-N suggestions with their own short reasons.
//!
//! Reasons are written for a "what should I do next" view and deliberately
//! use different wording and thresholds from `crate::explain`.

use serde::Serialize;

use crate::explain::format_hours;
use crate::scoring::{AnalysisResult, ScoredTask};

pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// 1-based.
    pub rank: usize,
    pub task: ScoredTask,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionResult {
    pub success: bool,
    pub suggestions: Vec<Suggestion>,
    pub strategy_used: String,
    pub warnings: Vec<String>,
}

pub fn suggestion_reason(task: &ScoredTask) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if task.is_overdue {
        reasons.push("This task is overdue and needs immediate attention.".to_string());
    } else if task.scores.urgency >= 9.0 {
        reasons.push("Due very soon - high urgency.".to_string());
    }

    if task.scores.importance >= 8.0 {
        reasons.push(format!(
            "High importance rating ({}/10).",
            task.task.importance
        ));
    }

    if task.scores.effort >= 8.0 {
        reasons.push(format!(
            "Quick win - only {}h estimated.",
            format_hours(task.task.estimated_hours)
        ));
    }

    if task.scores.dependency >= 7.0 {
        reasons.push("Completing this will unblock other tasks.".to_string());
    }

    if reasons.is_empty() {
        "Balanced priority based on all factors.".to_string()
    } else {
        reasons.join(" ")
    }
}

/// Take the head of an already ranked analysis.
pub fn top_suggestions(result: AnalysisResult, count: usize) -> SuggestionResult {
    let suggestions = result
        .tasks
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, task)| Suggestion {
            rank: i + 1,
            reason: suggestion_reason(&task),
            task,
        })
        .collect();

    SuggestionResult {
        success: true,
        suggestions,
        strategy_used: result.strategy,
        warnings: result.warnings,
    }
}
