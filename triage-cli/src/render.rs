//! Plain-text rendering of analysis and suggestion results.

use std::fmt::Write;
use triage_core::{AnalysisResult, ScoredTask, SuggestionResult};

const TITLE_WIDTH: usize = 32;

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn due_cell(t: &ScoredTask) -> String {
    match (t.task.due_date, t.days_until_due) {
        (Some(due), Some(days)) if days < 0 => format!("{due} ({}d late)", -days),
        (Some(due), Some(days)) => format!("{due} ({days}d)"),
        _ => "-".to_string(),
    }
}

fn push_warnings(out: &mut String, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    out.push_str("\nWarnings:\n");
    for w in warnings {
        let _ = writeln!(out, "  - {w}");
    }
}

pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Strategy: {} | {} task(s) | working days: {}",
        result.strategy,
        result.metadata.total_tasks,
        if result.metadata.date_intelligence_enabled { "on" } else { "off" }
    );

    if !result.tasks.is_empty() {
        let _ = writeln!(
            out,
            "\n{:>3}  {:>6}  {:<6}  {:<10}  {:<w$}  {}",
            "#",
            "SCORE",
            "LEVEL",
            "ID",
            "TITLE",
            "DUE",
            w = TITLE_WIDTH
        );
        for (i, t) in result.tasks.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}  {:>6.2}  {:<6}  {:<10}  {:<w$}  {}",
                i + 1,
                t.priority_score,
                t.priority_level.as_str(),
                clip(&t.task.id.to_string(), 10),
                clip(&t.task.title, TITLE_WIDTH),
                due_cell(t),
                w = TITLE_WIDTH
            );
            let _ = writeln!(out, "{:>5}{}", "", t.explanation);
        }
    }

    push_warnings(&mut out, &result.warnings);
    out
}

pub fn render_suggestions(result: &SuggestionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Strategy: {}", result.strategy_used);
    if result.suggestions.is_empty() {
        out.push_str("\nNothing to suggest.\n");
    }
    for s in &result.suggestions {
        let t = &s.task;
        let _ = writeln!(
            out,
            "\n{}. {} [{}] score {:.2} ({})",
            s.rank,
            t.task.title,
            t.task.id,
            t.priority_score,
            t.priority_level.as_str()
        );
        let _ = writeln!(out, "   {}", s.reason);
    }
    push_warnings(&mut out, &result.warnings);
    out
}
