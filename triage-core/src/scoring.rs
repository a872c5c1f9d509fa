//! Multi-factor priority scoring.
//!
//! Each task gets four bucketed sub-scores (urgency, importance, effort,
//! dependency) on a 1-10 scale, and a composite that is the strategy-weighted
//! sum of those sub-scores.
//!
//! Ranking is a two-key descending sort: raw urgency first, composite second.
//! Date-driven urgency therefore dominates ordering even under strategies that
//! weight urgency lightly; the composite only orders tasks whose urgency ties.
//! That coupling is intended.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::Calendar;
use crate::explain::explain;
use crate::graph::{Cycle, DependencyGraph};
use crate::strategy::StrategyWeights;
use crate::task::{MAX_IMPORTANCE, MIN_IMPORTANCE, TaskRecord};

pub const EMPTY_BATCH_WARNING: &str = "Empty task batch: no tasks provided for analysis";

const FACTOR_CAP: f64 = 10.0;
const OVERDUE_URGENCY_CAP: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
    Overdue,
}

impl PriorityLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 7.0 => PriorityLevel::High,
            s if s >= 4.0 => PriorityLevel::Medium,
            _ => PriorityLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::High => "high",
            PriorityLevel::Medium => "medium",
            PriorityLevel::Low => "low",
            PriorityLevel::Overdue => "overdue",
        }
    }
}

/// Per-factor scores as reported: each within [1, 10], rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: TaskRecord,
    pub priority_score: f64,
    pub priority_level: PriorityLevel,
    pub scores: FactorScores,
    pub explanation: String,
    pub is_overdue: bool,
    /// Calendar days from the reference date; negative when overdue.
    pub days_until_due: Option<i64>,
    /// Working days from the reference date, when working-day mode is on.
    pub working_days_until_due: Option<i64>,

    /// Unclamped urgency (up to 15 when overdue). Ranking key only.
    #[serde(skip)]
    pub raw_urgency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub total_tasks: usize,
    pub has_circular_dependencies: bool,
    pub circular_dependency_cycles: Vec<Cycle>,
    pub date_intelligence_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub strategy: String,
    pub tasks: Vec<ScoredTask>,
    pub metadata: AnalysisMetadata,
    pub warnings: Vec<String>,
}

/// Reference date and calendar for one scoring run.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub today: NaiveDate,
    pub calendar: &'a Calendar,
    /// Measure due-date distance in working days instead of calendar days.
    pub working_days: bool,
}

pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Working-day distance from `today` to `due`.
///
/// A future due date on a non-working day counts from the last working day
/// before it; if that day is today or earlier the task is due effectively
/// today (0). Past due dates give the negative working-day count.
pub fn working_days_until(due: NaiveDate, today: NaiveDate, calendar: &Calendar) -> i64 {
    if due <= today || calendar.is_working_day(due) {
        return calendar.count_working_days(today, due);
    }
    match calendar.previous_working_day(due) {
        Some(effective) if effective > today => calendar.count_working_days(today, effective),
        _ => 0,
    }
}

/// Map a day distance to an urgency bucket. Overdue grows past 10, capped at 15.
pub fn urgency_from_distance(days: i64) -> f64 {
    match days {
        d if d < 0 => OVERDUE_URGENCY_CAP.min(10.0 + d.unsigned_abs() as f64 * 0.5),
        0 => 10.0,
        1 => 9.0,
        2..=3 => 8.0,
        4..=7 => 6.0,
        8..=14 => 4.0,
        15..=30 => 2.0,
        _ => 1.0,
    }
}

/// Urgency for an optional due date. With a calendar, distance is counted in
/// working days; without one, in calendar days.
pub fn urgency_score(due: Option<NaiveDate>, today: NaiveDate, calendar: Option<&Calendar>) -> f64 {
    let Some(due) = due else {
        return 1.0;
    };
    let distance = match calendar {
        Some(cal) => working_days_until(due, today, cal),
        None => days_until(due, today),
    };
    urgency_from_distance(distance)
}

pub fn importance_score(importance: i64) -> f64 {
    importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE) as f64
}

/// Quick tasks score high.
pub fn effort_score(hours: f64) -> f64 {
    match hours {
        h if h <= 0.5 => 10.0,
        h if h <= 1.0 => 9.0,
        h if h <= 2.0 => 8.0,
        h if h <= 4.0 => 6.0,
        h if h <= 8.0 => 4.0,
        h if h <= 16.0 => 2.0,
        _ => 1.0,
    }
}

/// Base 2 when the task has an in-batch dependency, 5 otherwise, plus 1.5 per
/// task that depends on it (bonus capped at 5).
pub fn dependency_score(is_blocked: bool, blocker_count: usize) -> f64 {
    let base = if is_blocked { 2.0 } else { 5.0 };
    let bonus = (blocker_count as f64 * 1.5).min(5.0);
    (base + bonus).min(FACTOR_CAP)
}

/// Weighted sum of the factors, each capped at 10 first.
pub fn composite_score(
    weights: &StrategyWeights,
    urgency: f64,
    importance: f64,
    effort: f64,
    dependency: f64,
) -> f64 {
    weights.urgency * urgency.min(FACTOR_CAP)
        + weights.importance * importance.min(FACTOR_CAP)
        + weights.effort * effort.min(FACTOR_CAP)
        + weights.dependency * dependency.min(FACTOR_CAP)
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn score_task(
    task: &TaskRecord,
    graph: &DependencyGraph,
    weights: &StrategyWeights,
    ctx: &ScoringContext<'_>,
) -> ScoredTask {
    let calendar = ctx.working_days.then_some(ctx.calendar);
    let days = task.due_date.map(|due| days_until(due, ctx.today));
    let working_days = calendar
        .zip(task.due_date)
        .map(|(cal, due)| working_days_until(due, ctx.today, cal));

    let urgency = working_days.or(days).map_or(1.0, urgency_from_distance);
    let importance = importance_score(task.importance);
    let effort = effort_score(task.estimated_hours);
    let dependency = dependency_score(graph.is_blocked(&task.id), graph.count_blockers(&task.id));

    let composite = composite_score(weights, urgency, importance, effort, dependency);

    let scores = FactorScores {
        urgency: round2(urgency.min(FACTOR_CAP)),
        importance: round2(importance),
        effort: round2(effort),
        dependency: round2(dependency),
    };

    let is_overdue = days.is_some_and(|d| d < 0);
    let priority_level = if is_overdue {
        PriorityLevel::Overdue
    } else {
        PriorityLevel::from_score(composite)
    };

    ScoredTask {
        explanation: explain(task, &scores, days, working_days),
        task: task.clone(),
        priority_score: round2(composite),
        priority_level,
        scores,
        is_overdue,
        days_until_due: days,
        working_days_until_due: working_days,
        raw_urgency: urgency,
    }
}

/// Descending by raw urgency, then by composite. Stable for full ties.
pub fn rank_tasks(tasks: &mut [ScoredTask]) {
    tasks.sort_by(|a, b| {
        b.raw_urgency
            .total_cmp(&a.raw_urgency)
            .then_with(|| b.priority_score.total_cmp(&a.priority_score))
    });
}

pub fn format_cycles(cycles: &[Cycle]) -> String {
    cycles
        .iter()
        .map(|c| {
            let ids: Vec<String> = c.iter().map(ToString::to_string).collect();
            format!("[{}]", ids.join(" -> "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Score and rank a validated batch.
///
/// Never fails: an empty batch gives an empty result with one warning, and
/// cycles are reported in metadata and warnings without blocking scoring.
pub fn score_tasks(
    tasks: &[TaskRecord],
    weights: &StrategyWeights,
    ctx: &ScoringContext<'_>,
) -> AnalysisResult {
    if tasks.is_empty() {
        debug!(strategy = %weights.name, "empty batch, nothing to score");
        return AnalysisResult {
            success: true,
            strategy: weights.name.clone(),
            tasks: Vec::new(),
            metadata: AnalysisMetadata {
                total_tasks: 0,
                has_circular_dependencies: false,
                circular_dependency_cycles: Vec::new(),
                date_intelligence_enabled: ctx.working_days,
            },
            warnings: vec![EMPTY_BATCH_WARNING.to_string()],
        };
    }

    debug!(
        tasks = tasks.len(),
        strategy = %weights.name,
        today = %ctx.today,
        working_days = ctx.working_days,
        "scoring batch"
    );

    let graph = DependencyGraph::build(tasks);
    let report = graph.detect_cycles();

    let mut warnings = Vec::new();
    if report.has_cycles {
        warn!(cycles = report.cycles.len(), "circular dependencies detected");
        warnings.push(format!(
            "Circular dependencies detected: {}",
            format_cycles(&report.cycles)
        ));
    }

    let mut scored: Vec<ScoredTask> = tasks
        .iter()
        .map(|t| score_task(t, &graph, weights, ctx))
        .collect();
    rank_tasks(&mut scored);

    AnalysisResult {
        success: true,
        strategy: weights.name.clone(),
        metadata: AnalysisMetadata {
            total_tasks: scored.len(),
            has_circular_dependencies: report.has_cycles,
            circular_dependency_cycles: report.cycles,
            date_intelligence_enabled: ctx.working_days,
        },
        tasks: scored,
        warnings,
    }
}
