//! triage-core: deterministic task-prioritization engine.
//!
//! Pipeline: raw records → `validate` → `graph` (cycles, blocking) →
//! `scoring` (with `calendar` and `explain`) → ranked result, and `suggest`
//! for the head of that ranking. `PriorityEngine` wires the stages together.

pub mod calendar;
pub mod engine;
pub mod explain;
pub mod graph;
pub mod scoring;
pub mod strategy;
pub mod suggest;
pub mod task;
pub mod validate;

pub use calendar::{Calendar, parse_holiday};
pub use engine::PriorityEngine;
pub use explain::explain;
pub use graph::{Cycle, CycleReport, DependencyGraph};
pub use scoring::{
    AnalysisMetadata, AnalysisResult, FactorScores, PriorityLevel, ScoredTask, ScoringContext,
    dependency_score, effort_score, importance_score, score_tasks, urgency_score,
};
pub use strategy::{Strategy, StrategyWeights};
pub use suggest::{DEFAULT_SUGGESTION_COUNT, Suggestion, SuggestionResult, top_suggestions};
pub use task::{TaskId, TaskRecord};
pub use validate::{validate_strategy, validate_task, validate_task_list};
