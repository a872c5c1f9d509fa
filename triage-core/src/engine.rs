//! `PriorityEngine`: the configured entry point.
//!
//! Holds everything a run depends on besides the tasks themselves (reference
//! date, calendar, working-day mode) so results are reproducible. Nothing in
//! this crate reads the clock; callers decide what "today" is.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::calendar::Calendar;
use crate::scoring::{AnalysisMetadata, AnalysisResult, ScoringContext, score_tasks};
use crate::strategy::{Strategy, StrategyWeights};
use crate::suggest::{SuggestionResult, top_suggestions};
use crate::task::TaskRecord;
use crate::validate::{validate_strategy, validate_task_list};

#[derive(Debug, Clone)]
pub struct PriorityEngine {
    today: NaiveDate,
    calendar: Calendar,
    working_days: bool,
}

impl PriorityEngine {
    /// Engine with the default holiday calendar and working-day mode on.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            calendar: Calendar::default(),
            working_days: true,
        }
    }

    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_working_days(mut self, enabled: bool) -> Self {
        self.working_days = enabled;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn working_days(&self) -> bool {
        self.working_days
    }

    fn context(&self) -> ScoringContext<'_> {
        ScoringContext {
            today: self.today,
            calendar: &self.calendar,
            working_days: self.working_days,
        }
    }

    /// Score an already validated batch.
    pub fn score(&self, tasks: &[TaskRecord], weights: &StrategyWeights) -> AnalysisResult {
        score_tasks(tasks, weights, &self.context())
    }

    /// Score with a preset looked up by name; unknown names use `smart_balance`.
    pub fn score_named(&self, tasks: &[TaskRecord], strategy: &str) -> AnalysisResult {
        self.score(tasks, &Strategy::from_name_or_default(strategy).weights())
    }

    /// Validate raw records and a raw strategy request, then score.
    ///
    /// Warnings come out in pipeline order: record validation, scoring, then
    /// the strategy fallback (if any). A batch rejected as a whole (null, not
    /// a list, empty) yields an empty result with only the validator's warning.
    pub fn analyze(&self, raw_tasks: &Value, strategy: Option<&Value>) -> AnalysisResult {
        let (strategy, strategy_warning) = validate_strategy(strategy);
        let weights = strategy.weights();

        if !matches!(raw_tasks, Value::Array(items) if !items.is_empty()) {
            let (_, warnings) = validate_task_list(raw_tasks);
            debug!(?warnings, "batch rejected before scoring");
            return self.unusable_batch(&weights, warnings, strategy_warning);
        }

        let (tasks, mut warnings) = validate_task_list(raw_tasks);
        debug!(valid = tasks.len(), warnings = warnings.len(), "validated batch");

        let mut result = self.score(&tasks, &weights);
        warnings.append(&mut result.warnings);
        warnings.extend(strategy_warning);
        result.warnings = warnings;
        result
    }

    /// Full pipeline, then the top `count` tasks with reasons.
    pub fn suggest(&self, raw_tasks: &Value, strategy: Option<&Value>, count: usize) -> SuggestionResult {
        top_suggestions(self.analyze(raw_tasks, strategy), count)
    }

    fn unusable_batch(
        &self,
        weights: &StrategyWeights,
        mut warnings: Vec<String>,
        strategy_warning: Option<String>,
    ) -> AnalysisResult {
        warnings.extend(strategy_warning);
        AnalysisResult {
            success: true,
            strategy: weights.name.clone(),
            tasks: Vec::new(),
            metadata: AnalysisMetadata {
                total_tasks: 0,
                has_circular_dependencies: false,
                circular_dependency_cycles: Vec::new(),
                date_intelligence_enabled: self.working_days,
            },
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> PriorityEngine {
        PriorityEngine::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
    }

    #[test]
    fn test_rejected_batch_keeps_single_warning() {
        for raw in [json!(null), json!("tasks"), json!([])] {
            let result = engine().analyze(&raw, None);
            assert!(result.success);
            assert!(result.tasks.is_empty());
            assert_eq!(result.warnings.len(), 1, "{raw}: {:?}", result.warnings);
        }
    }

    #[test]
    fn test_all_entries_skipped_still_reports_empty_batch() {
        let result = engine().analyze(&json!([1, "two"]), None);
        assert!(result.tasks.is_empty());
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(result.warnings[2], crate::scoring::EMPTY_BATCH_WARNING);
    }

    #[test]
    fn test_warning_order() {
        let raw = json!([
            {"id": 1, "title": "a", "dependencies": [2], "importance": 40},
            {"id": 2, "title": "b", "dependencies": [1]}
        ]);
        let result = engine().analyze(&raw, Some(&json!("bogus")));
        assert_eq!(result.strategy, "smart_balance");
        assert_eq!(result.warnings.len(), 3, "{:?}", result.warnings);
        assert!(result.warnings[0].contains("importance"));
        assert!(result.warnings[1].starts_with("Circular dependencies detected"));
        assert!(result.warnings[2].contains("bogus"));
    }

    #[test]
    fn test_score_named_falls_back() {
        let tasks = [TaskRecord::new(1, "a")];
        assert_eq!(engine().score_named(&tasks, "HIGH_IMPACT").strategy, "high_impact");
        assert_eq!(engine().score_named(&tasks, "???").strategy, "smart_balance");
    }

    #[test]
    fn test_working_day_mode_flag() {
        let raw = json!([{"id": 1, "title": "a", "due_date": "2026-10-19"}]);
        let on = engine().analyze(&raw, None);
        assert!(on.metadata.date_intelligence_enabled);
        assert_eq!(on.tasks[0].working_days_until_due, Some(3));
        assert_eq!(on.tasks[0].scores.urgency, 8.0);

        let off = engine().with_working_days(false).analyze(&raw, None);
        assert!(!off.metadata.date_intelligence_enabled);
        assert_eq!(off.tasks[0].working_days_until_due, None);
        assert_eq!(off.tasks[0].scores.urgency, 6.0);
    }
}
