//! Priority engine: weighted scoring, stable ranking and reporting.
//!
//! An engine holds only immutable settings (weights, cycle policy,
//! verbosity). Every operation derives its own dependency graph from the
//! snapshot it is given, so one engine can be shared across threads.

use chrono::NaiveDate;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;

use crate::calendar::{business_days_between, is_holiday, UrgencyLabel};
use crate::config::{ConfigError, EngineConfig};
use crate::explain::explain;
use crate::graph::{CyclePolicy, DependencyGraph};
use crate::models::{
    ComponentScores, CycleReport, DependencyDetail, Task, TaskReport, UrgencyInfo,
};
use crate::scoring::{component_scores_in, days_until};
use crate::strategy::{Strategy, StrategyError, Weights, DEFAULT_STRATEGY};
use crate::{log_debug, log_detail, log_summary};

/// Scores at or above this are flagged critical in reports.
pub const CRITICAL_SCORE: f64 = 85.0;

/// Separator between titles in a rendered cycle.
pub const CYCLE_ARROW: &str = " → ";

const CUSTOM_STRATEGY: &str = "custom";

/// A task with its final score and the components behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedTask<'a> {
    pub task: &'a Task,
    pub score: f64,
    pub scores: ComponentScores,
}

/// Descending score order. Equal scores compare equal so a stable sort keeps
/// their input order.
fn cmp_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Business days from `today` until `due_date`.
///
/// `None` without a due date, 0 once the date has passed.
pub fn business_days_until(due_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    let due_date = due_date?;
    if due_date < today {
        return Some(0);
    }
    Some(business_days_between(today, due_date))
}

/// Calendar facts about a task's due date; a placeholder when it has none.
pub fn urgency_info(task: &Task, today: NaiveDate) -> UrgencyInfo {
    let Some(due_date) = task.due_date else {
        return UrgencyInfo::undated();
    };
    let days = days_until(due_date, today);
    let holiday = is_holiday(due_date);
    UrgencyInfo {
        days_until: Some(days),
        business_days: business_days_until(Some(due_date), today),
        label: UrgencyLabel::from_days(days),
        is_holiday: holiday.is_holiday,
        holiday_name: holiday.name.map(String::from),
    }
}

/// Multi-strategy priority engine.
#[derive(Clone, Debug)]
pub struct PriorityEngine {
    strategy_name: &'static str,
    weights: Weights,
    cycle_policy: CyclePolicy,
    suggestion_count: usize,
    verbosity: u8,
}

impl Default for PriorityEngine {
    fn default() -> Self {
        Self::new(DEFAULT_STRATEGY)
    }
}

impl PriorityEngine {
    /// Engine for a named strategy. Unknown names use the default strategy.
    pub fn new(strategy: &str) -> Self {
        let resolved = Strategy::resolve(strategy);
        let defaults = EngineConfig::default();
        Self {
            strategy_name: resolved.name,
            weights: resolved.weights,
            cycle_policy: CyclePolicy::default(),
            suggestion_count: defaults.suggestion_count,
            verbosity: defaults.verbosity,
        }
    }

    /// Engine for an explicit weight vector.
    pub fn with_weights(weights: Weights) -> Result<Self, StrategyError> {
        Ok(Self {
            strategy_name: CUSTOM_STRATEGY,
            weights: weights.validated()?,
            ..Self::default()
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let base = match config.weights {
            Some(weights) => Self::with_weights(weights)?,
            None => Self::new(&config.strategy),
        };
        Ok(Self {
            cycle_policy: config.parsed_cycle_policy()?,
            suggestion_count: config.suggestion_count,
            verbosity: config.verbosity,
            ..base
        })
    }

    pub fn with_cycle_policy(self, cycle_policy: CyclePolicy) -> Self {
        Self {
            cycle_policy,
            ..self
        }
    }

    /// Resolved strategy name, or "custom" for explicit weights.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy_name
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    pub fn cycle_policy(&self) -> CyclePolicy {
        self.cycle_policy
    }

    /// Build the per-call graph and report references it had to drop.
    fn snapshot_graph(&self, tasks: &[Task]) -> DependencyGraph {
        let graph = DependencyGraph::build(tasks);
        for (task_id, dep_id) in graph.skipped_references() {
            log_debug!(
                self.verbosity,
                "  Skipping unknown dependency {} on task {}",
                dep_id,
                task_id
            );
        }
        graph
    }

    /// Component scores of `task` within `all_tasks`.
    pub fn score_breakdown(
        &self,
        task: &Task,
        all_tasks: &[Task],
        today: NaiveDate,
    ) -> ComponentScores {
        component_scores_in(&self.snapshot_graph(all_tasks), task, today)
    }

    /// Final 0-100 priority of `task` within `all_tasks`.
    pub fn priority_score(&self, task: &Task, all_tasks: &[Task], today: NaiveDate) -> f64 {
        self.weights.apply(&self.score_breakdown(task, all_tasks, today))
    }

    fn rank_in<'a>(
        &self,
        graph: &DependencyGraph,
        tasks: &'a [Task],
        today: NaiveDate,
    ) -> Vec<RankedTask<'a>> {
        let mut ranked: Vec<RankedTask<'a>> = tasks
            .iter()
            .map(|task| {
                let scores = component_scores_in(graph, task, today);
                let score = self.weights.apply(&scores);
                log_detail!(
                    self.verbosity,
                    "  {} score={:.2} (urg {} imp {} eff {} dep {})",
                    task.id,
                    score,
                    scores.urgency,
                    scores.importance,
                    scores.efficiency,
                    scores.dependency
                );
                RankedTask { task, score, scores }
            })
            .collect();

        // sort_by is stable: tied scores keep their input order.
        ranked.sort_by(|a, b| cmp_score_desc(a.score, b.score));
        ranked
    }

    /// Score every task and sort by descending priority.
    ///
    /// The result is a permutation of `tasks`. Ties keep input order.
    pub fn rank<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<RankedTask<'a>> {
        let graph = self.snapshot_graph(tasks);
        let ranked = self.rank_in(&graph, tasks, today);
        log_summary!(
            self.verbosity,
            "Ranked {} tasks with {}: {}",
            ranked.len(),
            self.strategy_name,
            ranked
                .iter()
                .take(3)
                .map(|r| format!("{}({:.2})", r.task.id, r.score))
                .collect::<Vec<_>>()
                .join(", ")
        );
        ranked
    }

    /// Cycles as id sequences, per the configured policy.
    pub fn detect_cycles(&self, tasks: &[Task]) -> Vec<Vec<String>> {
        let cycles = self.snapshot_graph(tasks).detect_cycles(self.cycle_policy);
        if !cycles.is_empty() {
            log_summary!(
                self.verbosity,
                "Found {} dependency cycle(s) ({} policy)",
                cycles.len(),
                self.cycle_policy.as_str()
            );
        }
        cycles
    }

    fn cycle_titles(cycles: &[Vec<String>], tasks: &[Task]) -> Vec<Vec<String>> {
        let mut titles: FxHashMap<&str, &str> = FxHashMap::default();
        for task in tasks {
            titles.entry(task.id.as_str()).or_insert(task.title.as_str());
        }
        cycles
            .iter()
            .map(|cycle| {
                let open = &cycle[..cycle.len().saturating_sub(1)];
                open.iter()
                    .filter_map(|id| titles.get(id.as_str()).map(|t| t.to_string()))
                    .collect()
            })
            .collect()
    }

    /// Cycles rendered as title chains ("A → B → C"); empty when acyclic.
    pub fn circular_dependencies(&self, tasks: &[Task]) -> Vec<String> {
        Self::cycle_titles(&self.detect_cycles(tasks), tasks)
            .into_iter()
            .filter(|chain| !chain.is_empty())
            .map(|chain| chain.join(CYCLE_ARROW))
            .collect()
    }

    /// Structured cycle findings for the caller to warn or block on.
    pub fn cycle_report(&self, tasks: &[Task]) -> CycleReport {
        let cycles = self.detect_cycles(tasks);
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut affected_task_ids = Vec::new();
        for cycle in &cycles {
            for id in &cycle[..cycle.len().saturating_sub(1)] {
                if seen.insert(id.as_str()) {
                    affected_task_ids.push(id.clone());
                }
            }
        }
        let titled = Self::cycle_titles(&cycles, tasks);
        CycleReport {
            has_cycles: !titled.is_empty(),
            cycle_count: titled.len(),
            cycles: titled,
            affected_task_ids,
        }
    }

    /// Direct and transitive dependencies of one task; `None` if it is not in `tasks`.
    pub fn dependency_detail(&self, task_id: &str, tasks: &[Task]) -> Option<DependencyDetail> {
        let task = tasks.iter().find(|t| t.id == task_id)?;
        let graph = self.snapshot_graph(tasks);
        Some(DependencyDetail {
            task_id: task.id.clone(),
            task_title: task.title.clone(),
            direct_dependencies: graph
                .dependencies(task_id)
                .into_iter()
                .map(String::from)
                .collect(),
            upstream: graph.transitive_dependencies(task_id),
            downstream: graph.transitive_dependents(task_id),
        })
    }

    fn report(
        &self,
        graph: &DependencyGraph,
        cycle_members: &FxHashSet<String>,
        ranked: &RankedTask<'_>,
        today: NaiveDate,
    ) -> TaskReport {
        let task = ranked.task;
        let urgency = urgency_info(task, today);
        let blocking_count = graph.dependent_count(&task.id);
        TaskReport {
            id: task.id.clone(),
            title: task.title.clone(),
            due_date: task.due_date,
            estimated_hours: task.estimated_hours,
            importance: task.importance,
            priority_score: round2(ranked.score),
            score_breakdown: ranked.scores,
            explanation: explain(task, &urgency, blocking_count, ranked.score),
            urgency,
            blocked_count: graph.dependency_count(&task.id),
            blocking_count,
            in_cycle: cycle_members.contains(&task.id),
            is_critical: ranked.score >= CRITICAL_SCORE,
        }
    }

    fn reports(&self, tasks: &[Task], today: NaiveDate, limit: Option<usize>) -> Vec<TaskReport> {
        let graph = self.snapshot_graph(tasks);
        let cycle_members = graph.cycle_members();
        let ranked = self.rank_in(&graph, tasks, today);
        let take = limit.unwrap_or(ranked.len());
        ranked
            .iter()
            .take(take)
            .map(|r| self.report(&graph, &cycle_members, r, today))
            .collect()
    }

    /// Reports for every task, highest priority first.
    pub fn analyze(&self, tasks: &[Task], today: NaiveDate) -> Vec<TaskReport> {
        let reports = self.reports(tasks, today, None);
        log_summary!(
            self.verbosity,
            "Analyzed {} tasks with {}",
            reports.len(),
            self.strategy_name
        );
        reports
    }

    /// Reports for the configured number of top tasks.
    pub fn suggest(&self, tasks: &[Task], today: NaiveDate) -> Vec<TaskReport> {
        self.suggest_n(tasks, self.suggestion_count, today)
    }

    /// Reports for the top `count` tasks.
    pub fn suggest_n(&self, tasks: &[Task], count: usize, today: NaiveDate) -> Vec<TaskReport> {
        let reports = self.reports(tasks, today, Some(count));
        log_summary!(
            self.verbosity,
            "Suggesting {}",
            reports
                .iter()
                .map(|r| r.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        reports
    }
}
