//! Rust implementation of the task priority core.
//!
//! This module provides the business calendar, dependency graph analysis and
//! multi-strategy scoring engine used by the task service, plus the Python
//! bindings the service calls them through.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::{Local, NaiveDate};
use pyo3::prelude::*;
use std::collections::HashMap;

pub mod calendar;
mod config;
pub mod engine;
mod explain;
pub mod graph;
mod interner;
pub mod logging;
mod models;
pub mod scoring;
pub mod strategy;
pub mod validation;

pub use calendar::{
    business_days_between, holidays, is_holiday, is_weekend, urgency_label, Holiday, HolidayInfo,
    UrgencyLabel,
};
pub use config::{ConfigError, EngineConfig};
pub use engine::{business_days_until, urgency_info, PriorityEngine, RankedTask};
pub use explain::explain;
pub use graph::{CyclePolicy, DependencyGraph};
pub use models::{
    ComponentScores, CycleReport, DependencyDetail, DependencyInfo, Task, TaskReport, UrgencyInfo,
};
pub use strategy::{Strategy, StrategyError, Weights, DEFAULT_STRATEGY, STRATEGIES};
pub use validation::{validate_task, TaskValidationError};

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn value_error(err: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(err.to_string())
}

fn engine_for(config: Option<&EngineConfig>) -> PyResult<PriorityEngine> {
    match config {
        Some(c) => PriorityEngine::from_config(c).map_err(value_error),
        None => Ok(PriorityEngine::default()),
    }
}

/// A ranked task with its score (PyO3 wrapper).
#[pyclass(name = "ScoredTask")]
#[derive(Clone, Debug)]
pub struct PyScoredTask {
    #[pyo3(get)]
    pub task: Task,
    #[pyo3(get)]
    pub score: f64,
    #[pyo3(get)]
    pub score_breakdown: ComponentScores,
}

#[pymethods]
impl PyScoredTask {
    fn __repr__(&self) -> String {
        format!("ScoredTask(id={:?}, score={:.2})", self.task.id, self.score)
    }
}

/// Rank tasks by descending priority under a named strategy.
///
/// # Arguments
/// * `tasks` - Snapshot of all tasks
/// * `strategy` - Strategy name; unknown names fall back to "smart_balance"
/// * `today` - Reference date (defaults to the local date)
///
/// # Returns
/// * List of ScoredTask, highest priority first; ties keep input order
#[pyfunction]
#[pyo3(signature = (tasks, strategy=DEFAULT_STRATEGY, today=None))]
fn rank_tasks(tasks: Vec<Task>, strategy: &str, today: Option<NaiveDate>) -> Vec<PyScoredTask> {
    PriorityEngine::new(strategy)
        .rank(&tasks, resolve_today(today))
        .into_iter()
        .map(|r| PyScoredTask {
            task: r.task.clone(),
            score: r.score,
            score_breakdown: r.scores,
        })
        .collect()
}

/// Component scores of one task within a snapshot.
#[pyfunction]
#[pyo3(signature = (task, all_tasks, today=None))]
fn score_breakdown(task: Task, all_tasks: Vec<Task>, today: Option<NaiveDate>) -> ComponentScores {
    PriorityEngine::default().score_breakdown(&task, &all_tasks, resolve_today(today))
}

/// Final priority of one task within a snapshot.
#[pyfunction]
#[pyo3(signature = (task, all_tasks, strategy=DEFAULT_STRATEGY, today=None))]
fn priority_score(
    task: Task,
    all_tasks: Vec<Task>,
    strategy: &str,
    today: Option<NaiveDate>,
) -> f64 {
    PriorityEngine::new(strategy).priority_score(&task, &all_tasks, resolve_today(today))
}

/// Full reports for every task, highest priority first.
///
/// # Raises
/// * ValueError if the config names an unknown cycle policy or invalid weights
#[pyfunction]
#[pyo3(signature = (tasks, config=None, today=None))]
fn analyze_tasks(
    tasks: Vec<Task>,
    config: Option<EngineConfig>,
    today: Option<NaiveDate>,
) -> PyResult<Vec<TaskReport>> {
    Ok(engine_for(config.as_ref())?.analyze(&tasks, resolve_today(today)))
}

/// Reports for the top tasks (`config.suggestion_count`, default 3).
#[pyfunction]
#[pyo3(signature = (tasks, config=None, today=None))]
fn suggest_tasks(
    tasks: Vec<Task>,
    config: Option<EngineConfig>,
    today: Option<NaiveDate>,
) -> PyResult<Vec<TaskReport>> {
    Ok(engine_for(config.as_ref())?.suggest(&tasks, resolve_today(today)))
}

/// Dependency cycles as id sequences (first id repeated at the end).
#[pyfunction]
#[pyo3(signature = (tasks, policy="all"))]
fn detect_cycles(tasks: Vec<Task>, policy: &str) -> PyResult<Vec<Vec<String>>> {
    let policy = CyclePolicy::from_name(policy)
        .ok_or_else(|| value_error(ConfigError::UnknownCyclePolicy(policy.to_string())))?;
    Ok(graph::detect_cycles(&tasks, policy))
}

/// Dependency cycles rendered as title chains.
#[pyfunction]
fn circular_dependencies(tasks: Vec<Task>) -> Vec<String> {
    PriorityEngine::default().circular_dependencies(&tasks)
}

#[pyfunction]
#[pyo3(signature = (tasks, config=None))]
fn cycle_report(tasks: Vec<Task>, config: Option<EngineConfig>) -> PyResult<CycleReport> {
    Ok(engine_for(config.as_ref())?.cycle_report(&tasks))
}

/// Blocking relationships keyed by task id.
#[pyfunction]
fn dependency_info(tasks: Vec<Task>) -> HashMap<String, DependencyInfo> {
    graph::dependency_info(&tasks).into_iter().collect()
}

#[pyfunction]
fn dependency_detail(task_id: &str, tasks: Vec<Task>) -> Option<DependencyDetail> {
    PriorityEngine::default().dependency_detail(task_id, &tasks)
}

#[pyfunction(name = "holidays")]
fn py_holidays(year: i32) -> Vec<(NaiveDate, String)> {
    holidays(year)
        .into_iter()
        .map(|h| (h.date, h.name.to_string()))
        .collect()
}

/// Returns (is_holiday, holiday_name).
#[pyfunction(name = "is_holiday")]
fn py_is_holiday(date: NaiveDate) -> (bool, Option<String>) {
    let info = is_holiday(date);
    (info.is_holiday, info.name.map(String::from))
}

#[pyfunction(name = "is_weekend")]
fn py_is_weekend(date: NaiveDate) -> bool {
    is_weekend(date)
}

#[pyfunction(name = "business_days_between")]
fn py_business_days_between(from_date: NaiveDate, to_date: NaiveDate) -> i64 {
    business_days_between(from_date, to_date)
}

#[pyfunction(name = "business_days_until")]
#[pyo3(signature = (due_date, today=None))]
fn py_business_days_until(due_date: Option<NaiveDate>, today: Option<NaiveDate>) -> Option<i64> {
    business_days_until(due_date, resolve_today(today))
}

/// Urgency label key ("overdue", "due_today", ...) for a day count.
#[pyfunction(name = "urgency_label")]
fn py_urgency_label(days_until_due: i64) -> &'static str {
    urgency_label(days_until_due).as_str()
}

#[pyfunction(name = "urgency_info")]
#[pyo3(signature = (task, today=None))]
fn py_urgency_info(task: Task, today: Option<NaiveDate>) -> UrgencyInfo {
    urgency_info(&task, resolve_today(today))
}

/// Field violations for a task; empty when valid.
#[pyfunction(name = "validate_task")]
fn py_validate_task(task: Task) -> Vec<(String, String)> {
    validate_task(&task)
        .into_iter()
        .map(|e| (e.field().to_string(), e.to_string()))
        .collect()
}

#[pyfunction]
fn strategy_names() -> Vec<&'static str> {
    strategy::strategy_names()
}

/// The taskrank.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Task>()?;
    m.add_class::<ComponentScores>()?;
    m.add_class::<DependencyInfo>()?;
    m.add_class::<DependencyDetail>()?;
    m.add_class::<UrgencyInfo>()?;
    m.add_class::<CycleReport>()?;
    m.add_class::<TaskReport>()?;
    m.add_class::<PyScoredTask>()?;

    // Config types
    m.add_class::<EngineConfig>()?;
    m.add_class::<Weights>()?;

    // Calendar
    m.add_function(wrap_pyfunction!(py_holidays, m)?)?;
    m.add_function(wrap_pyfunction!(py_is_holiday, m)?)?;
    m.add_function(wrap_pyfunction!(py_is_weekend, m)?)?;
    m.add_function(wrap_pyfunction!(py_business_days_between, m)?)?;
    m.add_function(wrap_pyfunction!(py_business_days_until, m)?)?;
    m.add_function(wrap_pyfunction!(py_urgency_label, m)?)?;
    m.add_function(wrap_pyfunction!(py_urgency_info, m)?)?;

    // Graph
    m.add_function(wrap_pyfunction!(detect_cycles, m)?)?;
    m.add_function(wrap_pyfunction!(circular_dependencies, m)?)?;
    m.add_function(wrap_pyfunction!(cycle_report, m)?)?;
    m.add_function(wrap_pyfunction!(dependency_info, m)?)?;
    m.add_function(wrap_pyfunction!(dependency_detail, m)?)?;

    // Scoring
    m.add_function(wrap_pyfunction!(rank_tasks, m)?)?;
    m.add_function(wrap_pyfunction!(score_breakdown, m)?)?;
    m.add_function(wrap_pyfunction!(priority_score, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_tasks, m)?)?;
    m.add_function(wrap_pyfunction!(suggest_tasks, m)?)?;
    m.add_function(wrap_pyfunction!(strategy_names, m)?)?;
    m.add_function(wrap_pyfunction!(py_validate_task, m)?)?;

    Ok(())
}
