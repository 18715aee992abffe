//! Core data types for the priority engine.

use chrono::NaiveDate;
use pyo3::prelude::*;

use crate::calendar::UrgencyLabel;

// Note: result records use Vec / std types here for PyO3 interface compatibility

/// A task to be prioritized.
///
/// `dependency_ids` lists the tasks this one is blocked by. Edges are expected
/// to form a DAG but nothing here enforces it.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub title: String,
    #[pyo3(get, set)]
    pub due_date: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub estimated_hours: f64,
    #[pyo3(get, set)]
    pub importance: i32,
    #[pyo3(get, set)]
    pub dependency_ids: Vec<String>,
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (
        id,
        title,
        due_date=None,
        estimated_hours=0.0,
        importance=5,
        dependency_ids=Vec::new()
    ))]
    pub fn new(
        id: String,
        title: String,
        due_date: Option<NaiveDate>,
        estimated_hours: f64,
        importance: i32,
        dependency_ids: Vec<String>,
    ) -> Self {
        Self {
            id,
            title,
            due_date,
            estimated_hours,
            importance,
            dependency_ids,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, title={:?}, due={:?}, hours={}, importance={}, deps={})",
            self.id,
            self.title,
            self.due_date,
            self.estimated_hours,
            self.importance,
            self.dependency_ids.len()
        )
    }
}

/// The four 0-100 signals a priority score is built from.
#[pyclass]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComponentScores {
    #[pyo3(get)]
    pub urgency: f64,
    #[pyo3(get)]
    pub importance: f64,
    #[pyo3(get)]
    pub efficiency: f64,
    #[pyo3(get)]
    pub dependency: f64,
}

#[pymethods]
impl ComponentScores {
    fn __repr__(&self) -> String {
        format!(
            "ComponentScores(urgency={}, importance={}, efficiency={}, dependency={})",
            self.urgency, self.importance, self.efficiency, self.dependency
        )
    }
}

/// Blocking relationships of a single task in a graph snapshot.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyInfo {
    /// Tasks this task depends on.
    #[pyo3(get)]
    pub blocked_by: Vec<String>,
    /// Tasks that depend on this task.
    #[pyo3(get)]
    pub blocks: Vec<String>,
    #[pyo3(get)]
    pub blocked_count: usize,
    #[pyo3(get)]
    pub blocking_count: usize,
}

#[pymethods]
impl DependencyInfo {
    fn __repr__(&self) -> String {
        format!(
            "DependencyInfo(blocked_count={}, blocking_count={})",
            self.blocked_count, self.blocking_count
        )
    }
}

/// Direct and transitive dependency view of one task.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyDetail {
    #[pyo3(get)]
    pub task_id: String,
    #[pyo3(get)]
    pub task_title: String,
    #[pyo3(get)]
    pub direct_dependencies: Vec<String>,
    /// Every task this one waits on, directly or through other tasks.
    #[pyo3(get)]
    pub upstream: Vec<String>,
    /// Every task waiting on this one, directly or through other tasks.
    #[pyo3(get)]
    pub downstream: Vec<String>,
}

/// Calendar facts about a task's due date.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrgencyInfo {
    #[pyo3(get)]
    pub days_until: Option<i64>,
    #[pyo3(get)]
    pub business_days: Option<i64>,
    pub label: UrgencyLabel,
    #[pyo3(get)]
    pub is_holiday: bool,
    #[pyo3(get)]
    pub holiday_name: Option<String>,
}

impl UrgencyInfo {
    /// Placeholder for tasks that have no due date.
    pub fn undated() -> Self {
        Self {
            days_until: None,
            business_days: None,
            label: UrgencyLabel::DueLater,
            is_holiday: false,
            holiday_name: None,
        }
    }
}

#[pymethods]
impl UrgencyInfo {
    #[getter(label)]
    fn py_label(&self) -> &'static str {
        self.label.as_str()
    }

    #[getter]
    fn label_text(&self) -> &'static str {
        self.label.display_text()
    }

    fn __repr__(&self) -> String {
        format!(
            "UrgencyInfo(days_until={:?}, business_days={:?}, label={:?})",
            self.days_until,
            self.business_days,
            self.label.as_str()
        )
    }
}

/// Cycle findings over a task snapshot, rendered with titles.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    #[pyo3(get)]
    pub has_cycles: bool,
    #[pyo3(get)]
    pub cycle_count: usize,
    /// Member titles of each cycle in path order (closing repeat dropped).
    #[pyo3(get)]
    pub cycles: Vec<Vec<String>>,
    /// Ids of every task on a reported cycle, first-seen order.
    #[pyo3(get)]
    pub affected_task_ids: Vec<String>,
}

#[pymethods]
impl CycleReport {
    fn __repr__(&self) -> String {
        format!(
            "CycleReport(has_cycles={}, cycle_count={})",
            self.has_cycles, self.cycle_count
        )
    }
}

/// Full per-task analysis record handed back to the service layer.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct TaskReport {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub title: String,
    #[pyo3(get)]
    pub due_date: Option<NaiveDate>,
    #[pyo3(get)]
    pub estimated_hours: f64,
    #[pyo3(get)]
    pub importance: i32,
    /// Rounded to two decimals.
    #[pyo3(get)]
    pub priority_score: f64,
    #[pyo3(get)]
    pub score_breakdown: ComponentScores,
    #[pyo3(get)]
    pub explanation: String,
    #[pyo3(get)]
    pub urgency: UrgencyInfo,
    #[pyo3(get)]
    pub blocked_count: usize,
    #[pyo3(get)]
    pub blocking_count: usize,
    #[pyo3(get)]
    pub in_cycle: bool,
    #[pyo3(get)]
    pub is_critical: bool,
}

#[pymethods]
impl TaskReport {
    fn __repr__(&self) -> String {
        format!(
            "TaskReport(id={:?}, priority_score={}, in_cycle={})",
            self.id, self.priority_score, self.in_cycle
        )
    }
}
