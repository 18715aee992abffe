//! Component score functions.
//!
//! Each function maps one aspect of a task to a 0-100 score independently of
//! the others. Thresholds are step functions; higher means "do this sooner".

use chrono::NaiveDate;

use crate::graph::DependencyGraph;
use crate::models::{ComponentScores, Task};

/// Score for tasks with no due date, and for due dates more than a week out.
pub const DEFAULT_URGENCY: f64 = 20.0;

/// Score for tasks without an effort estimate.
pub const UNESTIMATED_EFFICIENCY: f64 = 50.0;

/// Calendar days from `today` to `due_date` (negative when overdue).
pub fn days_until(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

/// Time pressure from calendar (not business) days until due.
pub fn urgency_score(task: &Task, today: NaiveDate) -> f64 {
    let Some(due_date) = task.due_date else {
        return DEFAULT_URGENCY;
    };
    match days_until(due_date, today) {
        d if d < 0 => 100.0,
        0 => 95.0,
        1 => 90.0,
        2..=3 => 80.0,
        4..=7 => 50.0,
        _ => DEFAULT_URGENCY,
    }
}

/// Importance rating (1-10) scaled to 0-100.
///
/// Ratings are validated upstream; anything outside 0-10 that slips through is
/// clamped so the component stays in [0, 100].
pub fn importance_score(task: &Task) -> f64 {
    (f64::from(task.importance) * 10.0).clamp(0.0, 100.0)
}

/// Quick tasks score higher.
pub fn efficiency_score(task: &Task) -> f64 {
    let hours = task.estimated_hours;
    if hours <= 0.0 {
        UNESTIMATED_EFFICIENCY
    } else if hours <= 1.0 {
        100.0
    } else if hours <= 2.0 {
        80.0
    } else if hours <= 4.0 {
        60.0
    } else {
        40.0
    }
}

/// Dependency impact from direct counts.
///
/// `dependents * 40 - dependencies * 15 + 40`, clamped to [0, 100]. Unblocking
/// others raises the score; waiting on others lowers it.
pub fn dependency_impact_from_counts(dependents: usize, dependencies: usize) -> f64 {
    let raw = dependents as f64 * 40.0 - dependencies as f64 * 15.0 + 40.0;
    raw.clamp(0.0, 100.0)
}

/// Dependency impact of `task` within an already built snapshot graph.
pub fn dependency_impact_in(graph: &DependencyGraph, task: &Task) -> f64 {
    dependency_impact_from_counts(
        graph.dependent_count(&task.id),
        graph.dependency_count(&task.id),
    )
}

/// Dependency impact of `task` against `all_tasks`, building a fresh graph.
pub fn dependency_impact(task: &Task, all_tasks: &[Task]) -> f64 {
    dependency_impact_in(&DependencyGraph::build(all_tasks), task)
}

/// All four component scores against a prebuilt graph.
pub fn component_scores_in(
    graph: &DependencyGraph,
    task: &Task,
    today: NaiveDate,
) -> ComponentScores {
    ComponentScores {
        urgency: urgency_score(task, today),
        importance: importance_score(task),
        efficiency: efficiency_score(task),
        dependency: dependency_impact_in(graph, task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_task(
        id: &str,
        due: Option<NaiveDate>,
        hours: f64,
        importance: i32,
        deps: Vec<&str>,
    ) -> Task {
        Task::new(
            id.to_string(),
            format!("Task {}", id),
            due,
            hours,
            importance,
            deps.into_iter().map(String::from).collect(),
        )
    }

    #[test]
    fn test_urgency_breakpoints() {
        let today = d(2025, 3, 10);
        let cases = [
            (-5, 100.0),
            (-1, 100.0),
            (0, 95.0),
            (1, 90.0),
            (2, 80.0),
            (3, 80.0),
            (4, 50.0),
            (7, 50.0),
            (8, 20.0),
            (365, 20.0),
        ];
        for (offset, expected) in cases {
            let due = today + chrono::Duration::days(offset);
            let task = make_task("t", Some(due), 1.0, 5, vec![]);
            assert_eq!(urgency_score(&task, today), expected, "offset {}", offset);
        }
    }

    #[test]
    fn test_urgency_non_increasing() {
        let today = d(2025, 3, 10);
        let scores: Vec<f64> = (-3..15)
            .map(|offset| {
                let due = today + chrono::Duration::days(offset);
                urgency_score(&make_task("t", Some(due), 1.0, 5, vec![]), today)
            })
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_urgency_without_due_date() {
        let task = make_task("t", None, 1.0, 5, vec![]);
        assert_eq!(urgency_score(&task, d(2025, 3, 10)), DEFAULT_URGENCY);
    }

    #[test]
    fn test_importance_scaling() {
        assert_eq!(importance_score(&make_task("t", None, 1.0, 7, vec![])), 70.0);
        assert_eq!(importance_score(&make_task("t", None, 1.0, 1, vec![])), 10.0);
        assert_eq!(importance_score(&make_task("t", None, 1.0, 10, vec![])), 100.0);
    }

    #[test]
    fn test_importance_out_of_range_is_clamped() {
        assert_eq!(importance_score(&make_task("t", None, 1.0, 14, vec![])), 100.0);
        assert_eq!(importance_score(&make_task("t", None, 1.0, -3, vec![])), 0.0);
    }

    #[test]
    fn test_efficiency_steps() {
        let score = |hours: f64| efficiency_score(&make_task("t", None, hours, 5, vec![]));
        assert_eq!(score(0.0), 50.0);
        assert_eq!(score(0.5), 100.0);
        assert_eq!(score(1.0), 100.0);
        assert_eq!(score(1.5), 80.0);
        assert_eq!(score(2.0), 80.0);
        assert_eq!(score(3.0), 60.0);
        assert_eq!(score(4.0), 60.0);
        assert_eq!(score(10.0), 40.0);
    }

    #[test]
    fn test_dependency_impact_counts() {
        assert_eq!(dependency_impact_from_counts(0, 0), 40.0);
        assert_eq!(dependency_impact_from_counts(1, 0), 80.0);
        assert_eq!(dependency_impact_from_counts(0, 1), 25.0);
        assert_eq!(dependency_impact_from_counts(5, 0), 100.0);
        assert_eq!(dependency_impact_from_counts(0, 5), 0.0);
    }

    #[test]
    fn test_dependency_impact_monotonic_and_bounded() {
        for dependencies in 0..8 {
            let row: Vec<f64> = (0..8)
                .map(|dependents| dependency_impact_from_counts(dependents, dependencies))
                .collect();
            assert!(row.windows(2).all(|w| w[0] <= w[1]));
            assert!(row.iter().all(|s| (0.0..=100.0).contains(s)));
        }
        for dependents in 0..8 {
            let column: Vec<f64> = (0..8)
                .map(|dependencies| dependency_impact_from_counts(dependents, dependencies))
                .collect();
            assert!(column.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_dependency_impact_against_snapshot() {
        let tasks = vec![
            make_task("t1", None, 3.0, 8, vec![]),
            make_task("t2", None, 1.0, 5, vec!["t1"]),
        ];
        assert_eq!(dependency_impact(&tasks[0], &tasks), 80.0);
        assert_eq!(dependency_impact(&tasks[1], &tasks), 25.0);
    }

    #[test]
    fn test_dependency_impact_task_outside_snapshot() {
        let outsider = make_task("x", None, 1.0, 5, vec!["t1"]);
        let tasks = vec![make_task("t1", None, 1.0, 5, vec![])];
        assert_eq!(dependency_impact(&outsider, &tasks), 40.0);
    }
}
