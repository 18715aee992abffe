//! Human-readable explanations for a task's priority.

use crate::models::{Task, UrgencyInfo};

const SEPARATOR: &str = " • ";

fn due_phrase(urgency: &UrgencyInfo) -> Option<String> {
    if urgency.days_until.is_none() {
        return None;
    }
    let mut phrase = match &urgency.holiday_name {
        Some(name) => format!("Due on {}", name),
        None => urgency.label.display_text().to_string(),
    };
    if let Some(business_days) = urgency.business_days {
        phrase.push_str(&format!(" ({} business days)", business_days));
    }
    Some(phrase)
}

fn importance_phrase(importance: i32) -> &'static str {
    match importance {
        i if i >= 8 => "High importance",
        i if i >= 5 => "Medium importance",
        _ => "Low importance",
    }
}

fn effort_phrase(hours: f64) -> &'static str {
    if hours <= 1.0 {
        "Quick win"
    } else if hours <= 4.0 {
        "Medium effort"
    } else {
        "Time-intensive"
    }
}

fn priority_phrase(priority_score: f64) -> &'static str {
    if priority_score >= 80.0 {
        "High priority"
    } else if priority_score >= 50.0 {
        "Medium priority"
    } else {
        "Low priority"
    }
}

/// Explain why `task` landed at `priority_score`.
///
/// `dependents` is the number of tasks directly waiting on this one.
pub fn explain(
    task: &Task,
    urgency: &UrgencyInfo,
    dependents: usize,
    priority_score: f64,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(5);
    if let Some(due) = due_phrase(urgency) {
        parts.push(due);
    }
    parts.push(importance_phrase(task.importance).to_string());
    parts.push(effort_phrase(task.estimated_hours).to_string());
    if dependents > 0 {
        let noun = if dependents == 1 { "task" } else { "tasks" };
        parts.push(format!("Unblocks {} {}", dependents, noun));
    }
    parts.push(priority_phrase(priority_score).to_string());
    parts.join(SEPARATOR)
}
