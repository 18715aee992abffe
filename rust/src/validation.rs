//! Per-record checks run before tasks reach the engine.
//!
//! The engine itself never rejects a task; these checks let the calling
//! service refuse bad input with a precise message instead.

use thiserror::Error;

use crate::models::Task;

pub const MAX_TITLE_CHARS: usize = 255;
pub const MIN_IMPORTANCE: i32 = 1;
pub const MAX_IMPORTANCE: i32 = 10;

/// A single field violation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskValidationError {
    #[error("title must be a non-empty string")]
    EmptyTitle,
    #[error("title must be at most 255 characters, got {0}")]
    TitleTooLong(usize),
    #[error("estimated_hours must be a finite number, got {0}")]
    NonFiniteHours(f64),
    #[error("estimated_hours must be non-negative, got {0}")]
    NegativeHours(f64),
    #[error("importance must be between 1 and 10, got {0}")]
    ImportanceOutOfRange(i32),
}

impl TaskValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong(_) => "title",
            Self::NonFiniteHours(_) | Self::NegativeHours(_) => "estimated_hours",
            Self::ImportanceOutOfRange(_) => "importance",
        }
    }
}

/// Return every violation in `task`, in field order. Empty means valid.
pub fn validate_task(task: &Task) -> Vec<TaskValidationError> {
    let mut errors = Vec::new();

    let title_chars = task.title.chars().count();
    if task.title.trim().is_empty() {
        errors.push(TaskValidationError::EmptyTitle);
    } else if title_chars > MAX_TITLE_CHARS {
        errors.push(TaskValidationError::TitleTooLong(title_chars));
    }

    if !task.estimated_hours.is_finite() {
        errors.push(TaskValidationError::NonFiniteHours(task.estimated_hours));
    } else if task.estimated_hours < 0.0 {
        errors.push(TaskValidationError::NegativeHours(task.estimated_hours));
    }

    if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&task.importance) {
        errors.push(TaskValidationError::ImportanceOutOfRange(task.importance));
    }

    errors
}
