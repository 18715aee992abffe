//! Logging macros for the priority engine with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! Verbosity levels match the host service's logger:
//! - 0: SILENT (nothing)
//! - 1: SUMMARY (ranking results, cycle findings)
//! - 2: DETAIL (per-task component scores)
//! - 3: DEBUG (graph construction internals)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_DETAIL: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
///
/// Used for: final rankings, detected cycles, suggestion picks.
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DETAIL level (verbosity >= 2).
///
/// Used for: per-task score breakdowns.
#[macro_export]
macro_rules! log_detail {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DETAIL {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: skipped dependency references, DFS back edges.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_SUMMARY);
        assert!(VERBOSITY_SUMMARY < VERBOSITY_DETAIL);
        assert!(VERBOSITY_DETAIL < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_silent() {
        let verbosity = VERBOSITY_SILENT;
        log_summary!(verbosity, "ranked {} tasks", 3);
        log_detail!(verbosity, "task {} urgency={}", "a", 80.0);
        log_debug!(verbosity, "skipping {}", "ghost");
    }
}
