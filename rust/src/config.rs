//! Configuration types for the priority engine.

use pyo3::prelude::*;
use thiserror::Error;

use crate::graph::CyclePolicy;
use crate::strategy::{StrategyError, Weights, DEFAULT_STRATEGY};

/// Errors raised while turning an `EngineConfig` into an engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown cycle policy: {0} (expected \"all\" or \"first\")")]
    UnknownCyclePolicy(String),
    #[error(transparent)]
    InvalidWeights(#[from] StrategyError),
}

/// Configuration for scoring, ranking and cycle reporting.
#[pyclass]
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Strategy name: "smart_balance", "fastest_wins", "high_impact" or
    /// "deadline_driven". Unknown names fall back to "smart_balance".
    #[pyo3(get, set)]
    pub strategy: String,
    /// Explicit weight vector; overrides `strategy` when set.
    #[pyo3(get, set)]
    pub weights: Option<Weights>,
    /// Cycle detection policy: "all" or "first"
    #[pyo3(get, set)]
    pub cycle_policy: String,
    /// Number of tasks returned by `suggest`
    #[pyo3(get, set)]
    pub suggestion_count: usize,
    /// Verbosity level: 0=silent, 1=summary, 2=detail, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY.to_string(),
            weights: None,
            cycle_policy: CyclePolicy::default().as_str().to_string(),
            suggestion_count: 3,
            verbosity: 0,
        }
    }
}

impl EngineConfig {
    pub fn with_strategy(strategy: &str) -> Self {
        Self {
            strategy: strategy.to_string(),
            ..Self::default()
        }
    }

    pub fn parsed_cycle_policy(&self) -> Result<CyclePolicy, ConfigError> {
        CyclePolicy::from_name(&self.cycle_policy)
            .ok_or_else(|| ConfigError::UnknownCyclePolicy(self.cycle_policy.clone()))
    }
}

#[pymethods]
impl EngineConfig {
    #[new]
    #[pyo3(signature = (
        strategy=None,
        weights=None,
        cycle_policy=None,
        suggestion_count=None,
        verbosity=None
    ))]
    fn new(
        strategy: Option<String>,
        weights: Option<Weights>,
        cycle_policy: Option<String>,
        suggestion_count: Option<usize>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            strategy: strategy.unwrap_or(defaults.strategy),
            weights,
            cycle_policy: cycle_policy.unwrap_or(defaults.cycle_policy),
            suggestion_count: suggestion_count.unwrap_or(defaults.suggestion_count),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "EngineConfig(strategy={:?}, cycle_policy={:?}, suggestion_count={})",
            self.strategy, self.cycle_policy, self.suggestion_count
        )
    }
}
