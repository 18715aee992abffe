//! Weighting strategies for combining component scores.
//!
//! Strategies are a lookup table. Adding one is a new row in `STRATEGIES`;
//! the first row is the default that unknown names resolve to.

use pyo3::prelude::*;
use thiserror::Error;

use crate::models::ComponentScores;

/// Allowed drift of a weight vector's sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Errors for user-supplied weight vectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Weight for {component} must be a finite non-negative number, got {value}")]
    InvalidWeight {
        component: &'static str,
        value: f64,
    },
    #[error("Weights must sum to 1.0, got {0}")]
    WeightsDoNotSumToOne(f64),
}

/// One weight per component score.
#[pyclass]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    #[pyo3(get)]
    pub urgency: f64,
    #[pyo3(get)]
    pub importance: f64,
    #[pyo3(get)]
    pub efficiency: f64,
    #[pyo3(get)]
    pub dependency: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, efficiency: f64, dependency: f64) -> Self {
        Self {
            urgency,
            importance,
            efficiency,
            dependency,
        }
    }

    /// Check a caller-supplied vector before it is used for scoring.
    pub fn validated(self) -> Result<Self, StrategyError> {
        for (component, value) in [
            ("urgency", self.urgency),
            ("importance", self.importance),
            ("efficiency", self.efficiency),
            ("dependency", self.dependency),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StrategyError::InvalidWeight { component, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(StrategyError::WeightsDoNotSumToOne(sum));
        }
        Ok(self)
    }

    pub fn sum(&self) -> f64 {
        self.urgency + self.importance + self.efficiency + self.dependency
    }

    /// Weighted sum of `scores`, clamped to [0, 100].
    pub fn apply(&self, scores: &ComponentScores) -> f64 {
        let total = scores.urgency * self.urgency
            + scores.importance * self.importance
            + scores.efficiency * self.efficiency
            + scores.dependency * self.dependency;
        total.clamp(0.0, 100.0)
    }
}

#[pymethods]
impl Weights {
    #[new]
    fn py_new(
        urgency: f64,
        importance: f64,
        efficiency: f64,
        dependency: f64,
    ) -> PyResult<Self> {
        Self::new(urgency, importance, efficiency, dependency)
            .validated()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "Weights(urgency={}, importance={}, efficiency={}, dependency={})",
            self.urgency, self.importance, self.efficiency, self.dependency
        )
    }
}

/// A named weighting preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strategy {
    pub name: &'static str,
    pub weights: Weights,
}

pub const DEFAULT_STRATEGY: &str = "smart_balance";

/// Known strategies. Index 0 is the fallback.
pub const STRATEGIES: [Strategy; 4] = [
    Strategy {
        name: DEFAULT_STRATEGY,
        weights: Weights::new(0.25, 0.35, 0.25, 0.15),
    },
    Strategy {
        name: "fastest_wins",
        weights: Weights::new(0.15, 0.35, 0.40, 0.10),
    },
    Strategy {
        name: "high_impact",
        weights: Weights::new(0.20, 0.45, 0.10, 0.25),
    },
    Strategy {
        name: "deadline_driven",
        weights: Weights::new(0.50, 0.25, 0.10, 0.15),
    },
];

impl Strategy {
    /// Look up a strategy by exact name.
    pub fn find(name: &str) -> Option<&'static Strategy> {
        STRATEGIES.iter().find(|s| s.name == name)
    }

    /// Look up a strategy, falling back to the default for unknown names.
    pub fn resolve(name: &str) -> &'static Strategy {
        Self::find(name).unwrap_or(&STRATEGIES[0])
    }

    pub fn default_strategy() -> &'static Strategy {
        &STRATEGIES[0]
    }
}

/// Names of all known strategies, default first.
pub fn strategy_names() -> Vec<&'static str> {
    STRATEGIES.iter().map(|s| s.name).collect()
}
