//! Solver interface: configuration, results and failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MilpModel, VarId};

/// An optimizer that assigns values to a [`MilpModel`].
///
/// Implementations either return a value for every variable or a
/// [`SolverFailure`]. The scheduling core makes exactly one blocking call
/// per model; timeouts and cancellation belong to the implementation and
/// its [`SolverConfig`].
pub trait MilpSolver {
    /// Solver name (for logs).
    fn name(&self) -> &'static str;

    /// Solves the model.
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> Result<MilpSolution, SolverFailure>;
}

/// Solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Largest distance from the nearest integer accepted when reading an
    /// integer or binary value back from a floating-point backend.
    pub integrality_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            integrality_tolerance: 1e-6,
        }
    }
}

impl SolverConfig {
    /// Sets the integrality tolerance.
    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }
}

/// Quality of a returned solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Feasible, search stopped at a limit before proving optimality.
    Feasible,
}

/// Values returned by a solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilpSolution {
    /// Optimality status.
    pub status: SolveStatus,
    /// Value per variable, indexed by [`VarId`].
    pub values: Vec<Option<i64>>,
    /// Objective value of `values`.
    pub objective_value: i64,
}

impl MilpSolution {
    /// Value of a variable, if the solver assigned one.
    pub fn value(&self, var: VarId) -> Option<i64> {
        self.values.get(var.index()).copied().flatten()
    }

    /// Whether the search proved optimality.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Reasons a solver returns no solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverFailure {
    /// No assignment satisfies all constraints.
    #[error("model is infeasible")]
    Infeasible,
    /// The objective can be improved without bound.
    #[error("model is unbounded")]
    Unbounded,
    /// The backend stopped without a usable solution.
    #[error("solver backend failed: {0}")]
    Backend(String),
    /// The model is outside what this solver handles.
    #[error("unsupported model: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SolverConfig::default();
        assert!((config.integrality_tolerance - 1e-6).abs() < 1e-12);
        let config = config.with_integrality_tolerance(0.01);
        assert!((config.integrality_tolerance - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_config_deserialize() {
        let config: SolverConfig = serde_json::from_str(r#"{"integrality_tolerance": 0.001}"#).unwrap();
        assert!((config.integrality_tolerance - 0.001).abs() < 1e-12);

        let config: SolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_solution_value() {
        let solution = MilpSolution {
            status: SolveStatus::Feasible,
            values: vec![Some(3), None],
            objective_value: 3,
        };
        assert_eq!(solution.value(VarId(0)), Some(3));
        assert_eq!(solution.value(VarId(1)), None);
        assert_eq!(solution.value(VarId(7)), None);
        assert!(!solution.is_optimal());
    }
}
