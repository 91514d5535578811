//! Error taxonomy of the scheduling pipeline.
//!
//! Every failure is returned to the caller; nothing is retried or
//! defaulted. Re-running only helps with corrected input data or a larger
//! Big-M bound.

use thiserror::Error;

use crate::milp::SolverFailure;
use crate::validation::ValidationError;

/// Errors raised while building, solving or reading back a job-shop model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Instance tables are inconsistent. Detected before the solver runs.
    #[error("invalid instance: {}", join_messages(.0))]
    InvalidInstance(Vec<ValidationError>),

    /// The solver proved that no assignment satisfies all constraints.
    #[error("model is infeasible")]
    InfeasibleModel,

    /// The solver reported an unbounded objective.
    #[error("model is unbounded")]
    UnboundedModel,

    /// The solver stopped without returning a solution.
    #[error("solver returned no solution: {0}")]
    NoSolution(String),

    /// A fixed Big-M constant that cannot separate any two operations.
    #[error("Big-M must be positive, got {0}")]
    InvalidBigM(i64),

    /// The solver cannot handle the submitted model.
    #[error("solver rejected the model: {0}")]
    UnsupportedModel(String),

    /// The solver reported success but omitted a required variable.
    #[error("solution has no value for variable `{variable}`")]
    IncompleteSolution {
        /// Name of the missing variable.
        variable: String,
    },
}

impl From<SolverFailure> for ScheduleError {
    fn from(failure: SolverFailure) -> Self {
        match failure {
            SolverFailure::Infeasible => Self::InfeasibleModel,
            SolverFailure::Unbounded => Self::UnboundedModel,
            SolverFailure::Backend(reason) => Self::NoSolution(reason),
            SolverFailure::Unsupported(reason) => Self::UnsupportedModel(reason),
        }
    }
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidInstance(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
