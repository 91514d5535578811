//! Mixed-integer linear modeling primitives and the solver seam.
//!
//! The scheduling formulation produces a [`MilpModel`]; any
//! [`MilpSolver`] turns it into a [`MilpSolution`] or a [`SolverFailure`].
//! [`GoodLpSolver`] is the bundled backend; it hands the model to the
//! `good_lp` crate.

mod backend;
mod model;
mod solution;

pub use backend::GoodLpSolver;
pub use model::{
    Comparison, LinearConstraint, LinearExpr, MilpModel, Objective, Sense, Term, VarId, VarKind,
    Variable,
};
pub use solution::{MilpSolution, MilpSolver, SolveStatus, SolverConfig, SolverFailure};
