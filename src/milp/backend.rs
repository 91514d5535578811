//! `good_lp` backend.
//!
//! Translates a [`MilpModel`] into a `good_lp` problem and solves it with
//! the pure-Rust `microlp` branch-and-bound solver. Integer and binary
//! variables are declared as such; solved values are rounded back to
//! integers within [`SolverConfig::integrality_tolerance`].

use good_lp::{
    constraint, default_solver, variable, variables, Expression, ResolutionError, Solution,
    SolverModel, Variable as LpVariable,
};
use tracing::{debug, info};

use super::{
    Comparison, MilpModel, MilpSolution, MilpSolver, Sense, SolveStatus, SolverConfig,
    SolverFailure, Term, VarKind,
};

/// Solver that delegates to `good_lp`.
///
/// # Example
/// ```
/// use u_jobshop::milp::{Comparison, GoodLpSolver, LinearExpr, MilpModel, MilpSolver, SolverConfig};
///
/// let mut model = MilpModel::new("pair");
/// let a = model.add_integer_var("a");
/// let b = model.add_integer_var("b");
/// let z = model.add_integer_var("z");
/// model.add_constraint("a_before_b", LinearExpr::var(a).offset(4), Comparison::Le, LinearExpr::var(b));
/// model.add_constraint("b_done", LinearExpr::var(b).offset(2), Comparison::Le, LinearExpr::var(z));
/// model.minimize(LinearExpr::var(z));
///
/// let solution = GoodLpSolver::new()
///     .solve(&model, &SolverConfig::default())
///     .unwrap();
/// assert_eq!(solution.value(z), Some(6));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for GoodLpSolver {
    fn name(&self) -> &'static str {
        "good_lp/microlp"
    }

    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> Result<MilpSolution, SolverFailure> {
        let mut vars = variables!();
        let lp_vars: Vec<LpVariable> = model
            .variables()
            .iter()
            .map(|v| {
                let definition = match v.kind {
                    VarKind::Binary => variable().binary(),
                    VarKind::Integer => {
                        let definition = variable().integer().min(v.lower as f64);
                        match v.upper {
                            Some(upper) => definition.max(upper as f64),
                            None => definition,
                        }
                    }
                };
                vars.add(definition.name(v.name.clone()))
            })
            .collect();

        let (sense, objective) = match model.objective() {
            Some(objective) => (objective.sense, affine(model, &lp_vars, &objective.terms)?),
            None => (Sense::Minimize, Expression::from(0.0)),
        };
        let unsolved = match sense {
            Sense::Minimize => vars.minimise(objective),
            Sense::Maximize => vars.maximise(objective),
        };
        let mut problem = unsolved.using(default_solver);

        for c in model.constraints() {
            let lhs = affine(model, &lp_vars, &c.terms)?;
            let rhs = c.rhs as f64;
            let row = match c.cmp {
                Comparison::Le => constraint!(lhs <= rhs),
                Comparison::Ge => constraint!(lhs >= rhs),
                Comparison::Eq => constraint!(lhs == rhs),
            };
            problem = problem.with(row);
        }

        debug!(
            model = %model.name,
            variables = model.variable_count(),
            binaries = model.binary_count(),
            constraints = model.constraint_count(),
            "submitting model to good_lp"
        );

        let solved = problem.solve().map_err(|e| match e {
            ResolutionError::Infeasible => SolverFailure::Infeasible,
            ResolutionError::Unbounded => SolverFailure::Unbounded,
            other => SolverFailure::Backend(other.to_string()),
        })?;

        let mut values = Vec::with_capacity(lp_vars.len());
        for (v, lp) in model.variables().iter().zip(&lp_vars) {
            let raw = solved.value(*lp);
            let rounded = raw.round();
            if !rounded.is_finite() || (raw - rounded).abs() > config.integrality_tolerance {
                return Err(SolverFailure::Backend(format!(
                    "non-integral value {raw} for `{}`",
                    v.name
                )));
            }
            values.push(Some(rounded as i64));
        }

        let objective_value = model.objective_value(&values).unwrap_or(0);
        info!(model = %model.name, objective = objective_value, "good_lp solved model");

        Ok(MilpSolution {
            status: SolveStatus::Optimal,
            values,
            objective_value,
        })
    }
}

/// `sum(coefficient * var)` over `good_lp` variables.
fn affine(model: &MilpModel, lp_vars: &[LpVariable], terms: &[Term]) -> Result<Expression, SolverFailure> {
    let mut expr = Expression::from(0.0);
    for t in terms {
        let var = lp_vars.get(t.var.index()).ok_or_else(|| {
            SolverFailure::Unsupported(format!(
                "variable v{} is not declared in model `{}`",
                t.var.index(),
                model.name
            ))
        })?;
        expr += (t.coefficient as f64) * *var;
    }
    Ok(expr)
}
