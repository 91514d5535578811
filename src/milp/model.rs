//! Linear model representation handed to a solver.
//!
//! A [`MilpModel`] owns its variables, constraints and objective. Nothing is
//! global: the formulation builds one value and passes it by reference to
//! [`MilpSolver::solve`](super::MilpSolver::solve).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a variable within its model.
///
/// Only [`MilpModel`] hands out ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position in the model's variable list.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Integer in `[lower, upper]`.
    Integer,
    /// 0 or 1.
    Binary,
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Unique name (e.g. `x[1,Corte]`).
    pub name: String,
    /// Domain.
    pub kind: VarKind,
    /// Inclusive lower bound.
    pub lower: i64,
    /// Inclusive upper bound. `None` = unbounded above.
    pub upper: Option<i64>,
}

/// Comparison operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

/// `coefficient * variable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Variable.
    pub var: VarId,
    /// Integer coefficient.
    pub coefficient: i64,
}

/// Linear expression `sum(terms) + constant`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearExpr {
    /// Terms.
    pub terms: Vec<Term>,
    /// Constant offset.
    pub constant: i64,
}

/// A linear constraint `sum(terms) cmp rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Label for diagnostics.
    pub name: String,
    /// Left-hand side terms.
    pub terms: Vec<Term>,
    /// Operator.
    pub cmp: Comparison,
    /// Right-hand side.
    pub rhs: i64,
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// Minimize the objective.
    Minimize,
    /// Maximize the objective.
    Maximize,
}

/// Linear objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// Direction.
    pub sense: Sense,
    /// Objective terms.
    pub terms: Vec<Term>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single variable with coefficient 1.
    pub fn var(var: VarId) -> Self {
        Self::new().plus(var, 1)
    }

    /// Adds `coefficient * var`.
    pub fn plus(mut self, var: VarId, coefficient: i64) -> Self {
        self.terms.push(Term { var, coefficient });
        self
    }

    /// Subtracts `coefficient * var`.
    pub fn minus(self, var: VarId, coefficient: i64) -> Self {
        self.plus(var, coefficient.saturating_neg())
    }

    /// Adds a constant.
    pub fn offset(mut self, constant: i64) -> Self {
        self.constant = self.constant.saturating_add(constant);
        self
    }

    /// Evaluates the expression. `None` if a variable has no value or the
    /// result overflows.
    pub fn evaluate(&self, values: &[Option<i64>]) -> Option<i64> {
        weighted_sum(&self.terms, values)?.checked_add(self.constant)
    }
}

impl LinearConstraint {
    /// Builds `lhs cmp rhs` from two expressions, moving every variable to
    /// the left and every constant to the right.
    pub fn from_exprs(name: impl Into<String>, lhs: LinearExpr, cmp: Comparison, rhs: LinearExpr) -> Self {
        let mut terms = lhs.terms;
        terms.extend(rhs.terms.into_iter().map(|t| Term {
            var: t.var,
            coefficient: t.coefficient.saturating_neg(),
        }));
        Self {
            name: name.into(),
            terms: merge_terms(terms),
            cmp,
            rhs: rhs.constant.saturating_sub(lhs.constant),
        }
    }

    /// Left-hand side value. `None` if a variable has no value or the sum
    /// overflows.
    pub fn lhs_value(&self, values: &[Option<i64>]) -> Option<i64> {
        weighted_sum(&self.terms, values)
    }

    /// Whether the constraint holds for the given values.
    pub fn is_satisfied(&self, values: &[Option<i64>]) -> bool {
        match self.lhs_value(values) {
            None => false,
            Some(lhs) => match self.cmp {
                Comparison::Le => lhs <= self.rhs,
                Comparison::Ge => lhs >= self.rhs,
                Comparison::Eq => lhs == self.rhs,
            },
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for t in &self.terms {
            write!(f, " {:+}*v{}", t.coefficient, t.var.0)?;
        }
        let op = match self.cmp {
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
        };
        write!(f, " {op} {}", self.rhs)
    }
}

/// Combines terms on the same variable and drops zero coefficients.
fn merge_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut merged: Vec<Term> = Vec::with_capacity(terms.len());
    for t in terms {
        match merged.iter_mut().find(|m| m.var == t.var) {
            Some(m) => m.coefficient = m.coefficient.saturating_add(t.coefficient),
            None => merged.push(t),
        }
    }
    merged.retain(|t| t.coefficient != 0);
    merged
}

/// `sum(coefficient * value)` with overflow checks.
fn weighted_sum(terms: &[Term], values: &[Option<i64>]) -> Option<i64> {
    terms.iter().try_fold(0i64, |total, t| {
        let value = values.get(t.var.index()).copied().flatten()?;
        total.checked_add(t.coefficient.checked_mul(value)?)
    })
}

/// A mixed-integer linear model.
///
/// # Example
/// ```
/// use u_jobshop::milp::{Comparison, LinearExpr, MilpModel};
///
/// let mut model = MilpModel::new("demo");
/// let a = model.add_integer_var("a");
/// let b = model.add_integer_var("b");
/// // a + 3 <= b
/// model.add_constraint("a_before_b", LinearExpr::var(a).offset(3), Comparison::Le, LinearExpr::var(b));
/// model.minimize(LinearExpr::var(b));
///
/// assert_eq!(model.variable_count(), 2);
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilpModel {
    /// Model name.
    pub name: String,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    objective: Option<Objective>,
}

impl MilpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Declares a variable.
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(variable);
        id
    }

    /// Declares a non-negative integer variable.
    pub fn add_integer_var(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(Variable {
            name: name.into(),
            kind: VarKind::Integer,
            lower: 0,
            upper: None,
        })
    }

    /// Declares a binary variable.
    pub fn add_binary_var(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(Variable {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0,
            upper: Some(1),
        })
    }

    /// Adds `lhs cmp rhs`.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        lhs: LinearExpr,
        cmp: Comparison,
        rhs: LinearExpr,
    ) -> usize {
        self.constraints
            .push(LinearConstraint::from_exprs(name, lhs, cmp, rhs));
        self.constraints.len() - 1
    }

    /// Sets the objective.
    pub fn set_objective(&mut self, sense: Sense, expr: LinearExpr) {
        self.objective = Some(Objective {
            sense,
            terms: merge_terms(expr.terms),
        });
    }

    /// Sets a minimization objective.
    pub fn minimize(&mut self, expr: LinearExpr) {
        self.set_objective(Sense::Minimize, expr);
    }

    /// Variable by id. `None` for an id from another model.
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Looks up a variable by name.
    pub fn find_variable(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(VarId)
    }

    /// All variables.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All constraints.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// The objective, if set.
    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of binary variables.
    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Binary)
            .count()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value for the given values. `None` without objective or
    /// with a missing value.
    pub fn objective_value(&self, values: &[Option<i64>]) -> Option<i64> {
        weighted_sum(&self.objective.as_ref()?.terms, values)
    }

    /// Whether `values` respects every bound and constraint.
    pub fn is_satisfied(&self, values: &[Option<i64>]) -> bool {
        self.unsatisfied(values).is_empty() && self.bounds_hold(values)
    }

    /// Constraints violated by `values`.
    pub fn unsatisfied(&self, values: &[Option<i64>]) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values))
            .collect()
    }

    fn bounds_hold(&self, values: &[Option<i64>]) -> bool {
        self.variables.iter().enumerate().all(|(i, v)| {
            match values.get(i).copied().flatten() {
                None => false,
                Some(x) => x >= v.lower && v.upper.map_or(true, |u| x <= u),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_normalization() {
        let mut model = MilpModel::new("t");
        let a = model.add_integer_var("a");
        let b = model.add_integer_var("b");
        // a + 30 <= b  →  a - b <= -30
        model.add_constraint("prec", LinearExpr::var(a).offset(30), Comparison::Le, LinearExpr::var(b));

        let c = &model.constraints()[0];
        assert_eq!(c.terms.len(), 2);
        assert_eq!(c.terms[0], Term { var: a, coefficient: 1 });
        assert_eq!(c.terms[1], Term { var: b, coefficient: -1 });
        assert_eq!(c.rhs, -30);
        assert_eq!(c.to_string(), "prec: +1*v0 -1*v1 <= -30");
    }

    #[test]
    fn test_merge_terms() {
        let mut model = MilpModel::new("t");
        let a = model.add_integer_var("a");
        // a + a - a >= 2  →  a >= 2
        model.add_constraint(
            "m",
            LinearExpr::var(a).plus(a, 1),
            Comparison::Ge,
            LinearExpr::var(a).offset(2),
        );
        let c = &model.constraints()[0];
        assert_eq!(c.terms, vec![Term { var: a, coefficient: 1 }]);
        assert_eq!(c.rhs, 2);

        // a - a <= 0 collapses to no terms
        model.add_constraint("z", LinearExpr::var(a), Comparison::Le, LinearExpr::var(a));
        assert!(model.constraints()[1].terms.is_empty());
    }

    #[test]
    fn test_satisfaction() {
        let mut model = MilpModel::new("t");
        let a = model.add_integer_var("a");
        let y = model.add_binary_var("y");
        model.add_constraint("c", LinearExpr::var(a).plus(y, 5), Comparison::Eq, LinearExpr::new().offset(7));

        assert!(model.is_satisfied(&[Some(2), Some(1)]));
        assert!(!model.is_satisfied(&[Some(7), Some(1)]));
        // y out of its binary domain
        assert!(!model.is_satisfied(&[Some(-3), Some(2)]));
        assert!(!model.is_satisfied(&[Some(2), None]));
        assert_eq!(model.unsatisfied(&[Some(3), Some(1)]).len(), 1);
    }

    #[test]
    fn test_objective_and_lookup() {
        let mut model = MilpModel::new("t");
        let a = model.add_integer_var("a");
        let z = model.add_integer_var("z");
        model.minimize(LinearExpr::var(z).plus(a, 2));

        assert_eq!(model.objective().unwrap().sense, Sense::Minimize);
        assert_eq!(model.objective_value(&[Some(1), Some(4)]), Some(6));
        assert_eq!(model.find_variable("z"), Some(z));
        assert_eq!(model.find_variable("w"), None);
        assert_eq!(model.variable(a).unwrap().kind, VarKind::Integer);
        assert!(model.variable(VarId(9)).is_none());
        assert_eq!(model.binary_count(), 0);
    }

    #[test]
    fn test_extreme_coefficients_saturate() {
        let mut model = MilpModel::new("t");
        let a = model.add_integer_var("a");
        let y = model.add_binary_var("y");
        model.add_constraint(
            "extreme",
            LinearExpr::var(a).offset(i64::MIN),
            Comparison::Le,
            LinearExpr::new().minus(y, i64::MIN).offset(i64::MAX),
        );
        let c = &model.constraints()[0];
        assert_eq!(c.terms[1], Term { var: y, coefficient: i64::MIN + 1 });
        assert_eq!(c.rhs, i64::MAX);

        // 2 * MAX overflows instead of wrapping
        let e = LinearExpr::new().plus(a, i64::MAX).plus(y, i64::MAX);
        assert_eq!(e.evaluate(&[Some(1), Some(1)]), None);
    }

    #[test]
    fn test_expr_evaluate() {
        let e = LinearExpr::var(VarId(0)).minus(VarId(1), 2).offset(4);
        assert_eq!(e.evaluate(&[Some(3), Some(1)]), Some(5));
        assert_eq!(e.evaluate(&[Some(3)]), None);
    }
}
