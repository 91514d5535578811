//! Disjunctive MILP formulation of the job-shop problem.
//!
//! Translates a [`ProblemInstance`] into a [`MilpModel`]:
//!
//! | Element | Count | Meaning |
//! |---------|-------|---------|
//! | `x[p,s]` | one per routed operation | start time, non-negative integer |
//! | `y[q,p,s]` | one per operation pair sharing station `s` | 1 = `p` runs before `q` |
//! | `z` | one | makespan |
//!
//! Constraints:
//! - **Precedence**: `x[p,a] + d[p,a] <= x[p,b]` for consecutive routing steps
//! - **Exclusion** (Big-M): `x[p,s] + d[p,s] - x[q,s] <= M(1 - y)` and
//!   `x[q,s] + d[q,s] - x[p,s] <= M*y`
//! - **Makespan**: `x[p,last] + d[p,last] <= z`
//!
//! Objective: minimize `z`.
//!
//! # Reference
//! - Manne (1960), "On the Job-Shop Scheduling Problem"
//! - Ku & Beck (2016), "Mixed Integer Programming models for job shop
//!   scheduling: A computational analysis"

mod extract;

pub use extract::extract_schedule;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::milp::{Comparison, LinearExpr, MilpModel, MilpSolution, MilpSolver, SolverConfig, VarId};
use crate::models::{Operation, OperationKey, ProblemInstance, Schedule};
use crate::validation::horizon_overflow;

/// Big-M constant of the exclusion constraints.
///
/// `M` must be at least any feasible makespan; a smaller value silently
/// removes feasible (possibly optimal) orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigM {
    /// Total routed processing time plus the longest single duration.
    Auto,
    /// Caller-supplied constant.
    Fixed(i64),
}

/// Formulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Big-M selection.
    pub big_m: BigM,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { big_m: BigM::Auto }
    }
}

impl ModelConfig {
    /// Sets the Big-M selection.
    pub fn with_big_m(mut self, big_m: BigM) -> Self {
        self.big_m = big_m;
        self
    }
}

/// An ordering decision between two operations on one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunction {
    /// Shared station.
    pub station_id: String,
    /// Operation of the earlier-declared product.
    pub first: OperationKey,
    /// Operation of the later-declared product.
    pub second: OperationKey,
    /// Binary indicator; 1 = `first` runs before `second`.
    pub indicator: VarId,
}

impl Disjunction {
    /// Whether `first` precedes `second` in a solution.
    pub fn first_precedes(&self, solution: &MilpSolution) -> Option<bool> {
        solution.value(self.indicator).map(|v| v == 1)
    }
}

/// Builds a [`JobShopModel`] from a problem instance.
///
/// # Example
/// ```
/// use u_jobshop::formulation::JobShopModelBuilder;
/// use u_jobshop::milp::{GoodLpSolver, SolverConfig};
/// use u_jobshop::models::ProblemInstance;
///
/// let instance = ProblemInstance::reference();
/// let model = JobShopModelBuilder::new(&instance).build().unwrap();
/// assert_eq!(model.operations().len(), 8);
///
/// let (schedule, _) = model
///     .solve(&GoodLpSolver::new(), &SolverConfig::default())
///     .unwrap();
/// assert_eq!(schedule.makespan, 85);
/// ```
#[derive(Debug, Clone)]
pub struct JobShopModelBuilder<'a> {
    instance: &'a ProblemInstance,
    config: ModelConfig,
}

impl<'a> JobShopModelBuilder<'a> {
    /// Creates a builder with the default configuration.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            config: ModelConfig::default(),
        }
    }

    /// Sets the formulation settings.
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the Big-M selection.
    pub fn with_big_m(mut self, big_m: BigM) -> Self {
        self.config.big_m = big_m;
        self
    }

    /// Validates the instance and builds the model.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidInstance`] if the instance tables are
    ///   inconsistent or the durations overflow the time horizon
    /// - [`ScheduleError::InvalidBigM`] for `BigM::Fixed(m)` with `m <= 0`
    ///
    /// Nothing reaches the solver in either case.
    pub fn build(&self) -> Result<JobShopModel, ScheduleError> {
        self.instance.validate()?;

        let operations = self.instance.operations();
        let safe_m = self
            .instance
            .safe_big_m()
            .ok_or_else(|| ScheduleError::InvalidInstance(vec![horizon_overflow()]))?;
        let big_m = match self.config.big_m {
            BigM::Auto => safe_m,
            BigM::Fixed(m) if m <= 0 => return Err(ScheduleError::InvalidBigM(m)),
            BigM::Fixed(m) => {
                if m < safe_m {
                    warn!(
                        big_m = m,
                        safe_bound = safe_m,
                        "Big-M below total processing time; feasible orderings may be cut off"
                    );
                }
                m
            }
        };

        let mut milp = MilpModel::new("jobshop");

        let start_vars: Vec<VarId> = operations
            .iter()
            .map(|op| milp.add_integer_var(format!("x[{}]", op.key)))
            .collect();
        let makespan = milp.add_integer_var("z");

        let index_of = |product: &str, station: &str| {
            operations
                .iter()
                .position(|op| op.product_id() == product && op.station_id() == station)
        };

        // Precedence along each routing, in declared order
        for product in &self.instance.products {
            let Some(routing) = self.instance.routing(&product.id) else {
                continue;
            };
            for (before, after) in routing.consecutive_pairs() {
                let (Some(a), Some(b)) = (index_of(&product.id, before), index_of(&product.id, after))
                else {
                    continue;
                };
                milp.add_constraint(
                    format!("prec[{}:{}->{}]", product.id, before, after),
                    LinearExpr::var(start_vars[a]).offset(operations[a].duration),
                    Comparison::Le,
                    LinearExpr::var(start_vars[b]),
                );
            }

            if let Some(last) = routing
                .last_station()
                .and_then(|s| index_of(&product.id, s))
            {
                milp.add_constraint(
                    format!("makespan[{}]", product.id),
                    LinearExpr::var(start_vars[last]).offset(operations[last].duration),
                    Comparison::Le,
                    LinearExpr::var(makespan),
                );
            }
        }

        // Pairwise exclusion per station
        let mut disjunctions = Vec::new();
        for station in &self.instance.stations {
            let on_station: Vec<usize> = (0..operations.len())
                .filter(|&i| operations[i].station_id() == station.id)
                .collect();

            for (n, &i) in on_station.iter().enumerate() {
                for &j in &on_station[n + 1..] {
                    let (first, second) = (&operations[i], &operations[j]);
                    if first.product_id() == second.product_id() {
                        continue;
                    }
                    let indicator = milp.add_binary_var(format!(
                        "y[{},{},{}]",
                        second.product_id(),
                        first.product_id(),
                        station.id
                    ));
                    let (xi, xj) = (start_vars[i], start_vars[j]);

                    // first.end - second.start <= M(1 - y)
                    milp.add_constraint(
                        format!("excl[{}:{}<{}]", station.id, first.product_id(), second.product_id()),
                        LinearExpr::var(xi).offset(first.duration).minus(xj, 1),
                        Comparison::Le,
                        LinearExpr::new().offset(big_m).minus(indicator, big_m),
                    );
                    // second.end - first.start <= M*y
                    milp.add_constraint(
                        format!("excl[{}:{}<{}]", station.id, second.product_id(), first.product_id()),
                        LinearExpr::var(xj).offset(second.duration).minus(xi, 1),
                        Comparison::Le,
                        LinearExpr::new().plus(indicator, big_m),
                    );

                    disjunctions.push(Disjunction {
                        station_id: station.id.clone(),
                        first: first.key.clone(),
                        second: second.key.clone(),
                        indicator,
                    });
                }
            }
        }

        milp.minimize(LinearExpr::var(makespan));

        debug!(
            operations = operations.len(),
            disjunctions = disjunctions.len(),
            variables = milp.variable_count(),
            constraints = milp.constraint_count(),
            big_m,
            "built job-shop model"
        );

        Ok(JobShopModel {
            milp,
            operations,
            start_vars,
            disjunctions,
            makespan,
            big_m,
        })
    }

    /// Builds, solves and extracts in one call.
    pub fn solve<S: MilpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<(Schedule, MilpSolution), ScheduleError> {
        self.build()?.solve(solver, config)
    }
}

/// A built job-shop formulation.
///
/// Owns the [`MilpModel`] and the mapping from operations to variables
/// that [`extract_schedule`] needs to read a solution back.
#[derive(Debug, Clone)]
pub struct JobShopModel {
    milp: MilpModel,
    operations: Vec<Operation>,
    start_vars: Vec<VarId>,
    disjunctions: Vec<Disjunction>,
    makespan: VarId,
    big_m: i64,
}

impl JobShopModel {
    /// The linear model.
    pub fn milp(&self) -> &MilpModel {
        &self.milp
    }

    /// Routed operations, in product then routing order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations paired with their start variables.
    pub fn start_vars(&self) -> impl Iterator<Item = (&Operation, VarId)> + '_ {
        self.operations.iter().zip(self.start_vars.iter().copied())
    }

    /// Start variable of an operation.
    pub fn start_var(&self, product_id: &str, station_id: &str) -> Option<VarId> {
        self.start_vars()
            .find(|(op, _)| op.product_id() == product_id && op.station_id() == station_id)
            .map(|(_, var)| var)
    }

    /// Ordering decisions, grouped by station.
    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    /// Makespan variable.
    pub fn makespan_var(&self) -> VarId {
        self.makespan
    }

    /// Big-M constant used in the exclusion constraints.
    pub fn big_m(&self) -> i64 {
        self.big_m
    }

    /// Submits the model to a solver and extracts the schedule.
    ///
    /// # Errors
    /// - [`ScheduleError::InfeasibleModel`] / [`ScheduleError::NoSolution`] /
    ///   [`ScheduleError::UnboundedModel`] / [`ScheduleError::UnsupportedModel`]
    ///   from the solver
    /// - [`ScheduleError::IncompleteSolution`] if a required value is missing
    pub fn solve<S: MilpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<(Schedule, MilpSolution), ScheduleError> {
        let solution = solver.solve(&self.milp, config)?;
        info!(
            solver = solver.name(),
            makespan = solution.value(self.makespan),
            status = ?solution.status,
            "job-shop model solved"
        );
        let schedule = extract_schedule(self, &solution)?;
        Ok((schedule, solution))
    }
}
