//! Reads a solved formulation back into a [`Schedule`].

use tracing::warn;

use super::JobShopModel;
use crate::error::ScheduleError;
use crate::milp::{MilpSolution, VarId};
use crate::models::{Schedule, ScheduleEntry, Violation, ViolationType};

/// Builds the schedule of a solved model.
///
/// Each entry gets `start = x[p,s]` and `end = min(start + duration, z)`.
/// The makespan constraints make clamping unnecessary for a correct model;
/// every clamped entry is logged as a warning, flagged on the entry and
/// recorded as a [`ViolationType::MakespanExceeded`] violation, so
/// [`Schedule::is_valid`] reports `false`.
///
/// # Errors
/// [`ScheduleError::IncompleteSolution`] if the solution lacks a value for
/// a start variable or the makespan.
pub fn extract_schedule(model: &JobShopModel, solution: &MilpSolution) -> Result<Schedule, ScheduleError> {
    let makespan = solved_value(model, solution, model.makespan_var())?;
    let mut schedule = Schedule::new(makespan);

    for (op, var) in model.start_vars() {
        let start = solved_value(model, solution, var)?;
        let mut entry = ScheduleEntry::new(&op.key, op.position, op.duration, start);
        if entry.clamp_to(makespan) {
            warn!(
                product = %op.product_id(),
                station = %op.station_id(),
                start,
                unclamped_end = entry.unclamped_end(),
                makespan,
                "operation end clamped to makespan; makespan bound may be mis-specified"
            );
            schedule.add_violation(Violation::new(
                ViolationType::MakespanExceeded,
                op.key.to_string(),
                format!(
                    "Operation [{}] ends at {} after makespan {}; end clamped",
                    op.key,
                    entry.unclamped_end(),
                    makespan
                ),
            ));
        }
        schedule.add_entry(entry);
    }

    Ok(schedule)
}

fn solved_value(model: &JobShopModel, solution: &MilpSolution, var: VarId) -> Result<i64, ScheduleError> {
    solution
        .value(var)
        .ok_or_else(|| ScheduleError::IncompleteSolution {
            variable: model
                .milp()
                .variable(var)
                .map_or_else(|| format!("v{}", var.index()), |v| v.name.clone()),
        })
}
