//! Instance validation and schedule verification.
//!
//! [`validate_instance`] checks the structural integrity of a problem
//! instance before a model is built. Detects:
//! - Duplicate product or station IDs
//! - Routings or durations referencing undeclared products/stations
//! - Routed operations without a duration entry
//! - Duplicate operations (repeated station in a routing, repeated
//!   duration entry, repeated routing)
//! - Negative durations and products without a routing
//!
//! [`check_schedule`] independently verifies a solved schedule against the
//! instance: non-negative starts, routing precedence, station exclusion and
//! the makespan bound.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::models::{OperationKey, ProblemInstance, Schedule, ScheduleEntry, Violation, ViolationType};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two products or two stations share the same ID.
    DuplicateId,
    /// A routing or duration references an undeclared product.
    UnknownProduct,
    /// A routing or duration references an undeclared station.
    UnknownStation,
    /// A routed (product, station) pair has no duration entry.
    MissingDuration,
    /// An operation is listed more than once.
    DuplicateOperation,
    /// A duration is negative.
    NegativeDuration,
    /// A product has no routed station.
    EmptyRouting,
    /// Routed durations sum beyond the representable time horizon.
    HorizonOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem instance.
///
/// Checks:
/// 1. No duplicate product IDs, no duplicate station IDs
/// 2. Every duration entry names a declared product and station, is
///    non-negative and appears once
/// 3. Every routing names a declared product, appears once per product and
///    lists each declared station at most once
/// 4. Every routed pair has a duration entry
/// 5. Every declared product has a non-empty routing
/// 6. Total routed processing time plus the longest duration fits in `i64`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &ProblemInstance) -> ValidationResult {
    let mut errors = Vec::new();

    let mut product_ids = HashSet::new();
    for p in &instance.products {
        if !product_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate product ID: {}", p.id),
            ));
        }
    }

    let mut station_ids = HashSet::new();
    for s in &instance.stations {
        if !station_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate station ID: {}", s.id),
            ));
        }
    }

    // Duration table
    let mut timed = HashSet::new();
    for t in &instance.processing_times {
        if !product_ids.contains(t.product_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProduct,
                format!("Duration entry references unknown product '{}'", t.product_id),
            ));
        }
        if !station_ids.contains(t.station_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownStation,
                format!("Duration entry references unknown station '{}'", t.station_id),
            ));
        }
        if t.duration < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!(
                    "Negative duration {} for product '{}' on station '{}'",
                    t.duration, t.product_id, t.station_id
                ),
            ));
        }
        if !timed.insert(t.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateOperation,
                format!(
                    "Duplicate duration entry for product '{}' on station '{}'",
                    t.product_id, t.station_id
                ),
            ));
        }
    }

    // Routings
    let mut routed_products = HashSet::new();
    for routing in &instance.routings {
        let product = routing.product_id.as_str();
        if !product_ids.contains(product) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProduct,
                format!("Routing references unknown product '{product}'"),
            ));
        }
        if !routed_products.insert(product) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateOperation,
                format!("Product '{product}' has more than one routing"),
            ));
        }

        let mut visited = HashSet::new();
        for station in &routing.stations {
            if !station_ids.contains(station.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownStation,
                    format!("Routing of product '{product}' references unknown station '{station}'"),
                ));
            }
            if !visited.insert(station.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateOperation,
                    format!("Routing of product '{product}' visits station '{station}' twice"),
                ));
            }
            if !timed.contains(&OperationKey::new(product, station)) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingDuration,
                    format!("No duration for product '{product}' on station '{station}'"),
                ));
            }
        }
    }

    for p in &instance.products {
        let empty = instance
            .routing(&p.id)
            .map(|r| r.is_empty())
            .unwrap_or(true);
        if empty {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRouting,
                format!("Product '{}' has no routed station", p.id),
            ));
        }
    }

    if instance.safe_big_m().is_none() {
        errors.push(horizon_overflow());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub(crate) fn horizon_overflow() -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::HorizonOverflow,
        "Total processing time overflows the time horizon",
    )
}

/// Verifies a schedule against its instance.
///
/// Checks, using unclamped end times:
/// 1. Every routed operation has a duration entry and a schedule entry
/// 2. Every start is non-negative
/// 3. Consecutive routing steps do not overlap (`A.end <= B.start`)
/// 4. Operations of different products on one station do not overlap
/// 5. No operation ends after the makespan
/// 6. The makespan equals the latest product completion
///
/// # Returns
/// All detected violations; empty when the schedule is feasible.
pub fn check_schedule(instance: &ProblemInstance, schedule: &Schedule) -> Vec<Violation> {
    let mut violations = Vec::new();

    let by_key: HashMap<(&str, &str), &ScheduleEntry> = schedule
        .entries
        .iter()
        .map(|e| ((e.product_id.as_str(), e.station_id.as_str()), e))
        .collect();

    for routing in &instance.routings {
        for station in &routing.stations {
            let key = OperationKey::new(&routing.product_id, station);
            if instance.duration(&routing.product_id, station).is_none() {
                violations.push(Violation::new(
                    ViolationType::MissingEntry,
                    key.to_string(),
                    format!("Routed operation [{key}] has no duration entry"),
                ));
            } else if !by_key.contains_key(&(routing.product_id.as_str(), station.as_str())) {
                violations.push(Violation::new(
                    ViolationType::MissingEntry,
                    key.to_string(),
                    format!("No schedule entry for operation [{key}]"),
                ));
            }
        }
    }

    for e in &schedule.entries {
        if e.start < 0 {
            violations.push(Violation::new(
                ViolationType::NegativeStart,
                e.key().to_string(),
                format!("Operation [{}] starts at {}", e.key(), e.start),
            ));
        }
        if e.unclamped_end() > schedule.makespan {
            violations.push(Violation::new(
                ViolationType::MakespanExceeded,
                e.key().to_string(),
                format!(
                    "Operation [{}] ends at {} after makespan {}",
                    e.key(),
                    e.unclamped_end(),
                    schedule.makespan
                ),
            ));
        }
    }

    let mut latest_completion = 0;
    for routing in &instance.routings {
        for (before, after) in routing.consecutive_pairs() {
            let (Some(a), Some(b)) = (
                by_key.get(&(routing.product_id.as_str(), before)),
                by_key.get(&(routing.product_id.as_str(), after)),
            ) else {
                continue;
            };
            if a.unclamped_end() > b.start {
                violations.push(Violation::new(
                    ViolationType::PrecedenceViolation,
                    b.key().to_string(),
                    format!(
                        "Operation [{}] starts at {} before [{}] ends at {}",
                        b.key(),
                        b.start,
                        a.key(),
                        a.unclamped_end()
                    ),
                ));
            }
        }
        if let Some(last) = routing
            .last_station()
            .and_then(|s| by_key.get(&(routing.product_id.as_str(), s)))
        {
            latest_completion = latest_completion.max(last.unclamped_end());
        }
    }

    for station in &instance.stations {
        let entries = schedule.entries_for_station(&station.id);
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (a, b) = (entries[i], entries[j]);
                if a.product_id != b.product_id && a.overlaps(b) {
                    violations.push(Violation::new(
                        ViolationType::StationOverlap,
                        station.id.clone(),
                        format!(
                            "Products '{}' [{}, {}) and '{}' [{}, {}) overlap on '{}'",
                            a.product_id,
                            a.start,
                            a.unclamped_end(),
                            b.product_id,
                            b.start,
                            b.unclamped_end(),
                            station.id
                        ),
                    ));
                }
            }
        }
    }

    if !schedule.entries.is_empty() && schedule.makespan != latest_completion {
        violations.push(Violation::new(
            ViolationType::MakespanMismatch,
            "makespan",
            format!(
                "Makespan {} differs from latest completion {}",
                schedule.makespan, latest_completion
            ),
        ));
    }

    violations
}
