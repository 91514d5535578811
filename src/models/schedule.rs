//! Schedule (solution) model.
//!
//! A schedule is the per-operation (start, end) assignment read back from a
//! solved formulation, together with the solved makespan. Defects found
//! during extraction (clamped ends) are recorded on the schedule itself;
//! [`check_schedule`](crate::validation::check_schedule) performs the full
//! verification against the instance.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::OperationKey;

/// A complete schedule for a problem instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// One entry per routed operation, in product then routing order.
    pub entries: Vec<ScheduleEntry>,
    /// Solved makespan (the shared completion time).
    pub makespan: i64,
    /// Violations recorded while the schedule was built.
    pub violations: Vec<Violation>,
}

/// Start and end of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Product ID.
    pub product_id: String,
    /// Station ID.
    pub station_id: String,
    /// Position within the product's routing.
    pub position: usize,
    /// Processing duration from the instance.
    pub duration: i64,
    /// Solved start time.
    pub start: i64,
    /// End time, `min(start + duration, makespan)`.
    pub end: i64,
    /// Whether `end` was shortened to the makespan.
    pub clamped: bool,
}

/// A schedule defect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (operation key, product or station ID).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule defects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Operation starts before time zero.
    NegativeStart,
    /// Operation started before its routing predecessor finished.
    PrecedenceViolation,
    /// Two products occupy a station at the same time.
    StationOverlap,
    /// Operation ends after the makespan.
    MakespanExceeded,
    /// Makespan differs from the latest product completion.
    MakespanMismatch,
    /// Routed operation has no entry.
    MissingEntry,
}

impl ScheduleEntry {
    /// Creates an unclamped entry ending at `start + duration`.
    pub fn new(
        key: &OperationKey,
        position: usize,
        duration: i64,
        start: i64,
    ) -> Self {
        Self {
            product_id: key.product_id.clone(),
            station_id: key.station_id.clone(),
            position,
            duration,
            start,
            end: start.saturating_add(duration),
            clamped: false,
        }
    }

    /// Shortens `end` to `makespan` if it would exceed it.
    ///
    /// Returns `true` if the entry was clamped.
    pub fn clamp_to(&mut self, makespan: i64) -> bool {
        if self.end > makespan {
            self.end = makespan;
            self.clamped = true;
        }
        self.clamped
    }

    /// (product, station) key.
    pub fn key(&self) -> OperationKey {
        OperationKey::new(&self.product_id, &self.station_id)
    }

    /// End time before clamping.
    #[inline]
    pub fn unclamped_end(&self) -> i64 {
        self.start.saturating_add(self.duration)
    }

    /// Rendered length (`end - start`).
    #[inline]
    pub fn length(&self) -> i64 {
        self.end - self.start
    }

    /// Whether the half-open intervals `[start, end)` of two entries intersect.
    pub fn overlaps(&self, other: &ScheduleEntry) -> bool {
        self.start < other.unclamped_end() && other.start < self.unclamped_end()
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule with the given makespan.
    pub fn new(makespan: i64) -> Self {
        Self {
            makespan,
            ..Self::default()
        }
    }

    /// Adds an entry.
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether the schedule has no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Finds the entry of an operation.
    pub fn entry(&self, product_id: &str, station_id: &str) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.product_id == product_id && e.station_id == station_id)
    }

    /// Entries processed on a station, in insertion order.
    pub fn entries_for_station(&self, station_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.station_id == station_id)
            .collect()
    }

    /// Entries whose end was clamped to the makespan.
    pub fn clamped_entries(&self) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.clamped).collect()
    }

    /// Completion time of a product (end of its last operation).
    pub fn product_completion_time(&self, product_id: &str) -> Option<i64> {
        self.entries
            .iter()
            .filter(|e| e.product_id == product_id)
            .map(|e| e.end)
            .max()
    }

    /// Busy time of a station divided by `horizon`.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn station_utilization(&self, station_id: &str, horizon: i64) -> Option<f64> {
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self
            .entries_for_station(station_id)
            .iter()
            .map(|e| e.length())
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Utilization of every station that has entries, over the makespan.
    pub fn all_utilizations(&self) -> HashMap<String, f64> {
        if self.makespan <= 0 {
            return HashMap::new();
        }

        let mut utilizations = HashMap::new();
        for e in &self.entries {
            if utilizations.contains_key(&e.station_id) {
                continue;
            }
            if let Some(u) = self.station_utilization(&e.station_id, self.makespan) {
                utilizations.insert(e.station_id.clone(), u);
            }
        }
        utilizations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(product: &str, station: &str, position: usize, duration: i64, start: i64) -> ScheduleEntry {
        ScheduleEntry::new(&OperationKey::new(product, station), position, duration, start)
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new(45);
        s.add_entry(entry("1", "Corte", 0, 30, 0));
        s.add_entry(entry("1", "Pulido", 1, 15, 30));
        s.add_entry(entry("2", "Corte", 0, 10, 30));
        s
    }

    #[test]
    fn test_entry_new() {
        let e = entry("1", "Corte", 0, 30, 5);
        assert_eq!(e.end, 35);
        assert_eq!(e.length(), 30);
        assert!(!e.clamped);
        assert_eq!(e.key(), OperationKey::new("1", "Corte"));
    }

    #[test]
    fn test_entry_clamp() {
        let mut e = entry("1", "Corte", 0, 30, 20);
        assert!(!e.clamp_to(60));
        assert_eq!(e.end, 50);

        assert!(e.clamp_to(40));
        assert_eq!(e.end, 40);
        assert_eq!(e.unclamped_end(), 50);
        assert_eq!(e.length(), 20);
    }

    #[test]
    fn test_entry_overlap() {
        let a = entry("1", "Corte", 0, 30, 0);
        let b = entry("2", "Corte", 0, 10, 30);
        let c = entry("3", "Corte", 0, 10, 29);
        assert!(!a.overlaps(&b)); // touching is fine
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_schedule_queries() {
        let s = sample_schedule();
        assert_eq!(s.entries.len(), 3);
        assert_eq!(s.entry("1", "Pulido").unwrap().start, 30);
        assert!(s.entry("3", "Pulido").is_none());
        assert_eq!(s.entries_for_station("Corte").len(), 2);
        assert_eq!(s.product_completion_time("1"), Some(45));
        assert_eq!(s.product_completion_time("9"), None);
    }

    #[test]
    fn test_utilization() {
        let s = sample_schedule();
        // Corte: 30 + 10 = 40 over 45
        let util = s.station_utilization("Corte", 45).unwrap();
        assert!((util - 40.0 / 45.0).abs() < 1e-10);
        assert!(s.station_utilization("Corte", 0).is_none());

        let all = s.all_utilizations();
        assert!((all["Pulido"] - 15.0 / 45.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::default();
        assert!(s.is_valid());
        assert!(s.all_utilizations().is_empty());
        assert!(s.clamped_entries().is_empty());
    }

    #[test]
    fn test_violations() {
        let mut s = sample_schedule();
        s.add_violation(Violation::new(
            ViolationType::StationOverlap,
            "Corte",
            "1 and 2 overlap",
        ));
        assert!(!s.is_valid());
        assert_eq!(s.violations[0].violation_type, ViolationType::StationOverlap);
    }
}
