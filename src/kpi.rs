//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Shared completion time |
//! | Avg Utilization | Mean station busyness over the makespan |
//! | Avg Flow Time | Mean product completion time (all products released at 0) |
//! | Total Idle Time | Sum over busy stations of makespan minus busy time |
//! | Clamped Entries | Entries whose end was cut to the makespan |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan.
    pub makespan: i64,
    /// Per-station utilization (0.0..1.0).
    pub utilization_by_station: HashMap<String, f64>,
    /// Average station utilization.
    pub avg_utilization: f64,
    /// Average product completion time.
    pub avg_flow_time: f64,
    /// Idle time summed over stations that process at least one operation.
    pub total_idle_time: i64,
    /// Number of clamped entries.
    pub clamped_entries: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let makespan = schedule.makespan;

        let utilization_by_station = schedule.all_utilizations();
        let avg_utilization = if utilization_by_station.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_station.values().sum();
            sum / utilization_by_station.len() as f64
        };

        let mut products: Vec<&str> = schedule
            .entries
            .iter()
            .map(|e| e.product_id.as_str())
            .collect();
        products.sort_unstable();
        products.dedup();
        let completions: Vec<i64> = products
            .iter()
            .filter_map(|p| schedule.product_completion_time(p))
            .collect();

        let avg_flow_time = if completions.is_empty() {
            0.0
        } else {
            completions.iter().map(|&c| c as f64).sum::<f64>() / completions.len() as f64
        };

        let mut busy: HashMap<&str, i64> = HashMap::new();
        for e in &schedule.entries {
            *busy.entry(e.station_id.as_str()).or_insert(0) += e.length();
        }

        let total_idle_time = busy.values().map(|b| (makespan - b).max(0)).sum();

        Self {
            makespan,
            utilization_by_station,
            avg_utilization,
            avg_flow_time,
            total_idle_time,
            clamped_entries: schedule.clamped_entries().len(),
        }
    }

    /// Relative distance of the makespan above a lower bound.
    ///
    /// Returns `None` if `lower_bound` is not positive.
    pub fn gap_to(&self, lower_bound: i64) -> Option<f64> {
        if lower_bound <= 0 {
            return None;
        }
        Some((self.makespan - lower_bound) as f64 / lower_bound as f64)
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: i64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperationKey, ScheduleEntry};

    fn entry(product: &str, station: &str, duration: i64, start: i64) -> ScheduleEntry {
        ScheduleEntry::new(&OperationKey::new(product, station), 0, duration, start)
    }

    #[test]
    fn test_kpi_basic() {
        let mut schedule = Schedule::new(30);
        schedule.add_entry(entry("A", "M1", 10, 0));
        schedule.add_entry(entry("B", "M1", 20, 10));
        schedule.add_entry(entry("B", "M2", 15, 0));

        let kpi = ScheduleKpi::calculate(&schedule);
        assert_eq!(kpi.makespan, 30);
        // M1: 30/30, M2: 15/30
        assert!((kpi.utilization_by_station["M1"] - 1.0).abs() < 1e-10);
        assert!((kpi.utilization_by_station["M2"] - 0.5).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.75).abs() < 1e-10);
        // A done at 10, B at 30
        assert!((kpi.avg_flow_time - 20.0).abs() < 1e-10);
        assert_eq!(kpi.total_idle_time, 15);
        assert_eq!(kpi.clamped_entries, 0);
    }

    #[test]
    fn test_kpi_clamped() {
        let mut schedule = Schedule::new(12);
        let mut e = entry("A", "M1", 10, 5);
        e.clamp_to(12);
        schedule.add_entry(e);

        let kpi = ScheduleKpi::calculate(&schedule);
        assert_eq!(kpi.clamped_entries, 1);
        assert_eq!(kpi.total_idle_time, 5);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&Schedule::default());
        assert_eq!(kpi.makespan, 0);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
        assert!((kpi.avg_flow_time - 0.0).abs() < 1e-10);
        assert_eq!(kpi.total_idle_time, 0);
    }

    #[test]
    fn test_gap_and_thresholds() {
        let mut schedule = Schedule::new(85);
        schedule.add_entry(entry("A", "M1", 85, 0));
        let kpi = ScheduleKpi::calculate(&schedule);

        assert!((kpi.gap_to(68).unwrap() - 0.25).abs() < 1e-10);
        assert!(kpi.gap_to(0).is_none());
        assert!(kpi.meets_thresholds(85, 1.0));
        assert!(!kpi.meets_thresholds(84, 0.0));
    }
}
