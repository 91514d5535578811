//! Station timeline projection.
//!
//! Groups schedule entries by station and orders each group by start
//! time, ready for a Gantt-style renderer: one lane per station, one bar
//! per operation. The projection borrows the schedule and does not check
//! for overlaps; a schedule extracted from a solved model already respects
//! station exclusion.

use serde::Serialize;

use crate::models::{ProblemInstance, Schedule, ScheduleEntry};

/// One bar of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bar<'a> {
    /// Product occupying the station.
    pub product_id: &'a str,
    /// Start time.
    pub start: i64,
    /// Rendered length (`end - start`, after clamping).
    pub length: i64,
}

/// Operations of one station, ordered by start time.
#[derive(Debug, Clone, Serialize)]
pub struct StationLane<'a> {
    /// Station ID.
    pub station_id: &'a str,
    entries: Vec<&'a ScheduleEntry>,
}

impl<'a> StationLane<'a> {
    /// Bars of this lane.
    ///
    /// Every call returns a fresh iterator over the same intervals.
    pub fn bars(&self) -> impl Iterator<Item = Bar<'a>> + '_ {
        self.entries.iter().map(|&e| Bar {
            product_id: e.product_id.as_str(),
            start: e.start,
            length: e.length(),
        })
    }

    /// Entries of this lane, in start order.
    pub fn entries(&self) -> &[&'a ScheduleEntry] {
        &self.entries
    }

    /// Whether no operation runs on this station.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total busy time of the lane.
    pub fn busy_time(&self) -> i64 {
        self.entries.iter().map(|e| e.length()).sum()
    }

    /// Idle time between time zero and `horizon` not covered by bars.
    pub fn idle_time(&self, horizon: i64) -> i64 {
        (horizon - self.busy_time()).max(0)
    }
}

/// Per-station view of a schedule.
///
/// # Example
/// ```
/// use u_jobshop::formulation::JobShopModelBuilder;
/// use u_jobshop::milp::{GoodLpSolver, SolverConfig};
/// use u_jobshop::models::ProblemInstance;
/// use u_jobshop::timeline::Timeline;
///
/// let instance = ProblemInstance::reference();
/// let (schedule, _) = JobShopModelBuilder::new(&instance)
///     .solve(&GoodLpSolver::new(), &SolverConfig::default())
///     .unwrap();
///
/// let timeline = Timeline::project(&instance, &schedule);
/// for lane in timeline.lanes() {
///     for bar in lane.bars() {
///         assert!(bar.start + bar.length <= timeline.horizon());
///     }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Timeline<'a> {
    lanes: Vec<StationLane<'a>>,
    horizon: i64,
}

impl<'a> Timeline<'a> {
    /// Projects a schedule onto the instance's stations.
    ///
    /// Lanes follow station declaration order; stations without operations
    /// get an empty lane. Within a lane, entries are ordered by start time,
    /// ties broken by product declaration order.
    pub fn project(instance: &'a ProblemInstance, schedule: &'a Schedule) -> Self {
        let rank = |product_id: &str| instance.product_index(product_id).unwrap_or(usize::MAX);

        let lanes = instance
            .stations
            .iter()
            .map(|station| {
                let mut entries = schedule.entries_for_station(&station.id);
                entries.sort_by_key(|e| (e.start, rank(&e.product_id)));
                StationLane {
                    station_id: station.id.as_str(),
                    entries,
                }
            })
            .collect();

        Self {
            lanes,
            horizon: schedule.makespan,
        }
    }

    /// All lanes.
    pub fn lanes(&self) -> &[StationLane<'a>] {
        &self.lanes
    }

    /// Lane of a station.
    pub fn lane(&self, station_id: &str) -> Option<&StationLane<'a>> {
        self.lanes.iter().find(|l| l.station_id == station_id)
    }

    /// Right edge of the chart (the makespan).
    pub fn horizon(&self) -> i64 {
        self.horizon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationKey;

    fn instance() -> ProblemInstance {
        ProblemInstance::new()
            .with_product("A")
            .with_product("B")
            .with_station("M1")
            .with_station("M2")
            .with_station("M3")
            .with_processing_time("A", "M1", 3)
            .with_processing_time("A", "M2", 2)
            .with_processing_time("B", "M1", 4)
            .with_routing("A", ["M1", "M2"])
            .with_routing("B", ["M1"])
    }

    fn schedule() -> Schedule {
        let mut s = Schedule::new(7);
        s.add_entry(ScheduleEntry::new(&OperationKey::new("A", "M1"), 0, 3, 4));
        s.add_entry(ScheduleEntry::new(&OperationKey::new("A", "M2"), 1, 2, 7 - 2));
        s.add_entry(ScheduleEntry::new(&OperationKey::new("B", "M1"), 0, 4, 0));
        s
    }

    #[test]
    fn test_lanes_follow_station_order() {
        let instance = instance();
        let schedule = schedule();
        let timeline = Timeline::project(&instance, &schedule);

        let ids: Vec<&str> = timeline.lanes().iter().map(|l| l.station_id).collect();
        assert_eq!(ids, vec!["M1", "M2", "M3"]);
        assert!(timeline.lane("M3").unwrap().is_empty());
        assert!(timeline.lane("M9").is_none());
        assert_eq!(timeline.horizon(), 7);
    }

    #[test]
    fn test_bars_sorted_by_start() {
        let instance = instance();
        let schedule = schedule();
        let timeline = Timeline::project(&instance, &schedule);

        let bars: Vec<Bar> = timeline.lane("M1").unwrap().bars().collect();
        assert_eq!(
            bars,
            vec![
                Bar { product_id: "B", start: 0, length: 4 },
                Bar { product_id: "A", start: 4, length: 3 },
            ]
        );
    }

    #[test]
    fn test_bars_restartable() {
        let instance = instance();
        let schedule = schedule();
        let timeline = Timeline::project(&instance, &schedule);
        let lane = timeline.lane("M1").unwrap();

        let first: Vec<Bar> = lane.bars().collect();
        let second: Vec<Bar> = lane.bars().collect();
        assert_eq!(first, second);
        assert_eq!(lane.bars().count(), 2);
    }

    #[test]
    fn test_ties_use_product_order() {
        let instance = instance();
        let mut schedule = Schedule::new(4);
        schedule.add_entry(ScheduleEntry::new(&OperationKey::new("B", "M1"), 0, 0, 2));
        schedule.add_entry(ScheduleEntry::new(&OperationKey::new("A", "M1"), 0, 0, 2));
        let timeline = Timeline::project(&instance, &schedule);

        let order: Vec<&str> = timeline.lane("M1").unwrap().bars().map(|b| b.product_id).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_clamped_length() {
        let instance = instance();
        let mut schedule = Schedule::new(6);
        let mut entry = ScheduleEntry::new(&OperationKey::new("B", "M1"), 0, 4, 4);
        entry.clamp_to(6);
        schedule.add_entry(entry);
        let timeline = Timeline::project(&instance, &schedule);

        let bar = timeline.lane("M1").unwrap().bars().next().unwrap();
        assert_eq!(bar.length, 2);
    }

    #[test]
    fn test_busy_and_idle() {
        let instance = instance();
        let schedule = schedule();
        let timeline = Timeline::project(&instance, &schedule);

        assert_eq!(timeline.lane("M1").unwrap().busy_time(), 7);
        assert_eq!(timeline.lane("M2").unwrap().idle_time(7), 5);
        assert_eq!(timeline.lane("M3").unwrap().idle_time(7), 7);
    }

    #[test]
    fn test_serialize_lane_ids() {
        let instance = instance();
        let schedule = schedule();
        let timeline = Timeline::project(&instance, &schedule);
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["horizon"], 7);
        assert_eq!(json["lanes"][1]["station_id"], "M2");
        assert_eq!(json["lanes"][0]["entries"][0]["product_id"], "B");
    }
}
