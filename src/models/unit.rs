//! Repair unit model.
//!
//! A repair unit is one (floor, repair sequence) pair: the atomic task the
//! allocation scheduler hands workers to. Units are built fresh for each
//! recovery goal and discarded once their start/end times are extracted.

use serde::{Deserialize, Serialize};

/// When a unit first received workers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum UnitStart {
    /// Never allocated during the run.
    #[default]
    NotStarted,
    /// First allocation happened at this simulated day.
    StartedAt(f64),
}

/// When a unit's demand reached zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum UnitEnd {
    /// Never finished during the run.
    #[default]
    NotFinished,
    /// Demand was exhausted at this simulated day.
    FinishedAt(f64),
}

impl UnitStart {
    /// Start time, if any.
    pub fn time(self) -> Option<f64> {
        match self {
            Self::NotStarted => None,
            Self::StartedAt(t) => Some(t),
        }
    }

    /// Whether the unit ever received workers.
    pub fn is_started(self) -> bool {
        matches!(self, Self::StartedAt(_))
    }
}

impl UnitEnd {
    /// End time, if any.
    pub fn time(self) -> Option<f64> {
        match self {
            Self::NotFinished => None,
            Self::FinishedAt(t) => Some(t),
        }
    }

    /// End time with "not finished" coerced to zero.
    pub fn or_zero(self) -> f64 {
        self.time().unwrap_or(0.0)
    }

    /// Whether the unit's demand was exhausted.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::FinishedAt(_))
    }
}

/// One floor × repair-sequence task inside a single goal's simulation.
///
/// # Units
/// `demand` is in worker-days; `capacity` and `workers_assigned` are worker
/// counts (fractional); times are simulated days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairUnit {
    /// Floor index (0 = ground).
    pub floor: usize,
    /// Nonstructural repair sequence index.
    pub sequence: usize,
    /// Remaining workload (worker-days). Never negative.
    pub demand: f64,
    /// Capacity handed to the scheduler at setup; restored on readiness events.
    pub initial_capacity: f64,
    /// Remaining number of workers this unit may still absorb.
    pub capacity: f64,
    /// No worker may be assigned before this time.
    pub ready_time: f64,
    /// Workers currently on this unit.
    pub workers_assigned: f64,
    /// Time of first allocation.
    pub start: UnitStart,
    /// Time demand was exhausted.
    pub end: UnitEnd,
    /// Time remaining until the current crew exhausts the demand.
    /// `None` while idle.
    pub time_to_finish: Option<f64>,
}

impl RepairUnit {
    /// Creates an idle, unstarted unit.
    pub fn new(floor: usize, sequence: usize, demand: f64, capacity: f64, ready_time: f64) -> Self {
        Self {
            floor,
            sequence,
            demand,
            initial_capacity: capacity,
            capacity,
            ready_time,
            workers_assigned: 0.0,
            start: UnitStart::NotStarted,
            end: UnitEnd::NotFinished,
            time_to_finish: None,
        }
    }

    /// Whether work may legally happen on this unit at `now`.
    #[inline]
    pub fn is_ready(&self, now: f64) -> bool {
        self.ready_time <= now
    }

    /// Absolute projected finish time given the current crew.
    pub fn projected_finish(&self, now: f64) -> Option<f64> {
        self.time_to_finish.map(|t| now + t)
    }

    /// Adds workers and refreshes the time to finish.
    pub(crate) fn assign(&mut self, workers: f64, now: f64) {
        self.workers_assigned += workers;
        self.capacity -= workers;
        if !self.start.is_started() {
            self.start = UnitStart::StartedAt(now);
        }
        self.time_to_finish = if self.workers_assigned > 0.0 {
            Some(self.demand / self.workers_assigned)
        } else {
            None
        };
    }

    /// Burns down demand for `elapsed` days of work at the current crew size.
    pub(crate) fn advance(&mut self, elapsed: f64) {
        self.demand = (self.demand - elapsed * self.workers_assigned).max(0.0);
        if let Some(t) = self.time_to_finish.as_mut() {
            *t -= elapsed;
        }
    }

    /// Marks the unit finished and returns the workers it releases.
    pub(crate) fn finish(&mut self, now: f64) -> f64 {
        let released = self.workers_assigned;
        self.end = UnitEnd::FinishedAt(now);
        self.demand = 0.0;
        self.workers_assigned = 0.0;
        self.time_to_finish = None;
        released
    }

    /// Drops the whole crew and restores the setup capacity.
    pub(crate) fn reclaim(&mut self) -> f64 {
        let released = self.workers_assigned;
        self.workers_assigned = 0.0;
        self.capacity = self.initial_capacity;
        self.time_to_finish = None;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_sets_start_once() {
        let mut u = RepairUnit::new(0, 1, 10.0, 5.0, 0.0);
        u.assign(2.0, 1.0);
        u.assign(1.0, 3.0);
        assert_eq!(u.start, UnitStart::StartedAt(1.0));
        assert!((u.workers_assigned - 3.0).abs() < 1e-12);
        assert!((u.capacity - 2.0).abs() < 1e-12);
        assert!((u.time_to_finish.unwrap() - 10.0 / 3.0).abs() < 1e-12);
        assert!((u.projected_finish(3.0).unwrap() - (3.0 + 10.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_advance_and_finish() {
        let mut u = RepairUnit::new(2, 0, 10.0, 5.0, 0.0);
        u.assign(5.0, 0.0);
        u.advance(1.0);
        assert!((u.demand - 5.0).abs() < 1e-12);
        assert!((u.time_to_finish.unwrap() - 1.0).abs() < 1e-12);
        u.advance(1.0);
        let released = u.finish(2.0);
        assert!((released - 5.0).abs() < 1e-12);
        assert_eq!(u.end, UnitEnd::FinishedAt(2.0));
        assert_eq!(u.time_to_finish, None);
        assert_eq!(u.demand, 0.0);
    }

    #[test]
    fn test_reclaim_restores_capacity() {
        let mut u = RepairUnit::new(0, 0, 100.0, 8.0, 0.0);
        u.assign(6.0, 0.0);
        assert!((u.reclaim() - 6.0).abs() < 1e-12);
        assert_eq!(u.workers_assigned, 0.0);
        assert_eq!(u.capacity, 8.0);
        assert!(u.start.is_started());
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(UnitStart::default().time(), None);
        assert_eq!(UnitEnd::NotFinished.or_zero(), 0.0);
        assert_eq!(UnitEnd::FinishedAt(4.5).or_zero(), 4.5);
        assert!(!UnitEnd::NotFinished.is_finished());
    }

    #[test]
    fn test_readiness() {
        let u = RepairUnit::new(0, 0, 1.0, 1.0, 5.0);
        assert!(!u.is_ready(4.999));
        assert!(u.is_ready(5.0));
    }
}
