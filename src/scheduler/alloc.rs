//! Fair-share worker allocation scheduler.
//!
//! # Algorithm
//!
//! Continuous-time discrete-event simulation over repair units. Each round:
//!
//! 1. **Allocate**: while free workers and remaining capacity exceed
//!    [`WORKER_EPSILON`], split the free workers across the ready units that
//!    still have demand and capacity, proportionally to remaining demand and
//!    capped by each unit's remaining capacity. Capped units drop out and the
//!    leftover is split again at the same instant.
//! 2. **Next event**: the earliest projected finish, or the earliest ready
//!    time of a unit not yet ready.
//! 3. **Advance**: on a finish, finished units release their crews. On a
//!    readiness event (strictly earlier than any finish), every crew is
//!    reclaimed and every capacity restored to its setup value, so the newly
//!    ready units compete on equal footing in the next round.
//!
//! The loop ends once every unit's demand is within [`DEMAND_EPSILON`]. A
//! round ceiling, a "no next event" check and a check for allocation passes
//! that place nobody turn malformed inputs into [`ScheduleError::Stalled`]
//! instead of a hang.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{Result, ScheduleError};
use crate::inputs::GoalInputs;
use crate::models::{AllocationSnapshot, FloorSequenceGrid, RepairUnit};
use crate::validation::validate_goal_inputs;

/// Demand, capacity and finish-time tolerance.
pub const DEMAND_EPSILON: f64 = 1e-7;

/// Free-worker and total-capacity tolerance.
pub const WORKER_EPSILON: f64 = 1e-2;

/// Scheduler limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum event-loop rounds before the run is declared stalled.
    pub max_iterations: usize,
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the round ceiling.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1_000_000,
        }
    }
}

/// Final state of one goal's simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    /// Units in simulation order (sequence-major), with start/end filled in.
    pub units: Vec<RepairUnit>,
    /// Every assignment change, in event order.
    pub history: Vec<AllocationSnapshot>,
    /// Latest end over all units that started.
    pub total_span: f64,
    /// Event-loop rounds executed.
    pub iterations: usize,
    /// `(floors, sequences)` of the input grids.
    pub shape: (usize, usize),
}

/// Distributes one worker pool across concurrent repair units.
///
/// # Example
///
/// ```
/// use redi_schedule::inputs::GoalInputs;
/// use redi_schedule::models::{FloorSequenceGrid, RecoveryGoal};
/// use redi_schedule::scheduler::AllocationScheduler;
///
/// let inputs = GoalInputs::new(
///     RecoveryGoal::FullRecovery,
///     FloorSequenceGrid::filled(1, 1, 10.0), // worker-days
///     FloorSequenceGrid::filled(1, 1, 5.0),  // max crew
///     FloorSequenceGrid::filled(1, 1, 0.0),  // ready at t=0
///     5.0,                                   // pool
/// );
/// let outcome = AllocationScheduler::default().schedule(&inputs).unwrap();
/// assert!((outcome.total_span - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AllocationScheduler {
    config: SchedulerConfig,
}

/// What moves the clock next.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NextEvent {
    /// At least one unit finishes after this many days.
    Finish(f64),
    /// A waiting unit becomes ready at this absolute time.
    Ready(f64),
    /// Nothing will ever happen again.
    None,
}

impl AllocationScheduler {
    /// Creates a scheduler with the given limits.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Scheduler limits.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Validates `inputs` and simulates the goal to completion.
    pub fn schedule(&self, inputs: &GoalInputs) -> Result<AllocationOutcome> {
        validate_goal_inputs(inputs).map_err(ScheduleError::MalformedInput)?;
        self.simulate(
            inputs.units()?,
            inputs.pool_size,
            inputs.start_time,
            inputs.demand.shape(),
        )
    }

    fn simulate(
        &self,
        units: Vec<RepairUnit>,
        pool_size: f64,
        start_time: f64,
        shape: (usize, usize),
    ) -> Result<AllocationOutcome> {
        let mut state = SimulationState {
            units,
            free_workers: pool_size,
            now: start_time,
            history: Vec::new(),
            shape,
        };
        let mut iterations = 0;

        while !state.is_complete() {
            if iterations >= self.config.max_iterations {
                warn!(
                    iterations,
                    now = state.now,
                    remaining = state.remaining_demand(),
                    "round ceiling reached"
                );
                return Err(state.stalled(iterations));
            }
            iterations += 1;

            state.allocate(iterations)?;
            match state.next_event() {
                NextEvent::Finish(elapsed) => state.finish_units(elapsed),
                NextEvent::Ready(at) => state.release_for_ready(at),
                NextEvent::None => {
                    warn!(
                        iterations,
                        now = state.now,
                        remaining = state.remaining_demand(),
                        "no unit can progress"
                    );
                    return Err(state.stalled(iterations));
                }
            }
        }

        Ok(state.into_outcome(iterations))
    }
}

/// Mutable state of one simulation; owned by a single run.
struct SimulationState {
    units: Vec<RepairUnit>,
    free_workers: f64,
    now: f64,
    history: Vec<AllocationSnapshot>,
    shape: (usize, usize),
}

impl SimulationState {
    fn is_complete(&self) -> bool {
        self.units.iter().all(|u| u.demand <= DEMAND_EPSILON)
    }

    fn remaining_demand(&self) -> f64 {
        self.units.iter().map(|u| u.demand).sum()
    }

    fn total_capacity(&self) -> f64 {
        self.units.iter().map(|u| u.capacity).sum()
    }

    fn stalled(&self, iterations: usize) -> ScheduleError {
        ScheduleError::Stalled {
            iterations,
            now: self.now,
            remaining_demand: self.remaining_demand(),
        }
    }

    fn available_units(&self) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| {
                u.is_ready(self.now) && u.demand > DEMAND_EPSILON && u.capacity > DEMAND_EPSILON
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Fair-share passes at the current instant.
    ///
    /// Every pass either places workers or ends the loop; a pass that places
    /// none is reported as a stall.
    fn allocate(&mut self, iterations: usize) -> Result<()> {
        if !self.units.iter().any(|u| u.is_ready(self.now)) {
            return Ok(());
        }

        while self.free_workers > WORKER_EPSILON && self.total_capacity() > WORKER_EPSILON {
            let available = self.available_units();
            if available.is_empty() {
                break;
            }
            let assigned = self.assign_workers(&available);
            if assigned.is_nan() || assigned <= 0.0 {
                warn!(
                    iterations,
                    now = self.now,
                    free_workers = self.free_workers,
                    units = available.len(),
                    "allocation pass placed no workers"
                );
                return Err(self.stalled(iterations));
            }
            self.record();
        }
        Ok(())
    }

    /// One proportional pass over `available`; returns the workers placed.
    fn assign_workers(&mut self, available: &[usize]) -> f64 {
        let total_demand: f64 = available.iter().map(|&i| self.units[i].demand).sum();
        let free = self.free_workers;
        let now = self.now;

        let mut assigned = 0.0;
        for &i in available {
            let unit = &mut self.units[i];
            let share = free / total_demand * unit.demand;
            let workers = share.min(unit.capacity);
            unit.assign(workers, now);
            assigned += workers;
        }
        self.free_workers = free - assigned;

        debug!(
            now,
            units = available.len(),
            assigned,
            free_workers = self.free_workers,
            "allocation pass"
        );
        assigned
    }

    fn next_event(&self) -> NextEvent {
        let next_finish = self
            .units
            .iter()
            .filter_map(|u| u.time_to_finish)
            .reduce(f64::min);
        let next_ready = self
            .units
            .iter()
            .filter(|u| !u.is_ready(self.now))
            .map(|u| u.ready_time)
            .reduce(f64::min);

        match (next_finish, next_ready) {
            (Some(finish), Some(ready)) if finish <= ready - self.now => NextEvent::Finish(finish),
            (Some(finish), None) => NextEvent::Finish(finish),
            (_, Some(ready)) => NextEvent::Ready(ready),
            (None, None) => NextEvent::None,
        }
    }

    /// Advances to the earliest finish and releases finished crews.
    fn finish_units(&mut self, elapsed: f64) {
        self.now += elapsed;
        for unit in &mut self.units {
            unit.advance(elapsed);
        }

        let now = self.now;
        let mut finished = 0;
        for unit in &mut self.units {
            if unit.time_to_finish.is_some_and(|t| t.abs() < DEMAND_EPSILON) {
                self.free_workers += unit.finish(now);
                finished += 1;
            }
        }

        debug!(now, finished, free_workers = self.free_workers, "finish event");
        self.record();
    }

    /// Advances to `at`, reclaims every crew and restores setup capacities.
    fn release_for_ready(&mut self, at: f64) {
        let elapsed = at - self.now;
        self.now = at;

        let now = self.now;
        for unit in &mut self.units {
            let was_working = unit.workers_assigned > 0.0;
            unit.advance(elapsed);
            self.free_workers += unit.reclaim();
            // Work that ran out within tolerance during the wait closes here.
            if was_working && unit.demand <= DEMAND_EPSILON {
                unit.finish(now);
            }
        }

        debug!(now, elapsed, free_workers = self.free_workers, "readiness event");
        self.record();
    }

    fn record(&mut self) {
        let (floors, sequences) = self.shape;
        let mut workers = FloorSequenceGrid::filled(floors, sequences, 0.0);
        for unit in &self.units {
            workers.set(unit.floor, unit.sequence, unit.workers_assigned);
        }
        trace!(now = self.now, snapshots = self.history.len() + 1, "snapshot");
        self.history.push(AllocationSnapshot {
            time: self.now,
            workers,
            free_workers: self.free_workers,
        });
    }

    fn into_outcome(self, iterations: usize) -> AllocationOutcome {
        let total_span = self
            .units
            .iter()
            .filter(|u| u.start.is_started())
            .map(|u| u.end.or_zero())
            .fold(0.0, f64::max);

        AllocationOutcome {
            units: self.units,
            history: self.history,
            total_span,
            iterations,
            shape: self.shape,
        }
    }
}
