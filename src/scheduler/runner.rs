//! Per-goal orchestration.
//!
//! Runs the allocation scheduler once per recovery goal, reshapes the
//! per-unit outcome into floor × sequence grids, and reduces the three
//! goals into building downtime.

use rayon::prelude::*;
use tracing::{debug, info};

use super::alloc::{AllocationOutcome, AllocationScheduler, SchedulerConfig};
use crate::error::{Result, ScheduleError};
use crate::inputs::{GoalInputs, ScheduleInputBuilder};
use crate::models::{FloorSequenceGrid, RecoveryGoalResult, UnitEnd, UnitStart};

/// Schedules every recovery goal independently.
///
/// Goals share no mutable state: each owns its units, worker pool and
/// allocation history, so they may run on separate threads
/// ([`ScheduleRunner::run_all_parallel`]) with identical results.
#[derive(Debug, Clone, Default)]
pub struct ScheduleRunner {
    scheduler: AllocationScheduler,
}

impl ScheduleRunner {
    /// Creates a runner with the given scheduler limits.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            scheduler: AllocationScheduler::new(config),
        }
    }

    /// Schedules one goal.
    ///
    /// A goal without nonstructural demand skips the simulation and yields a
    /// zero-span result carrying only the structural repair duration.
    pub fn run_goal(&self, inputs: &GoalInputs) -> Result<RecoveryGoalResult> {
        let goal = inputs.goal;
        let (floors, sequences) = inputs.demand.shape();

        if inputs.is_degenerate() {
            debug!(%goal, "no nonstructural demand; allocation skipped");
            return Ok(RecoveryGoalResult::degenerate(
                goal,
                floors,
                sequences,
                inputs.structural_repairs,
                inputs.ready.clone(),
            ));
        }

        let outcome = self
            .scheduler
            .schedule(inputs)
            .map_err(|source| ScheduleError::GoalFailed {
                goal,
                source: Box::new(source),
            })?;
        let iterations = outcome.iterations;
        let result = assemble(inputs, outcome);

        info!(
            %goal,
            total_span = result.total_span,
            units_started = result.started_count(),
            snapshots = result.allocation_history.len(),
            iterations,
            "goal scheduled"
        );
        Ok(result)
    }

    /// Schedules all goals in order. A failure in one goal leaves the others intact.
    pub fn run_all(&self, builder: &ScheduleInputBuilder<'_>) -> Vec<Result<RecoveryGoalResult>> {
        builder
            .build_all()
            .iter()
            .map(|inputs| self.run_goal(inputs))
            .collect()
    }

    /// Same as [`run_all`](Self::run_all), one goal per rayon task.
    pub fn run_all_parallel(
        &self,
        builder: &ScheduleInputBuilder<'_>,
    ) -> Vec<Result<RecoveryGoalResult>> {
        builder
            .build_all()
            .par_iter()
            .map(|inputs| self.run_goal(inputs))
            .collect()
    }
}

/// Reshapes a flat outcome into floor × sequence grids.
fn assemble(inputs: &GoalInputs, outcome: AllocationOutcome) -> RecoveryGoalResult {
    let (floors, sequences) = outcome.shape;
    let mut starts = FloorSequenceGrid::filled(floors, sequences, UnitStart::NotStarted);
    let mut ends = FloorSequenceGrid::filled(floors, sequences, UnitEnd::NotFinished);
    for unit in &outcome.units {
        starts.set(unit.floor, unit.sequence, unit.start);
        ends.set(unit.floor, unit.sequence, unit.end);
    }

    RecoveryGoalResult {
        goal: inputs.goal,
        total_span: outcome.total_span,
        span_by_sequence: ends.map(|e| e.or_zero()),
        starts,
        ends,
        allocation_history: outcome.history,
        structural_repairs: inputs.structural_repairs,
        ready: inputs.ready.clone(),
    }
}

/// Building downtime per goal, in days.
///
/// A goal whose nonstructural work finished is down until the last unit
/// ends. A goal with no nonstructural work is down for its structural
/// repairs plus the structural start delay, or not at all when there are no
/// structural repairs either. Every value is clipped to `replacement_time`.
pub fn downtime_by_goal(
    results: &[RecoveryGoalResult],
    structural_start_delay: f64,
    replacement_time: f64,
) -> Vec<f64> {
    results
        .iter()
        .map(|result| {
            let downtime = match result.finished_span() {
                Some(span) => span,
                None if result.structural_repairs == 0.0 => 0.0,
                None => result.structural_repairs + structural_start_delay,
            };
            downtime.min(replacement_time)
        })
        .collect()
}
