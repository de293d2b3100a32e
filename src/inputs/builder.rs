//! Builds per-goal scheduler inputs from a building workload.
//!
//! # Algorithm
//!
//! For each recovery goal:
//! 1. Take the goal's demand grid as is.
//! 2. Constrain the recommended-worker grid building-wide per sequence
//!    ([`adjust_capacity`]).
//! 3. Derive one ready time per sequence ([`sequence_ready_times`]) and
//!    broadcast it to every floor.
//! 4. Start the scheduler clock at structural completion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GoalInputs;
use crate::error::{Result, ScheduleError};
use crate::models::{FloorSequenceGrid, RecoveryGoal};
use crate::validation::validate_workload;

/// Numeric inputs for one simulation realization, produced by upstream
/// collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingWorkload {
    /// Worker-days per floor × nonstructural sequence, one grid per goal
    /// (indexed by [`RecoveryGoal::index`]).
    pub demand_by_goal: Vec<FloorSequenceGrid<f64>>,
    /// Recommended crew size per floor × sequence, before the building-wide cap.
    pub recommended_workers: FloorSequenceGrid<f64>,
    /// Building-wide worker cap per sequence.
    pub sequence_constraints: Vec<f64>,
    /// Contractor mobilization delay per sequence, long-lead time included.
    pub contractor_delays: Vec<f64>,
    /// Structural repair duration per goal (days).
    pub structural_repair_days: Vec<f64>,
    /// Delay before structural repairs can begin (days).
    pub structural_start_delay: f64,
    /// Workers available to the whole building.
    pub pool_size: f64,
}

impl BuildingWorkload {
    /// Number of floors.
    pub fn floors(&self) -> usize {
        self.recommended_workers.floors()
    }

    /// Number of nonstructural repair sequences.
    pub fn sequences(&self) -> usize {
        self.recommended_workers.sequences()
    }
}

/// Caps each sequence's total capacity at its building-wide constraint.
///
/// For every sequence, the floors with demand are counted and their
/// capacities summed. When that sum exceeds the constraint, every counted
/// floor with nonzero capacity gets `constraint / count` instead: a uniform
/// split, not a proportional one. Floors without demand are left untouched.
pub fn adjust_capacity(
    capacity: &FloorSequenceGrid<f64>,
    demand: &FloorSequenceGrid<f64>,
    constraints: &[f64],
) -> FloorSequenceGrid<f64> {
    let mut adjusted = capacity.clone();
    let (floors, sequences) = capacity.shape();

    for sequence in 0..sequences {
        let Some(&constraint) = constraints.get(sequence) else {
            continue;
        };
        let floors_with_demand: Vec<usize> = (0..floors)
            .filter(|&f| demand.get(f, sequence).is_some_and(|&d| d > 0.0))
            .collect();
        if floors_with_demand.is_empty() {
            continue;
        }

        let total: f64 = floors_with_demand
            .iter()
            .filter_map(|&f| capacity.get(f, sequence))
            .sum();
        if total <= constraint {
            continue;
        }

        let per_floor = constraint / floors_with_demand.len() as f64;
        for &floor in &floors_with_demand {
            if capacity.get(floor, sequence).is_some_and(|&c| c > 0.0) {
                adjusted.set(floor, sequence, per_floor);
            }
        }
        debug!(
            sequence,
            total,
            constraint,
            per_floor,
            floors = floors_with_demand.len(),
            "capacity constrained building-wide"
        );
    }

    adjusted
}

/// Ready time per sequence.
///
/// A sequence may start once structural repairs are complete, unless its
/// own contractor mobilization (long-lead time included) finishes later.
pub fn sequence_ready_times(structural_completion: f64, contractor_delays: &[f64]) -> Vec<f64> {
    contractor_delays
        .iter()
        .map(|&delay| {
            if delay > structural_completion {
                delay
            } else {
                structural_completion
            }
        })
        .collect()
}

/// Turns a [`BuildingWorkload`] into per-goal [`GoalInputs`].
#[derive(Debug, Clone)]
pub struct ScheduleInputBuilder<'a> {
    workload: &'a BuildingWorkload,
}

impl<'a> ScheduleInputBuilder<'a> {
    /// Validates the workload and wraps it.
    pub fn new(workload: &'a BuildingWorkload) -> Result<Self> {
        validate_workload(workload).map_err(ScheduleError::MalformedInput)?;
        Ok(Self { workload })
    }

    /// The wrapped workload.
    pub fn workload(&self) -> &BuildingWorkload {
        self.workload
    }

    /// Time structural repairs for `goal` are complete.
    pub fn structural_completion(&self, goal: RecoveryGoal) -> f64 {
        self.workload.structural_repair_days[goal.index()] + self.workload.structural_start_delay
    }

    /// Builds inputs for one goal.
    pub fn build(&self, goal: RecoveryGoal) -> GoalInputs {
        let workload = self.workload;
        let demand = workload.demand_by_goal[goal.index()].clone();
        let capacity = adjust_capacity(
            &workload.recommended_workers,
            &demand,
            &workload.sequence_constraints,
        );
        let structural_completion = self.structural_completion(goal);
        let ready = FloorSequenceGrid::broadcast(
            workload.floors(),
            &sequence_ready_times(structural_completion, &workload.contractor_delays),
        );

        GoalInputs {
            goal,
            demand,
            capacity,
            ready,
            pool_size: workload.pool_size,
            start_time: structural_completion,
            structural_repairs: workload.structural_repair_days[goal.index()],
        }
    }

    /// Builds inputs for every goal, in goal order.
    pub fn build_all(&self) -> Vec<GoalInputs> {
        RecoveryGoal::ALL.iter().map(|&g| self.build(g)).collect()
    }
}
