//! Recovery-goal schedule (solution) model.
//!
//! A goal's schedule records, for every floor × sequence unit, when work
//! started and ended, plus the complete time-stamped history of worker
//! assignments the allocation scheduler produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FloorSequenceGrid, UnitEnd, UnitStart};

/// One of the three recovery milestones, each scheduled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecoveryGoal {
    /// Every damaged component repaired.
    FullRecovery,
    /// Repairs needed to restore building function.
    FunctionalRecovery,
    /// Repairs needed for the building to be safely occupied.
    ImmediateOccupancy,
}

impl RecoveryGoal {
    /// All goals in index order.
    pub const ALL: [RecoveryGoal; 3] = [
        RecoveryGoal::FullRecovery,
        RecoveryGoal::FunctionalRecovery,
        RecoveryGoal::ImmediateOccupancy,
    ];

    /// Number of recovery goals.
    pub const COUNT: usize = 3;

    /// Position in per-goal vectors.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::FullRecovery => 0,
            Self::FunctionalRecovery => 1,
            Self::ImmediateOccupancy => 2,
        }
    }
}

impl fmt::Display for RecoveryGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FullRecovery => "full recovery",
            Self::FunctionalRecovery => "functional recovery",
            Self::ImmediateOccupancy => "immediate occupancy",
        };
        f.write_str(name)
    }
}

/// Worker assignment across all units at one instant.
///
/// Snapshots are appended in event order and never mutated afterwards.
/// Between two consecutive snapshots the assignment of the earlier one holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    /// Simulated day.
    pub time: f64,
    /// Workers on each floor × sequence unit.
    pub workers: FloorSequenceGrid<f64>,
    /// Workers in the pool, unassigned.
    pub free_workers: f64,
}

impl AllocationSnapshot {
    /// Total workers on site at this instant.
    pub fn assigned_total(&self) -> f64 {
        self.workers.total()
    }
}

/// Outcome of scheduling one recovery goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryGoalResult {
    /// Which milestone this schedule reaches.
    pub goal: RecoveryGoal,
    /// Latest end time over every unit that started (days).
    pub total_span: f64,
    /// End time per unit with "not finished" coerced to zero.
    pub span_by_sequence: FloorSequenceGrid<f64>,
    /// First allocation time per unit.
    pub starts: FloorSequenceGrid<UnitStart>,
    /// Completion time per unit.
    pub ends: FloorSequenceGrid<UnitEnd>,
    /// Every assignment change, in event order.
    pub allocation_history: Vec<AllocationSnapshot>,
    /// Structural repair duration for this goal, echoed from the inputs.
    pub structural_repairs: f64,
    /// Ready time each unit was scheduled against.
    pub ready: FloorSequenceGrid<f64>,
}

impl RecoveryGoalResult {
    /// Result for a goal with no nonstructural work.
    pub fn degenerate(
        goal: RecoveryGoal,
        floors: usize,
        sequences: usize,
        structural_repairs: f64,
        ready: FloorSequenceGrid<f64>,
    ) -> Self {
        Self {
            goal,
            total_span: 0.0,
            span_by_sequence: FloorSequenceGrid::filled(floors, sequences, 0.0),
            starts: FloorSequenceGrid::filled(floors, sequences, UnitStart::NotStarted),
            ends: FloorSequenceGrid::filled(floors, sequences, UnitEnd::NotFinished),
            allocation_history: Vec::new(),
            structural_repairs,
            ready,
        }
    }

    /// Latest completion time over all units, or `None` if no unit finished.
    pub fn finished_span(&self) -> Option<f64> {
        self.ends
            .values()
            .iter()
            .filter_map(|e| e.time())
            .reduce(f64::max)
    }

    /// Whether any nonstructural unit was scheduled.
    pub fn has_nonstructural_work(&self) -> bool {
        !self.allocation_history.is_empty()
    }

    /// Latest completion time of one sequence across all floors.
    pub fn sequence_span(&self, sequence: usize) -> f64 {
        self.span_by_sequence
            .column(sequence)
            .copied()
            .fold(0.0, f64::max)
    }

    /// Number of units that received workers.
    pub fn started_count(&self) -> usize {
        self.starts.values().iter().filter(|s| s.is_started()).count()
    }
}
