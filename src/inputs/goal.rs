//! One recovery goal's scheduler inputs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{FloorSequenceGrid, RecoveryGoal, RepairUnit};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Everything the allocation scheduler needs to simulate one goal.
///
/// # Time Representation
/// All times are simulated days since the earthquake. `start_time` is where
/// the scheduler's clock begins; ready times earlier than it are already
/// satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInputs {
    /// Milestone being scheduled.
    pub goal: RecoveryGoal,
    /// Remaining worker-days per floor × sequence.
    pub demand: FloorSequenceGrid<f64>,
    /// Maximum simultaneous workers per floor × sequence, already
    /// constrained building-wide.
    pub capacity: FloorSequenceGrid<f64>,
    /// Earliest time each unit may receive workers.
    pub ready: FloorSequenceGrid<f64>,
    /// Workers available across all sequences at once.
    pub pool_size: f64,
    /// Scheduler clock at the start of the simulation.
    pub start_time: f64,
    /// Structural repair duration for this goal (echoed into the result).
    pub structural_repairs: f64,
}

impl GoalInputs {
    /// Creates inputs starting at t = 0 with no structural repairs.
    pub fn new(
        goal: RecoveryGoal,
        demand: FloorSequenceGrid<f64>,
        capacity: FloorSequenceGrid<f64>,
        ready: FloorSequenceGrid<f64>,
        pool_size: f64,
    ) -> Self {
        Self {
            goal,
            demand,
            capacity,
            ready,
            pool_size,
            start_time: 0.0,
            structural_repairs: 0.0,
        }
    }

    /// Sets the scheduler start time.
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the echoed structural repair duration.
    pub fn with_structural_repairs(mut self, days: f64) -> Self {
        self.structural_repairs = days;
        self
    }

    /// Whether the goal has no nonstructural work at all.
    pub fn is_degenerate(&self) -> bool {
        self.demand.values().iter().all(|&d| d == 0.0)
    }

    /// Number of floor × sequence units.
    pub fn unit_count(&self) -> usize {
        self.demand.values().len()
    }

    /// Fresh repair units, sequence-major (all floors of sequence 0 first).
    ///
    /// Fails when the capacity or ready grid does not match the demand grid.
    pub fn units(&self) -> Result<Vec<RepairUnit>> {
        let shape = self.demand.shape();
        for (label, grid) in [("capacity", &self.capacity), ("ready", &self.ready)] {
            if grid.shape() != shape {
                return Err(ScheduleError::MalformedInput(vec![ValidationError::new(
                    ValidationErrorKind::ShapeMismatch,
                    format!("{label} grid is {:?} but demand grid is {shape:?}", grid.shape()),
                )]));
            }
        }

        let (floors, sequences) = shape;
        let mut units = Vec::with_capacity(floors * sequences);
        for sequence in 0..sequences {
            let cells = self
                .demand
                .column(sequence)
                .zip(self.capacity.column(sequence))
                .zip(self.ready.column(sequence));
            for (floor, ((&demand, &capacity), &ready)) in cells.enumerate() {
                units.push(RepairUnit::new(floor, sequence, demand, capacity, ready));
            }
        }
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_sequence_major() {
        let inputs = GoalInputs::new(
            RecoveryGoal::FullRecovery,
            FloorSequenceGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap(),
            FloorSequenceGrid::filled(3, 2, 1.0),
            FloorSequenceGrid::broadcast(3, &[0.0, 7.0]),
            4.0,
        );
        let units = inputs.units().unwrap();
        assert_eq!(units.len(), 6);
        let order: Vec<_> = units.iter().map(|u| (u.floor, u.sequence)).collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(units[4].demand, 4.0);
        assert_eq!(units[4].ready_time, 7.0);
    }

    #[test]
    fn test_units_reject_mismatched_grids() {
        let inputs = GoalInputs::new(
            RecoveryGoal::FullRecovery,
            FloorSequenceGrid::filled(2, 1, 10.0),
            FloorSequenceGrid::filled(1, 1, 5.0),
            FloorSequenceGrid::filled(2, 1, 0.0),
            5.0,
        );
        assert!(matches!(inputs.units(), Err(ScheduleError::MalformedInput(_))));
    }

    #[test]
    fn test_short_demand_grid_rejected_on_load() {
        let json = r#"{
            "goal": "FullRecovery",
            "demand": {"floors": 2, "sequences": 1, "values": [10.0]},
            "capacity": {"floors": 2, "sequences": 1, "values": [5.0, 5.0]},
            "ready": {"floors": 2, "sequences": 1, "values": [0.0, 0.0]},
            "pool_size": 5.0,
            "start_time": 0.0,
            "structural_repairs": 0.0
        }"#;
        let err = serde_json::from_str::<GoalInputs>(json).unwrap_err();
        assert!(err.to_string().contains("needs 2 values, got 1"), "{err}");
    }

    #[test]
    fn test_degenerate_detection() {
        let zero = GoalInputs::new(
            RecoveryGoal::FunctionalRecovery,
            FloorSequenceGrid::filled(2, 2, 0.0),
            FloorSequenceGrid::filled(2, 2, 3.0),
            FloorSequenceGrid::filled(2, 2, 1.0),
            10.0,
        );
        assert!(zero.is_degenerate());

        let mut some = zero.clone();
        some.demand.set(1, 0, 0.5);
        assert!(!some.is_degenerate());
    }

    #[test]
    fn test_builder_methods() {
        let inputs = GoalInputs::new(
            RecoveryGoal::FullRecovery,
            FloorSequenceGrid::filled(1, 1, 1.0),
            FloorSequenceGrid::filled(1, 1, 1.0),
            FloorSequenceGrid::filled(1, 1, 0.0),
            1.0,
        )
        .with_start_time(12.5)
        .with_structural_repairs(4.0);
        assert_eq!(inputs.start_time, 12.5);
        assert_eq!(inputs.structural_repairs, 4.0);
        assert_eq!(inputs.unit_count(), 1);
    }
}
