//! Per-goal scheduler inputs.
//!
//! Upstream collaborators (damage aggregation, consequence summation,
//! impeding-delay sampling, structural repair division) hand over one
//! [`BuildingWorkload`] per simulation realization. [`ScheduleInputBuilder`]
//! turns it into one [`GoalInputs`] per recovery goal: demand grid, capacity
//! grid constrained building-wide, readiness grid and pool size.

mod builder;
mod goal;

pub use builder::{adjust_capacity, sequence_ready_times, BuildingWorkload, ScheduleInputBuilder};
pub use goal::GoalInputs;
