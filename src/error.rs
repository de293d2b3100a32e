//! Error taxonomy for schedule construction and simulation.
//!
//! Every error is fatal to the goal it occurred in. The only recognized
//! "no work" shortcut is a goal with zero total demand, which is not an
//! error at all (see [`crate::inputs::GoalInputs::is_degenerate`]).

use thiserror::Error;

use crate::models::RecoveryGoal;
use crate::validation::ValidationError;

/// Errors raised while building inputs or running the allocation scheduler.
#[derive(Debug, Clone, Error)]
pub enum ScheduleError {
    /// A distribution name that has no sampling function.
    #[error("invalid distribution '{name}': no sampling function for this distribution")]
    InvalidDistribution { name: String },

    /// Input data failed validation before the simulation started.
    #[error("malformed schedule input: {}", summarize(.0))]
    MalformedInput(Vec<ValidationError>),

    /// The event loop could not make progress while demand remained.
    #[error(
        "allocation stalled after {iterations} rounds at t={now:.4} with {remaining_demand:.4} worker-days left"
    )]
    Stalled {
        iterations: usize,
        now: f64,
        remaining_demand: f64,
    },

    /// A single recovery goal failed; the other goals are unaffected.
    #[error("{goal} schedule failed: {source}")]
    GoalFailed {
        goal: RecoveryGoal,
        #[source]
        source: Box<ScheduleError>,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
