//! Repair scheduling domain models.
//!
//! | Type | Meaning |
//! |------|---------|
//! | `FloorSequenceGrid` | Any quantity indexed by floor × repair sequence |
//! | `RepairUnit` | One floor × sequence task competing for workers |
//! | `AllocationSnapshot` | Worker assignment vector at one instant |
//! | `RecoveryGoalResult` | Start/end times and allocation history for one goal |

mod grid;
mod schedule;
mod unit;

pub use grid::{FloorSequenceGrid, GridSizeError};
pub use schedule::{AllocationSnapshot, RecoveryGoal, RecoveryGoalResult};
pub use unit::{RepairUnit, UnitEnd, UnitStart};
