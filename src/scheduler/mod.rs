//! Fair-share worker allocation and recovery schedule evaluation.
//!
//! # Algorithm
//!
//! `AllocationScheduler` runs a continuous-time discrete-event simulation.
//! At each event every ready unit with remaining demand receives a share of
//! the free pool proportional to its remaining demand, capped by its
//! remaining capacity; passes repeat at the same instant until no more
//! workers can be placed. The clock then jumps to whichever comes first:
//!
//! - **Finish**: the earliest projected completion among working units. Only
//!   the finished units release their crews.
//! - **Readiness**: the earliest ready time of a waiting unit. Every crew is
//!   reclaimed and the whole building is re-allocated.
//!
//! Every assignment change is appended to the allocation history, so the
//! history is a complete piecewise-constant record of who worked where.
//!
//! `ScheduleRunner` drives one simulation per recovery goal and reduces the
//! results into building downtime. `ScheduleKpi` summarises a single goal.

mod alloc;
mod kpi;
mod runner;

pub use alloc::{
    AllocationOutcome, AllocationScheduler, SchedulerConfig, DEMAND_EPSILON, WORKER_EPSILON,
};
pub use kpi::ScheduleKpi;
pub use runner::{downtime_by_goal, ScheduleRunner};
