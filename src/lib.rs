//! Post-earthquake repair scheduling.
//!
//! Allocates a limited pool of construction workers across the damaged
//! floors and nonstructural repair sequences of one building, for each of
//! three recovery goals, and reports when each repair unit starts and
//! finishes.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `FloorSequenceGrid`, `RepairUnit`,
//!   `RecoveryGoal`, `RecoveryGoalResult`, `AllocationSnapshot`
//! - **`inputs`**: Per-goal scheduler inputs and the building-wide capacity
//!   adjustment
//! - **`scheduler`**: Fair-share discrete-event allocation, per-goal runner,
//!   downtime reduction and KPIs
//! - **`workforce`**: Sampling of worker caps, recommended crews and pool size
//! - **`distribution`**: Seeded inverse-CDF sampling
//! - **`validation`**: Input integrity checks (grid shapes, signs, reachability)
//!
//! # Example
//!
//! ```
//! use redi_schedule::inputs::{BuildingWorkload, ScheduleInputBuilder};
//! use redi_schedule::models::FloorSequenceGrid;
//! use redi_schedule::scheduler::{downtime_by_goal, ScheduleRunner};
//!
//! let demand = FloorSequenceGrid::from_rows(vec![vec![20.0, 6.0], vec![10.0, 0.0]]).unwrap();
//! let workload = BuildingWorkload {
//!     demand_by_goal: vec![demand.clone(), demand, FloorSequenceGrid::filled(2, 2, 0.0)],
//!     recommended_workers: FloorSequenceGrid::filled(2, 2, 4.0),
//!     sequence_constraints: vec![6.0, 6.0],
//!     contractor_delays: vec![5.0, 30.0],
//!     structural_repair_days: vec![10.0, 10.0, 0.0],
//!     structural_start_delay: 15.0,
//!     pool_size: 12.0,
//! };
//!
//! let builder = ScheduleInputBuilder::new(&workload).unwrap();
//! let results: Vec<_> = ScheduleRunner::default()
//!     .run_all(&builder)
//!     .into_iter()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! let downtime = downtime_by_goal(&results, workload.structural_start_delay, 365.0);
//! assert_eq!(downtime[2], 0.0);
//! assert!(downtime[0] >= 25.0);
//! ```
//!
//! # References
//!
//! - Almufti & Willford (2013), "REDi Rating System: Resilience-based
//!   Earthquake Design Initiative for the Next Generation of Buildings", Arup

pub mod distribution;
pub mod error;
pub mod inputs;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod workforce;

pub use error::{Result, ScheduleError};
