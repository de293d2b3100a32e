//! Input validation for repair scheduling.
//!
//! Checks structural and numeric integrity of schedule inputs before any
//! simulation runs. Detects:
//! - Grids whose shapes disagree
//! - Negative or non-finite demand, capacity, ready times and pool size
//! - Units with demand that can never receive a worker
//! - Per-goal / per-sequence vectors of the wrong length
//!
//! All problems are collected rather than stopping at the first one.

use crate::inputs::{BuildingWorkload, GoalInputs};
use crate::models::{FloorSequenceGrid, RecoveryGoal};
use crate::scheduler::{DEMAND_EPSILON, WORKER_EPSILON};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two grids that must align have different dimensions.
    ShapeMismatch,
    /// A per-goal or per-sequence vector has the wrong length.
    LengthMismatch,
    /// Demand below zero or not finite.
    NegativeDemand,
    /// Capacity or constraint below zero or not finite.
    NegativeCapacity,
    /// Ready time or delay below zero or not finite.
    InvalidReadyTime,
    /// Worker pool below zero or not finite.
    NegativePoolSize,
    /// A unit has demand but no way to ever receive workers.
    UnreachableUnit,
    /// Every demand cell is finite but their sum is not.
    DemandOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn check_cells(
    grid: &FloorSequenceGrid<f64>,
    label: &str,
    kind: ValidationErrorKind,
    errors: &mut Vec<ValidationError>,
) {
    for (floor, sequence, &v) in grid.iter() {
        if !is_non_negative(v) {
            errors.push(ValidationError::new(
                kind,
                format!("{label}[{floor}][{sequence}] = {v}"),
            ));
        }
    }
}

/// Flags a grid whose cells are finite but whose total overflows.
fn check_total(grid: &FloorSequenceGrid<f64>, label: &str, errors: &mut Vec<ValidationError>) {
    let total = grid.total();
    if !total.is_finite() && grid.values().iter().all(|v| v.is_finite()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::DemandOverflow,
            format!("{label} total = {total}"),
        ));
    }
}

fn check_scalars(
    values: &[f64],
    label: &str,
    kind: ValidationErrorKind,
    errors: &mut Vec<ValidationError>,
) {
    for (i, &v) in values.iter().enumerate() {
        if !is_non_negative(v) {
            errors.push(ValidationError::new(kind, format!("{label}[{i}] = {v}")));
        }
    }
}

/// Validates one goal's scheduler inputs.
///
/// Checks:
/// 1. Demand, capacity and ready grids share one shape
/// 2. Every demand, capacity and ready value is finite and non-negative,
///    and total demand is finite
/// 3. Pool size is finite and non-negative
/// 4. Every unit with demand has capacity to absorb workers
/// 5. The pool can staff at least one unit when there is demand
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_goal_inputs(inputs: &GoalInputs) -> ValidationResult {
    let mut errors = Vec::new();

    for (label, grid) in [("capacity", &inputs.capacity), ("ready", &inputs.ready)] {
        if !grid.same_shape(&inputs.demand) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ShapeMismatch,
                format!(
                    "{label} grid is {:?} but demand grid is {:?}",
                    grid.shape(),
                    inputs.demand.shape()
                ),
            ));
        }
    }

    check_cells(&inputs.demand, "demand", ValidationErrorKind::NegativeDemand, &mut errors);
    check_total(&inputs.demand, "demand", &mut errors);
    check_cells(&inputs.capacity, "capacity", ValidationErrorKind::NegativeCapacity, &mut errors);
    check_cells(&inputs.ready, "ready", ValidationErrorKind::InvalidReadyTime, &mut errors);

    if !is_non_negative(inputs.pool_size) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativePoolSize,
            format!("pool size = {}", inputs.pool_size),
        ));
    }
    if !inputs.start_time.is_finite() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidReadyTime,
            format!("start time = {}", inputs.start_time),
        ));
    }

    // Reachability only makes sense once the grids line up.
    if errors.is_empty() {
        let mut has_demand = false;
        for (floor, sequence, &demand) in inputs.demand.iter() {
            if demand <= DEMAND_EPSILON {
                continue;
            }
            has_demand = true;
            let capacity = inputs.capacity.get(floor, sequence).copied().unwrap_or(0.0);
            if capacity <= DEMAND_EPSILON {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnreachableUnit,
                    format!(
                        "unit [{floor}][{sequence}] has {demand} worker-days of demand but capacity {capacity}"
                    ),
                ));
            }
        }
        if has_demand && inputs.pool_size <= WORKER_EPSILON {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnreachableUnit,
                format!(
                    "pool of {} workers cannot staff any unit",
                    inputs.pool_size
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the building-level workload that per-goal inputs are built from.
///
/// Checks:
/// 1. One demand grid and one structural duration per recovery goal
/// 2. All demand grids match the recommended-worker grid shape
/// 3. One constraint and one contractor delay per repair sequence
/// 4. Every value is finite and non-negative
pub fn validate_workload(workload: &BuildingWorkload) -> ValidationResult {
    let mut errors = Vec::new();
    let sequences = workload.recommended_workers.sequences();

    if workload.demand_by_goal.len() != RecoveryGoal::COUNT {
        errors.push(ValidationError::new(
            ValidationErrorKind::LengthMismatch,
            format!(
                "expected {} demand grids, got {}",
                RecoveryGoal::COUNT,
                workload.demand_by_goal.len()
            ),
        ));
    }
    if workload.structural_repair_days.len() != RecoveryGoal::COUNT {
        errors.push(ValidationError::new(
            ValidationErrorKind::LengthMismatch,
            format!(
                "expected {} structural repair durations, got {}",
                RecoveryGoal::COUNT,
                workload.structural_repair_days.len()
            ),
        ));
    }
    if workload.sequence_constraints.len() != sequences {
        errors.push(ValidationError::new(
            ValidationErrorKind::LengthMismatch,
            format!(
                "expected {sequences} sequence constraints, got {}",
                workload.sequence_constraints.len()
            ),
        ));
    }
    if workload.contractor_delays.len() != sequences {
        errors.push(ValidationError::new(
            ValidationErrorKind::LengthMismatch,
            format!(
                "expected {sequences} contractor delays, got {}",
                workload.contractor_delays.len()
            ),
        ));
    }

    for (goal, demand) in workload.demand_by_goal.iter().enumerate() {
        if !demand.same_shape(&workload.recommended_workers) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ShapeMismatch,
                format!(
                    "demand grid for goal {goal} is {:?} but recommended workers grid is {:?}",
                    demand.shape(),
                    workload.recommended_workers.shape()
                ),
            ));
        }
        check_cells(
            demand,
            &format!("demand[goal {goal}]"),
            ValidationErrorKind::NegativeDemand,
            &mut errors,
        );
        check_total(demand, &format!("demand[goal {goal}]"), &mut errors);
    }

    check_cells(
        &workload.recommended_workers,
        "recommended_workers",
        ValidationErrorKind::NegativeCapacity,
        &mut errors,
    );
    check_scalars(
        &workload.sequence_constraints,
        "sequence_constraints",
        ValidationErrorKind::NegativeCapacity,
        &mut errors,
    );
    check_scalars(
        &workload.contractor_delays,
        "contractor_delays",
        ValidationErrorKind::InvalidReadyTime,
        &mut errors,
    );
    check_scalars(
        &workload.structural_repair_days,
        "structural_repair_days",
        ValidationErrorKind::InvalidReadyTime,
        &mut errors,
    );
    if !is_non_negative(workload.structural_start_delay) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidReadyTime,
            format!("structural start delay = {}", workload.structural_start_delay),
        ));
    }
    if !is_non_negative(workload.pool_size) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativePoolSize,
            format!("pool size = {}", workload.pool_size),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
