//! Recovery schedule metrics (KPIs).
//!
//! Derived from a [`RecoveryGoalResult`] and the pool it was scheduled
//! with. Worker-days are integrated over the allocation history, which is
//! piecewise constant between snapshots.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Span | Latest end over all started units (days) |
//! | Active window | Last snapshot time minus first snapshot time |
//! | Worker-days | Σ workers × interval length, per unit and total |
//! | Peak workers | Largest simultaneous crew on site |
//! | Avg utilization | Worker-days / (pool × active window) |

use crate::models::{FloorSequenceGrid, RecoveryGoalResult};

/// Recovery schedule performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Latest end over all started units (days).
    pub span_days: f64,
    /// Length of the nonstructural work window (days).
    pub active_window_days: f64,
    /// Worker-days spent on each floor × sequence unit.
    pub worker_days_by_unit: FloorSequenceGrid<f64>,
    /// Worker-days over the whole building.
    pub total_worker_days: f64,
    /// Largest number of workers on site at once.
    pub peak_workers: f64,
    /// Mean fraction of the pool on site during the active window (0.0..1.0).
    pub avg_utilization: f64,
    /// Units that received workers at least once.
    pub units_started: usize,
    /// Units that completed.
    pub units_finished: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a goal result.
    ///
    /// # Arguments
    /// * `result` - A scheduled recovery goal.
    /// * `pool_size` - Workers available to the building for that goal.
    pub fn calculate(result: &RecoveryGoalResult, pool_size: f64) -> Self {
        let (floors, sequences) = result.starts.shape();
        let mut worker_days_by_unit = FloorSequenceGrid::filled(floors, sequences, 0.0);
        let mut peak_workers: f64 = 0.0;

        let history = &result.allocation_history;
        for (i, snapshot) in history.iter().enumerate() {
            peak_workers = peak_workers.max(snapshot.assigned_total());
            // The last snapshot has no following interval.
            let Some(next) = history.get(i + 1) else {
                continue;
            };
            let dt = next.time - snapshot.time;
            if dt <= 0.0 {
                continue;
            }
            for (floor, sequence, &workers) in snapshot.workers.iter() {
                if let Some(cell) = worker_days_by_unit.get_mut(floor, sequence) {
                    *cell += workers * dt;
                }
            }
        }

        let active_window_days = match (history.first(), history.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        };
        let total_worker_days = worker_days_by_unit.total();
        let avg_utilization = if pool_size > 0.0 && active_window_days > 0.0 {
            total_worker_days / (pool_size * active_window_days)
        } else {
            0.0
        };

        Self {
            span_days: result.total_span,
            active_window_days,
            worker_days_by_unit,
            total_worker_days,
            peak_workers,
            avg_utilization,
            units_started: result.started_count(),
            units_finished: result.ends.values().iter().filter(|e| e.is_finished()).count(),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_span_days: f64, min_utilization: f64) -> bool {
        self.span_days <= max_span_days && self.avg_utilization >= min_utilization
    }
}
