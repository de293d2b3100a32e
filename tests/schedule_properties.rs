use proptest::prelude::*;
use redi_schedule::inputs::GoalInputs;
use redi_schedule::models::{FloorSequenceGrid, RecoveryGoal, UnitStart};
use redi_schedule::scheduler::{AllocationScheduler, ScheduleKpi, ScheduleRunner};

const TOL: f64 = 1e-6;

fn grid(floors: usize, sequences: usize, values: Vec<f64>) -> FloorSequenceGrid<f64> {
    let rows = values.chunks(sequences).map(|r| r.to_vec()).collect();
    let g = FloorSequenceGrid::from_rows(rows).unwrap();
    assert_eq!(g.shape(), (floors, sequences));
    g
}

/// Demand is either absent or comfortably above the tolerances.
fn arb_demand() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.5f64..40.0]
}

fn arb_inputs() -> impl Strategy<Value = GoalInputs> {
    (1usize..5, 1usize..5).prop_flat_map(|(floors, sequences)| {
        let cells = floors * sequences;
        (
            prop::collection::vec(arb_demand(), cells),
            prop::collection::vec(1.0f64..8.0, cells),
            prop::collection::vec(0.0f64..25.0, sequences),
            1.0f64..20.0,
            0.0f64..10.0,
        )
            .prop_map(move |(demand, capacity, ready, pool, start)| {
                GoalInputs::new(
                    RecoveryGoal::FullRecovery,
                    grid(floors, sequences, demand),
                    grid(floors, sequences, capacity),
                    FloorSequenceGrid::broadcast(floors, &ready),
                    pool,
                )
                .with_start_time(start)
            })
    })
}

// ── Timing ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn units_start_after_ready_and_end_after_start(inputs in arb_inputs()) {
        let outcome = AllocationScheduler::default().schedule(&inputs).unwrap();

        for unit in &outcome.units {
            let demand = *inputs.demand.get(unit.floor, unit.sequence).unwrap();
            if demand == 0.0 {
                prop_assert_eq!(unit.start, UnitStart::NotStarted);
                continue;
            }
            let start = unit.start.time().unwrap();
            let end = unit.end.time().unwrap();
            prop_assert!(start >= unit.ready_time, "start {} before ready {}", start, unit.ready_time);
            prop_assert!(start >= inputs.start_time);
            prop_assert!(end >= start);
            prop_assert!(end <= outcome.total_span + TOL);
        }
    }

    #[test]
    fn snapshot_times_never_decrease(inputs in arb_inputs()) {
        let outcome = AllocationScheduler::default().schedule(&inputs).unwrap();
        for pair in outcome.history.windows(2) {
            prop_assert!(pair[1].time >= pair[0].time);
        }
    }
}

// ── Conservation ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn pool_and_capacity_never_exceeded(inputs in arb_inputs()) {
        let outcome = AllocationScheduler::default().schedule(&inputs).unwrap();

        for snapshot in &outcome.history {
            let assigned = snapshot.assigned_total();
            prop_assert!(assigned <= inputs.pool_size + TOL);
            prop_assert!(snapshot.free_workers >= -TOL);
            prop_assert!((assigned + snapshot.free_workers - inputs.pool_size).abs() < TOL);
            for (floor, sequence, &workers) in snapshot.workers.iter() {
                let cap = *inputs.capacity.get(floor, sequence).unwrap();
                prop_assert!(workers <= cap + TOL, "({}, {}): {} > {}", floor, sequence, workers, cap);
            }
        }
    }

    #[test]
    fn worker_days_equal_demand(inputs in arb_inputs()) {
        let result = ScheduleRunner::default().run_goal(&inputs).unwrap();
        let kpi = ScheduleKpi::calculate(&result, inputs.pool_size);

        for (floor, sequence, &demand) in inputs.demand.iter() {
            let spent = *kpi.worker_days_by_unit.get(floor, sequence).unwrap();
            prop_assert!(
                (spent - demand).abs() < 1e-5 * demand.max(1.0),
                "({}, {}): spent {} of {}", floor, sequence, spent, demand
            );
        }
    }
}

// ── Reproducibility ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn identical_inputs_identical_outcomes(inputs in arb_inputs()) {
        let scheduler = AllocationScheduler::default();
        let a = scheduler.schedule(&inputs).unwrap();
        let b = scheduler.schedule(&inputs).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn zero_demand_is_a_no_op(
        floors in 1usize..6,
        sequences in 1usize..6,
        pool in 0.0f64..20.0,
    ) {
        let inputs = GoalInputs::new(
            RecoveryGoal::ImmediateOccupancy,
            FloorSequenceGrid::filled(floors, sequences, 0.0),
            FloorSequenceGrid::filled(floors, sequences, 3.0),
            FloorSequenceGrid::filled(floors, sequences, 0.0),
            pool,
        );
        let result = ScheduleRunner::default().run_goal(&inputs).unwrap();
        prop_assert_eq!(result.total_span, 0.0);
        prop_assert!(result.allocation_history.is_empty());
        prop_assert_eq!(result.started_count(), 0);
    }
}
