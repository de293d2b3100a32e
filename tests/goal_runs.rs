use redi_schedule::distribution::RandomSource;
use redi_schedule::inputs::{BuildingWorkload, ScheduleInputBuilder};
use redi_schedule::models::{FloorSequenceGrid, RecoveryGoal};
use redi_schedule::scheduler::{downtime_by_goal, ScheduleKpi, ScheduleRunner};
use redi_schedule::workforce::WorkforceParams;
use tracing_subscriber::{fmt, EnvFilter};

const PARAMS_JSON: &str = r#"{
    "max_workers_minimum": 25.0,
    "max_workers_slope": 0.00069,
    "max_workers_x_cutoff": 5000.0,
    "max_workers_sigma": 4.0,
    "workers_capacity": { "distribution": "lognormal", "beta": 0.4 },
    "nworkers_recommended_mean": [0.5, 0.25],
    "nwork_perfloor_divider": [100.0, 150.0],
    "max_workers_by_sequence": [[12.0, 10.0], [20.0, 16.0], [30.0, 24.0]]
}"#;

const FLOOR_AREA: f64 = 1500.0;

fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn grid(rows: Vec<Vec<f64>>) -> FloorSequenceGrid<f64> {
    FloorSequenceGrid::from_rows(rows).unwrap()
}

/// Three-storey building; floor 2 has no damage in sequence 1.
fn sample_workload(seed: u64) -> BuildingWorkload {
    let params: WorkforceParams = serde_json::from_str(PARAMS_JSON).unwrap();
    let mut rng = RandomSource::new(seed, 10);

    let damaged = grid(vec![vec![12.0, 8.0], vec![20.0, 4.0], vec![6.0, 0.0]]);
    let areas = [FLOOR_AREA; 3];
    let recommended_workers = params
        .sample_recommended_workers(&areas, &damaged, &mut rng)
        .unwrap();
    let sequence_constraints = params.sample_sequence_constraints(3, &mut rng).unwrap();
    let pool_size = params.sample_pool_size(FLOOR_AREA * 3.0, &mut rng);

    BuildingWorkload {
        demand_by_goal: vec![
            grid(vec![vec![60.0, 30.0], vec![90.0, 12.0], vec![25.0, 0.0]]),
            grid(vec![vec![40.0, 30.0], vec![45.0, 0.0], vec![10.0, 0.0]]),
            grid(vec![vec![15.0, 0.0], vec![0.0, 0.0], vec![0.0, 0.0]]),
        ],
        recommended_workers,
        sequence_constraints,
        contractor_delays: vec![30.0, 90.0],
        structural_repair_days: vec![45.0, 30.0, 0.0],
        structural_start_delay: 20.0,
        pool_size,
    }
}

#[test]
fn test_same_seed_same_workload() {
    assert_eq!(sample_workload(42), sample_workload(42));
    assert_ne!(sample_workload(42), sample_workload(43));
}

#[test]
fn test_full_building_run() {
    init_test_logging();
    let workload = sample_workload(42);
    let builder = ScheduleInputBuilder::new(&workload).unwrap();
    let runner = ScheduleRunner::default();

    let results: Vec<_> = runner
        .run_all_parallel(&builder)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(results.len(), RecoveryGoal::COUNT);
    for (result, goal) in results.iter().zip(RecoveryGoal::ALL) {
        assert_eq!(result.goal, goal);
        assert!(result.has_nonstructural_work());

        // Nothing starts before structural repairs are done.
        let completion = builder.structural_completion(goal);
        for (_, _, start) in result.starts.iter() {
            if let Some(t) = start.time() {
                assert!(t >= completion - 1e-9);
            }
        }

        let kpi = ScheduleKpi::calculate(result, workload.pool_size);
        let demand = &workload.demand_by_goal[goal.index()];
        assert!((kpi.total_worker_days - demand.total()).abs() < 1e-5);
        assert!(kpi.peak_workers <= workload.pool_size + 1e-9);
    }

    let sequential: Vec<_> = runner
        .run_all(&builder)
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(results, sequential);

    let replacement_time = 720.0;
    let downtime = downtime_by_goal(&results, workload.structural_start_delay, replacement_time);
    for (d, result) in downtime.iter().zip(&results) {
        assert!(*d <= replacement_time);
        assert!((*d - result.total_span.min(replacement_time)).abs() < 1e-9);
    }
    // Sequence 1 cannot start before its contractor arrives at day 90.
    assert!(downtime[0] > 90.0);
}
