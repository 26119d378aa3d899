#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

//! Compares the sweep against the time-table which creates the profile per time point on random
//! instances; without energy reasoning both should reach the same bounds.
mod helpers;

use std::ops::RangeInclusive;

use helpers::init_logging;
use helpers::task_with_ranges;
use helpers::Instance;
use pumpkin_cumulative_sweep::engine::propagation::PropagatorId;
use pumpkin_cumulative_sweep::engine::variables::DomainId;
use pumpkin_cumulative_sweep::engine::TestSolver;
use pumpkin_cumulative_sweep::propagators::cumulative::CumulativeSweepOptions;
use pumpkin_cumulative_sweep::propagators::cumulative::CumulativeSweepPropagationMethod;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

const NUM_INSTANCES: u64 = 250;
const NUM_CHANGES: usize = 12;

#[derive(Clone, Debug)]
struct RandomTask {
    start: (i32, i32),
    duration: (i32, i32),
    heights: Vec<(i32, i32)>,
}

#[derive(Clone, Debug)]
struct RandomInstance {
    tasks: Vec<RandomTask>,
    capacities: Vec<i32>,
}

/// A range `[lower, lower + extra]` whose lower-bound lies in `lower` and whose width lies in
/// `extra`.
fn random_range(
    rng: &mut SmallRng,
    lower: RangeInclusive<i32>,
    extra: RangeInclusive<i32>,
) -> (i32, i32) {
    let lower = rng.gen_range(lower);
    (lower, lower + rng.gen_range(extra))
}

impl RandomInstance {
    fn generate(rng: &mut SmallRng) -> Self {
        let num_resources = rng.gen_range(1..=2);
        let num_tasks = rng.gen_range(0..=6);

        let tasks = (0..num_tasks)
            .map(|_| RandomTask {
                start: random_range(rng, 0..=9, 0..=5),
                duration: random_range(rng, 0..=4, 0..=2),
                heights: (0..num_resources)
                    .map(|_| random_range(rng, 0..=3, 0..=1))
                    .collect(),
            })
            .collect();
        let capacities = (0..num_resources).map(|_| rng.gen_range(1..=5)).collect();

        RandomInstance { tasks, capacities }
    }

    fn build(&self) -> Instance {
        let mut solver = TestSolver::default();
        let tasks = self
            .tasks
            .iter()
            .map(|random_task| {
                task_with_ranges(
                    &mut solver,
                    random_task.start,
                    random_task.duration,
                    &random_task.heights,
                )
            })
            .collect();
        let capacities = self
            .capacities
            .iter()
            .map(|&capacity| solver.new_variable(0, capacity))
            .collect();

        Instance::new(solver, tasks, capacities)
    }
}

fn naive_time_table() -> CumulativeSweepOptions {
    CumulativeSweepOptions {
        propagation_method: CumulativeSweepPropagationMethod::NaiveTimeTable,
        use_energy_reasoning: false,
        incremental: true,
    }
}

fn sweep(incremental: bool) -> CumulativeSweepOptions {
    CumulativeSweepOptions {
        propagation_method: CumulativeSweepPropagationMethod::Sweep,
        use_energy_reasoning: false,
        incremental,
    }
}

/// Raises the lower-bound of the variable selected by `variable` in both instances to a random
/// value which lies in both of its domains.
fn raise_lower_bound(
    rng: &mut SmallRng,
    (sweep, sweep_id): (&mut Instance, PropagatorId),
    (naive, naive_id): (&mut Instance, PropagatorId),
    variable: impl Fn(&Instance) -> DomainId,
) {
    let (sweep_variable, naive_variable) = (variable(sweep), variable(naive));
    // Only the bounds of the start and end times are guaranteed to be the same.
    let lower_bound = sweep
        .solver
        .lower_bound(sweep_variable)
        .max(naive.solver.lower_bound(naive_variable));
    let upper_bound = sweep
        .solver
        .upper_bound(sweep_variable)
        .min(naive.solver.upper_bound(naive_variable));
    if lower_bound > upper_bound {
        return;
    }

    let value = rng.gen_range(lower_bound..=upper_bound);
    let _ = sweep
        .solver
        .increase_lower_bound_and_notify(sweep_id, sweep_variable, value)
        .expect("value is in the domain");
    let _ = naive
        .solver
        .increase_lower_bound_and_notify(naive_id, naive_variable, value)
        .expect("value is in the domain");
}

/// Tightens a random bound in both instances; the instances are expected to have the same bounds.
fn apply_random_change(
    rng: &mut SmallRng,
    (sweep, sweep_id): (&mut Instance, PropagatorId),
    (naive, naive_id): (&mut Instance, PropagatorId),
) {
    let num_tasks = sweep.tasks.len();
    if num_tasks == 0 || rng.gen_bool(0.1) {
        let resource = rng.gen_range(0..sweep.capacities.len());
        let capacity = sweep.capacities[resource];
        // The lower-bounds of the capacities are raised by different amounts.
        let lower_bound = sweep
            .solver
            .lower_bound(capacity)
            .max(naive.solver.lower_bound(naive.capacities[resource]));
        let value = rng.gen_range(lower_bound..=sweep.solver.upper_bound(capacity));
        let _ = sweep
            .solver
            .decrease_upper_bound_and_notify(sweep_id, capacity, value)
            .expect("value is in the domain");
        let _ = naive
            .solver
            .decrease_upper_bound_and_notify(naive_id, naive.capacities[resource], value)
            .expect("value is in the domain");
        return;
    }

    let index = rng.gen_range(0..num_tasks);
    match rng.gen_range(0..4) {
        0 => raise_lower_bound(rng, (sweep, sweep_id), (naive, naive_id), |instance| {
            instance.tasks[index].start_time
        }),
        1 => raise_lower_bound(rng, (sweep, sweep_id), (naive, naive_id), |instance| {
            instance.tasks[index].duration
        }),
        2 => {
            let resource = rng.gen_range(0..sweep.capacities.len());
            raise_lower_bound(rng, (sweep, sweep_id), (naive, naive_id), |instance| {
                instance.tasks[index].resource_usages[resource]
            })
        }
        _ => {
            let (lower_bound, upper_bound) = sweep.end(index);
            let value = rng.gen_range(lower_bound..=upper_bound);
            let _ = sweep
                .solver
                .decrease_upper_bound_and_notify(sweep_id, sweep.tasks[index].end_time, value)
                .expect("value is in the domain");
            let _ = naive
                .solver
                .decrease_upper_bound_and_notify(naive_id, naive.tasks[index].end_time, value)
                .expect("value is in the domain");
        }
    }
}

fn cross_validate(options: CumulativeSweepOptions, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let random_instance = RandomInstance::generate(&mut rng);

    let mut sweep = random_instance.build();
    let mut naive = random_instance.build();
    let sweep_result = sweep.post(options);
    let naive_result = naive.post(naive_time_table());

    assert_eq!(
        naive_result.is_err(),
        sweep_result.is_err(),
        "initial propagation disagrees on {random_instance:?}"
    );
    let (Ok(sweep_id), Ok(naive_id)) = (sweep_result, naive_result) else {
        return;
    };
    assert_eq!(
        naive.task_bounds(),
        sweep.task_bounds(),
        "initial propagation disagrees on {random_instance:?}"
    );

    for change in 0..NUM_CHANGES {
        let checkpoint = sweep.solver.get_checkpoint();
        sweep.solver.new_checkpoint();
        naive.solver.new_checkpoint();

        apply_random_change(&mut rng, (&mut sweep, sweep_id), (&mut naive, naive_id));
        let sweep_result = sweep.solver.propagate_until_fixed_point(sweep_id);
        let naive_result = naive.solver.propagate_until_fixed_point(naive_id);

        assert_eq!(
            naive_result.is_err(),
            sweep_result.is_err(),
            "change {change} with seed {seed} disagrees on {random_instance:?}"
        );

        if sweep_result.is_err() {
            sweep.solver.synchronise(checkpoint);
            naive.solver.synchronise(checkpoint);
        } else {
            assert_eq!(
                naive.task_bounds(),
                sweep.task_bounds(),
                "change {change} with seed {seed} disagrees on {random_instance:?}"
            );

            let before = sweep.task_bounds();
            sweep
                .solver
                .debug_propagate_from_scratch(sweep_id)
                .expect("the fixpoint is consistent");
            assert_eq!(before, sweep.task_bounds());
        }

        let current = sweep.solver.get_checkpoint();
        if current > 0 && rng.gen_bool(0.2) {
            let target = rng.gen_range(0..current);
            sweep.solver.synchronise(target);
            naive.solver.synchronise(target);
            assert_eq!(naive.task_bounds(), sweep.task_bounds());
        }
    }
}

#[test]
fn incremental_sweep_agrees_with_the_naive_time_table() {
    init_logging();
    for seed in 0..NUM_INSTANCES {
        cross_validate(sweep(true), seed);
    }
}

#[test]
fn sweep_from_scratch_agrees_with_the_naive_time_table() {
    init_logging();
    for seed in 0..NUM_INSTANCES {
        cross_validate(sweep(false), seed);
    }
}

#[test]
fn energy_reasoning_only_adds_failures() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..NUM_INSTANCES {
        let random_instance = RandomInstance::generate(&mut rng);
        let mut with_energy = random_instance.build();
        let mut naive = random_instance.build();

        let with_energy_result = with_energy.post(CumulativeSweepOptions::default());
        let naive_result = naive.post(naive_time_table());

        match (with_energy_result, naive_result) {
            (Ok(_), Ok(_)) => assert_eq!(
                naive.task_bounds(),
                with_energy.task_bounds(),
                "bounds disagree on {random_instance:?}"
            ),
            (Ok(_), Err(conflict)) => {
                panic!("{conflict} was not detected with energy reasoning on {random_instance:?}")
            }
            (Err(_), _) => {}
        }
    }
}
