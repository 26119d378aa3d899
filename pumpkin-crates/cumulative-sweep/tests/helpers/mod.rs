//! Builders which are shared by the integration tests.
#![allow(
    dead_code,
    reason = "every test file uses a different subset of the helpers"
)]

use pumpkin_cumulative_sweep::engine::propagation::PropagatorId;
use pumpkin_cumulative_sweep::engine::variables::DomainId;
use pumpkin_cumulative_sweep::engine::TestSolver;
use pumpkin_cumulative_sweep::propagators::cumulative::ArgTask;
use pumpkin_cumulative_sweep::propagators::cumulative::CumulativeSweepConstructor;
use pumpkin_cumulative_sweep::propagators::cumulative::CumulativeSweepOptions;
use pumpkin_cumulative_sweep::Inconsistency;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a task with a fixed duration and fixed heights whose start time lies in `start`.
pub(crate) fn task(
    solver: &mut TestSolver,
    start: (i32, i32),
    duration: i32,
    heights: &[i32],
) -> ArgTask {
    let heights = heights
        .iter()
        .map(|&height| (height, height))
        .collect::<Vec<_>>();
    task_with_ranges(solver, start, (duration, duration), &heights)
}

/// Creates a task whose start, duration and heights lie in the given ranges; the end ranges from
/// the earliest start plus the shortest duration to the latest start plus the longest duration.
pub(crate) fn task_with_ranges(
    solver: &mut TestSolver,
    start: (i32, i32),
    duration: (i32, i32),
    heights: &[(i32, i32)],
) -> ArgTask {
    ArgTask {
        start_time: solver.new_variable(start.0, start.1),
        duration: solver.new_variable(duration.0, duration.1),
        end_time: solver.new_variable(start.0 + duration.0, start.1 + duration.1),
        resource_usages: heights
            .iter()
            .map(|&(min_height, max_height)| solver.new_variable(min_height, max_height))
            .collect(),
    }
}

/// A solver with a single cumulative constraint.
#[derive(Debug)]
pub(crate) struct Instance {
    pub(crate) solver: TestSolver,
    pub(crate) tasks: Vec<ArgTask>,
    pub(crate) capacities: Vec<DomainId>,
}

impl Instance {
    pub(crate) fn new(solver: TestSolver, tasks: Vec<ArgTask>, capacities: Vec<DomainId>) -> Self {
        Instance {
            solver,
            tasks,
            capacities,
        }
    }

    pub(crate) fn post(
        &mut self,
        options: CumulativeSweepOptions,
    ) -> Result<PropagatorId, Inconsistency> {
        let constructor =
            CumulativeSweepConstructor::new(&self.tasks, self.capacities.clone(), options)
                .expect("every task has one height per resource");
        self.solver.new_propagator(constructor)
    }

    pub(crate) fn start(&self, task: usize) -> (i32, i32) {
        let start = self.tasks[task].start_time;
        (self.solver.lower_bound(start), self.solver.upper_bound(start))
    }

    pub(crate) fn end(&self, task: usize) -> (i32, i32) {
        let end = self.tasks[task].end_time;
        (self.solver.lower_bound(end), self.solver.upper_bound(end))
    }

    /// The start and end bounds of every task.
    pub(crate) fn task_bounds(&self) -> Vec<((i32, i32), (i32, i32))> {
        (0..self.tasks.len())
            .map(|task| (self.start(task), self.end(task)))
            .collect()
    }
}
