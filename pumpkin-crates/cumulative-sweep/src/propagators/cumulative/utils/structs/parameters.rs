use super::Task;
use crate::propagators::cumulative::CumulativeSweepOptions;

/// Holds the data for the cumulative constraint; more specifically it holds:
/// - The tasks
/// - The capacity of every resource dimension
/// - The options which influence the behaviour of the propagator
#[derive(Clone, Debug)]
pub(crate) struct CumulativeSweepParameters {
    /// For each [`Task`], [`Task::index`] corresponds to its position in this slice
    pub(crate) tasks: Box<[Task]>,
    pub(crate) capacities: Box<[crate::engine::variables::DomainId]>,
    pub(crate) options: CumulativeSweepOptions,
}

impl CumulativeSweepParameters {
    pub(crate) fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn num_resources(&self) -> usize {
        self.capacities.len()
    }
}

#[cfg(test)]
impl CumulativeSweepParameters {
    /// Creates tasks with a fixed duration and fixed heights which have to execute within the
    /// window `[est, lct)`; the capacities range from 0 to the provided maximum.
    pub(crate) fn for_testing<const R: usize>(
        assignments: &mut crate::engine::Assignments,
        tasks: &[((i32, i32), i32, [i32; R])],
        capacities: [i32; R],
        options: CumulativeSweepOptions,
    ) -> Self {
        let tasks = tasks
            .iter()
            .map(|&((est, lct), duration, heights)| {
                ((est, lct - duration), (duration, duration), heights)
            })
            .collect::<Vec<_>>();
        Self::with_duration_ranges(assignments, &tasks, capacities, options)
    }

    /// Creates tasks from the bounds of their start and duration; the end ranges from the
    /// earliest start plus the shortest duration to the latest start plus the longest duration.
    pub(crate) fn with_duration_ranges<const R: usize>(
        assignments: &mut crate::engine::Assignments,
        tasks: &[((i32, i32), (i32, i32), [i32; R])],
        capacities: [i32; R],
        options: CumulativeSweepOptions,
    ) -> Self {
        let tasks = tasks
            .iter()
            .enumerate()
            .map(|(index, &((est, lst), (min_duration, max_duration), heights))| Task {
                start_variable: assignments.grow(est, lst),
                duration_variable: assignments.grow(min_duration, max_duration),
                end_variable: assignments.grow(est + min_duration, lst + max_duration),
                resource_usages: heights
                    .iter()
                    .map(|&height| assignments.grow(height, height))
                    .collect(),
                index,
            })
            .collect::<Vec<_>>();
        let capacities = capacities
            .iter()
            .map(|&capacity| assignments.grow(0, capacity))
            .collect();

        CumulativeSweepParameters {
            tasks: tasks.into_boxed_slice(),
            capacities,
            options,
        }
    }
}
