//! A straightforward time-table filter which creates the resource profile per time point.
//!
//! Its complexity depends on the size of the time horizon rather than on the number of tasks; it
//! reaches the same bounds as the sweep and serves as a reference for it.
use log::debug;
use log::trace;

use super::utils::util::check_heights;
use super::utils::util::narrow_task_bounds;
use super::utils::util::raise_capacity;
use super::utils::CumulativeSweepParameters;
use super::utils::Task;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::ReadDomains;

/// The mandatory usage of every resource at every time point in `[origin, origin + len)`.
#[derive(Clone, Debug)]
struct PointProfile {
    origin: i32,
    num_resources: usize,
    /// Time-major.
    usage: Vec<i64>,
}

impl PointProfile {
    fn create(
        context: &impl ReadDomains,
        parameters: &CumulativeSweepParameters,
    ) -> Result<PointProfile, PropagatorConflict> {
        let num_resources = parameters.num_resources();
        let origin = parameters
            .tasks
            .iter()
            .map(|task| task.earliest_start(context))
            .min()
            .unwrap_or(0);
        let horizon = parameters
            .tasks
            .iter()
            .map(|task| task.latest_end(context))
            .max()
            .unwrap_or(0);
        let len = (horizon as i64 - origin as i64).max(0) as usize;

        let mut profile = PointProfile {
            origin,
            num_resources,
            usage: vec![0; len * num_resources],
        };

        for task in parameters.tasks.iter() {
            let Some((start, end)) = task.compulsory_part(context) else {
                continue;
            };
            for time_point in start..end {
                for resource in 0..num_resources {
                    *profile.usage_mut(time_point, resource) +=
                        task.min_height(context, resource) as i64;
                }
            }
        }

        for time_point in origin..horizon {
            for (resource, capacity) in parameters.capacities.iter().enumerate() {
                if profile.usage(time_point, resource) <= context.upper_bound(capacity) as i64 {
                    continue;
                }

                let tasks = parameters
                    .tasks
                    .iter()
                    .filter(|task| {
                        task.min_height(context, resource) > 0
                            && task
                                .compulsory_part(context)
                                .is_some_and(|(start, end)| start <= time_point && time_point < end)
                    })
                    .map(|task| task.index)
                    .collect::<Vec<_>>();
                debug!("overload of resource {resource} at {time_point} by {tasks:?}");

                return Err(PropagatorConflict::ResourceOverload {
                    resource,
                    time_point,
                    tasks,
                });
            }
        }

        Ok(profile)
    }

    fn index(&self, time_point: i32, resource: usize) -> usize {
        (time_point - self.origin) as usize * self.num_resources + resource
    }

    fn usage(&self, time_point: i32, resource: usize) -> i64 {
        self.usage[self.index(time_point, resource)]
    }

    fn usage_mut(&mut self, time_point: i32, resource: usize) -> &mut i64 {
        let index = self.index(time_point, resource);
        &mut self.usage[index]
    }

    fn max_usage(&self, resource: usize) -> i64 {
        self.usage
            .iter()
            .skip(resource)
            .step_by(self.num_resources)
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Whether `task` cannot be executed at `time_point` next to the mandatory usage.
    fn conflicts(
        &self,
        context: &impl ReadDomains,
        parameters: &CumulativeSweepParameters,
        task: &Task,
        time_point: i32,
    ) -> bool {
        parameters
            .capacities
            .iter()
            .enumerate()
            .any(|(resource, capacity)| {
                self.usage(time_point, resource) + task.min_height(context, resource) as i64
                    > context.upper_bound(capacity) as i64
            })
    }
}

/// Pushes the earliest start of `task` past every conflicting time point before its latest start.
fn earliest_feasible_start(
    context: &impl ReadDomains,
    parameters: &CumulativeSweepParameters,
    profile: &PointProfile,
    task: &Task,
) -> i32 {
    let latest_start = task.latest_start(context);
    let earliest_end = task.earliest_end(context);
    let duration = task.min_duration(context);

    let mut start = task.earliest_start(context);
    loop {
        let limit = latest_start.min(earliest_end.max(start.saturating_add(duration)));
        match (start..limit)
            .find(|&time_point| profile.conflicts(context, parameters, task, time_point))
        {
            Some(time_point) => start = time_point + 1,
            None => return start,
        }
    }
}

/// Pulls the latest end of `task` before every conflicting time point after its earliest end.
fn latest_feasible_end(
    context: &impl ReadDomains,
    parameters: &CumulativeSweepParameters,
    profile: &PointProfile,
    task: &Task,
) -> i32 {
    let latest_start = task.latest_start(context);
    let earliest_end = task.earliest_end(context);
    let duration = task.min_duration(context);

    let mut end = task.latest_end(context);
    loop {
        let limit = earliest_end.max(latest_start.min(end.saturating_sub(duration)));
        match (limit..end)
            .rev()
            .find(|&time_point| profile.conflicts(context, parameters, task, time_point))
        {
            Some(time_point) => end = time_point,
            None => return end,
        }
    }
}

/// Filters the bounds of all tasks with the time-table until none of the bounds change; returns
/// the number of tightened bounds.
pub(crate) fn propagate_naive_time_table(
    context: &mut PropagationContextMut,
    parameters: &CumulativeSweepParameters,
) -> Result<usize, Inconsistency> {
    let mut num_tightened = 0;
    let mut updates = Vec::with_capacity(parameters.num_tasks());

    loop {
        for task in parameters.tasks.iter() {
            narrow_task_bounds(context, task)?;
        }
        check_heights(&*context, parameters, parameters.tasks.iter())?;

        let profile = PointProfile::create(&*context, parameters)?;
        for resource in 0..parameters.num_resources() {
            raise_capacity(context, parameters, resource, profile.max_usage(resource))?;
        }

        updates.clear();
        for task in parameters.tasks.iter() {
            let start = earliest_feasible_start(&*context, parameters, &profile, task);
            let end = latest_feasible_end(&*context, parameters, &profile, task);
            if start != task.earliest_start(&*context) || end != task.latest_end(&*context) {
                updates.push((task.index, start, end));
            }
        }

        if updates.is_empty() {
            trace!("naive time-table tightened {num_tightened} bounds");
            return Ok(num_tightened);
        }

        for &(index, start, end) in updates.iter() {
            let task = &parameters.tasks[index];
            context.set_lower_bound(&task.start_variable, start)?;
            context.set_upper_bound(&task.end_variable, end)?;
        }
        num_tightened += updates.len();
    }
}
