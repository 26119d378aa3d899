//! Contains common methods for the cumulative propagator; this includes methods for creating and
//! registering the tasks, narrowing the bounds of a task and checks which are shared by the
//! different propagation methods.
use log::debug;

use super::ArgTask;
use super::CumulativeSweepParameters;
use super::Task;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagatorConstructorContext;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::DomainId;
use crate::engine::EmptyDomain;

/// A variable of the constraint, as identified by its [`LocalId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConstraintVariable {
    /// One of the variables (start, duration, end or a height) of the task with the given index.
    Task(usize),
    /// The capacity of the given resource dimension.
    Capacity(usize),
}

/// The number of local ids which every task uses.
pub(crate) fn local_ids_per_task(num_resources: usize) -> u32 {
    3 + num_resources as u32
}

/// Maps a [`LocalId`] as registered by [`register_tasks`] back to the variable it belongs to.
pub(crate) fn local_id_to_variable(
    local_id: LocalId,
    num_tasks: usize,
    num_resources: usize,
) -> ConstraintVariable {
    let per_task = local_ids_per_task(num_resources) as usize;
    let index = local_id.unpack() as usize;
    if index < num_tasks * per_task {
        ConstraintVariable::Task(index / per_task)
    } else {
        ConstraintVariable::Capacity(index - num_tasks * per_task)
    }
}

/// Checks that every task has exactly one height per resource dimension and creates the
/// [`Task`]s.
pub(crate) fn create_tasks(
    arg_tasks: &[ArgTask],
    num_resources: usize,
) -> Result<Vec<Task>, ConstraintOperationError> {
    if num_resources == 0 {
        return Err(ConstraintOperationError::NoResourceDimensions);
    }

    arg_tasks
        .iter()
        .enumerate()
        .map(|(index, arg_task)| {
            if arg_task.resource_usages.len() != num_resources {
                return Err(ConstraintOperationError::InvalidResourceDimension {
                    task: index,
                    provided: arg_task.resource_usages.len(),
                    expected: num_resources,
                });
            }

            Ok(Task {
                start_variable: arg_task.start_time,
                duration_variable: arg_task.duration,
                end_variable: arg_task.end_time,
                resource_usages: arg_task.resource_usages.clone().into_boxed_slice(),
                index,
            })
        })
        .collect()
}

/// Registers every variable of the constraint; task `i` uses the local ids
/// `[i * k, (i + 1) * k)` (start, duration, end and then the heights) with
/// `k = 3 + num_resources`, and capacity `r` uses `n * k + r`.
pub(crate) fn register_tasks(
    tasks: &[Task],
    capacities: &[DomainId],
    context: &mut PropagatorConstructorContext<'_>,
) {
    let per_task = local_ids_per_task(capacities.len());
    for task in tasks.iter() {
        let first_id = task.index as u32 * per_task;
        for (offset, variable) in task.variables().enumerate() {
            context.register(variable, LocalId::from(first_id + offset as u32));
        }
    }

    let first_capacity_id = tasks.len() as u32 * per_task;
    for (resource, &capacity) in capacities.iter().enumerate() {
        context.register(capacity, LocalId::from(first_capacity_id + resource as u32));
    }
}

/// Enforces `start + duration = end` together with `duration >= 0` and `height >= 0` on the
/// bounds of `task` until none of its bounds change anymore.
///
/// An empty domain is reported as a [`PropagatorConflict::TaskBoundsEmpty`] which names the task.
pub(crate) fn narrow_task_bounds(
    context: &mut PropagationContextMut,
    task: &Task,
) -> PropagationStatusCP {
    narrow(context, task).map_err(|empty_domain| {
        debug!("narrowing emptied the domain of {} (task {})", empty_domain.domain, task.index);
        Inconsistency::Conflict(PropagatorConflict::TaskBoundsEmpty {
            task: task.index,
            variable: empty_domain.domain,
        })
    })
}

fn narrow(context: &mut PropagationContextMut, task: &Task) -> Result<(), EmptyDomain> {
    for height in task.resource_usages.iter() {
        context.set_lower_bound(height, 0)?;
    }
    context.set_lower_bound(&task.duration_variable, 0)?;

    loop {
        let before = task_bounds(context, task);

        let (s_min, s_max) = bounds(context, &task.start_variable);
        let (d_min, d_max) = bounds(context, &task.duration_variable);
        let (e_min, e_max) = bounds(context, &task.end_variable);

        context.set_lower_bound(&task.end_variable, s_min.saturating_add(d_min))?;
        context.set_upper_bound(&task.end_variable, s_max.saturating_add(d_max))?;

        let (e_min, e_max) = (
            e_min.max(s_min.saturating_add(d_min)),
            e_max.min(s_max.saturating_add(d_max)),
        );
        context.set_lower_bound(&task.start_variable, e_min.saturating_sub(d_max))?;
        context.set_upper_bound(&task.start_variable, e_max.saturating_sub(d_min))?;

        let (s_min, s_max) = bounds(context, &task.start_variable);
        context.set_lower_bound(&task.duration_variable, e_min.saturating_sub(s_max))?;
        context.set_upper_bound(&task.duration_variable, e_max.saturating_sub(s_min))?;

        if task_bounds(context, task) == before {
            return Ok(());
        }
    }
}

fn bounds(context: &PropagationContextMut, variable: &DomainId) -> (i32, i32) {
    (context.lower_bound(variable), context.upper_bound(variable))
}

fn task_bounds(context: &PropagationContextMut, task: &Task) -> [(i32, i32); 3] {
    [
        bounds(context, &task.start_variable),
        bounds(context, &task.duration_variable),
        bounds(context, &task.end_variable),
    ]
}

/// Returns whether the bounds of `a` and `b` allow them to execute at the same time, i.e. the
/// bounds do not prove `s_a⁻ >= e_b⁺` or `s_b⁻ >= e_a⁺`.
pub(crate) fn can_overlap(context: &impl ReadDomains, a: &Task, b: &Task) -> bool {
    a.earliest_start(context) < b.latest_end(context)
        && b.earliest_start(context) < a.latest_end(context)
}

/// Fails if a task which certainly has a positive duration is higher than the capacity of one
/// of the resources.
pub(crate) fn check_heights<'a>(
    context: &impl ReadDomains,
    parameters: &CumulativeSweepParameters,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> PropagationStatusCP {
    for task in tasks {
        if task.min_duration(context) == 0 {
            continue;
        }
        for (resource, capacity) in parameters.capacities.iter().enumerate() {
            if task.min_height(context, resource) > context.upper_bound(capacity) {
                debug!("task {} is higher than the capacity of resource {resource}", task.index);
                return Err(PropagatorConflict::HeightExceedsCapacity {
                    task: task.index,
                    resource,
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Raises the lower-bound of the capacity of `resource` to `load`, the mandatory resource usage
/// found at some time point.
pub(crate) fn raise_capacity(
    context: &mut PropagationContextMut,
    parameters: &CumulativeSweepParameters,
    resource: usize,
    load: i64,
) -> Result<(), EmptyDomain> {
    let capacity = &parameters.capacities[resource];
    if load > context.lower_bound(capacity) as i64 {
        let load = i32::try_from(load).unwrap_or(i32::MAX);
        context.set_lower_bound(capacity, load)?;
    }
    Ok(())
}
