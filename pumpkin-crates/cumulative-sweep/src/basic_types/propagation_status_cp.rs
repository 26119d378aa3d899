use thiserror::Error;

use crate::engine::variables::DomainId;
use crate::engine::EmptyDomain;

/// The result of invoking a constraint programming propagator. The propagation can either succeed
/// or identify a conflict.
pub type PropagationStatusCP = Result<(), Inconsistency>;

/// The contradiction reported to the scheduler; it is definitive for the current search node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomain),
    #[error(transparent)]
    Conflict(#[from] PropagatorConflict),
}

impl Inconsistency {
    /// Returns the [`PropagatorConflict`] if the inconsistency was detected by the logic of a
    /// propagator rather than by an empty domain.
    pub fn as_conflict(&self) -> Option<&PropagatorConflict> {
        match self {
            Inconsistency::EmptyDomain(_) => None,
            Inconsistency::Conflict(conflict) => Some(conflict),
        }
    }
}

/// A conflict stated by a propagator, carrying enough context (tasks and resources) for an
/// external explanation.
///
/// Tasks are identified by their index in the list of tasks that was provided to the constraint
/// and resources by their dimension.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropagatorConflict {
    /// Enforcing `start + duration = end` on the task emptied the domain of `variable`.
    #[error("the bounds of task {task} are inconsistent ({variable} has an empty domain)")]
    TaskBoundsEmpty { task: usize, variable: DomainId },
    /// The task has a positive duration and its height exceeds the capacity on its own.
    #[error("the height of task {task} exceeds the capacity of resource {resource}")]
    HeightExceedsCapacity { task: usize, resource: usize },
    /// The minimum energy of `tasks` does not fit in their joint time window.
    #[error(
        "the tasks {tasks:?} require {required} units of energy on resource {resource} while only {available} are available"
    )]
    EnergyOverload {
        resource: usize,
        tasks: Vec<usize>,
        required: i64,
        available: i64,
    },
    /// The compulsory parts of `tasks` all cover `time_point` and together exceed the capacity.
    #[error(
        "the compulsory parts of tasks {tasks:?} overload resource {resource} at time {time_point}"
    )]
    ResourceOverload {
        resource: usize,
        time_point: i32,
        tasks: Vec<usize>,
    },
}
