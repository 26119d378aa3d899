use thiserror::Error;

/// Errors related to adding a cumulative constraint with malformed arguments.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error(
        "task {task} has {provided} resource usages while the resource has {expected} capacities"
    )]
    InvalidResourceDimension {
        task: usize,
        provided: usize,
        expected: usize,
    },
    #[error("the resource should have at least one capacity dimension")]
    NoResourceDimensions,
}
