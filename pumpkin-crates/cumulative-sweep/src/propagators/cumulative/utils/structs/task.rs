use crate::engine::propagation::ReadDomains;
use crate::engine::variables::DomainId;

/// A task which is passed as argument to the cumulative constraint.
///
/// The variables are linked by `start_time + duration = end_time`; `resource_usages[r]` is the
/// height of the task on resource dimension `r`.
#[derive(Clone, Debug)]
pub struct ArgTask {
    pub start_time: DomainId,
    pub duration: DomainId,
    pub end_time: DomainId,
    pub resource_usages: Vec<DomainId>,
}

/// A task as it is stored by the propagator; `index` is its position in the list of tasks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Task {
    pub(crate) start_variable: DomainId,
    pub(crate) duration_variable: DomainId,
    pub(crate) end_variable: DomainId,
    pub(crate) resource_usages: Box<[DomainId]>,
    pub(crate) index: usize,
}

impl Task {
    pub(crate) fn earliest_start(&self, context: &impl ReadDomains) -> i32 {
        context.lower_bound(&self.start_variable)
    }

    pub(crate) fn latest_start(&self, context: &impl ReadDomains) -> i32 {
        context.upper_bound(&self.start_variable)
    }

    pub(crate) fn earliest_end(&self, context: &impl ReadDomains) -> i32 {
        context.lower_bound(&self.end_variable)
    }

    pub(crate) fn latest_end(&self, context: &impl ReadDomains) -> i32 {
        context.upper_bound(&self.end_variable)
    }

    pub(crate) fn min_duration(&self, context: &impl ReadDomains) -> i32 {
        context.lower_bound(&self.duration_variable)
    }

    pub(crate) fn min_height(&self, context: &impl ReadDomains, resource: usize) -> i32 {
        context.lower_bound(&self.resource_usages[resource])
    }

    /// The interval `[s⁺, e⁻)` in which the task certainly executes, if it is non-empty.
    pub(crate) fn compulsory_part(&self, context: &impl ReadDomains) -> Option<(i32, i32)> {
        let start = self.latest_start(context);
        let end = self.earliest_end(context);
        (start < end).then_some((start, end))
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        [self.start_variable, self.duration_variable, self.end_variable]
            .into_iter()
            .chain(self.resource_usages.iter().copied())
    }
}
