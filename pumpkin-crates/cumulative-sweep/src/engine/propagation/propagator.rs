use super::LocalId;
use super::PropagationContext;
use super::PropagationContextMut;
use crate::basic_types::PropagationStatusCP;
use crate::engine::DomainEvent;
use crate::statistics::StatisticLogger;

/// A propagator removes values from domains which will never be in any solution, or raises
/// explicit conflicts.
///
/// The only required functions are [`Propagator::name`], [`Propagator::propagate`] and
/// [`Propagator::debug_propagate_from_scratch`]; all other functions have default
/// implementations.
pub trait Propagator {
    /// Return the name of the propagator, this is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Propagate method that will be called during search.
    ///
    /// It should return [`Result::Ok`] if no conflict has been detected, otherwise it should
    /// return an [`Inconsistency`](crate::basic_types::Inconsistency) which describes why the
    /// current domains cannot lead to a solution.
    ///
    /// The propagator is not required to reach a fixed point; it is called again by the solver as
    /// long as it is enqueued.
    fn propagate(&mut self, context: PropagationContextMut) -> PropagationStatusCP;

    /// Called for every change to a variable that the propagator registered for, after the
    /// change happened (also for changes made by the propagator itself).
    ///
    /// The return value decides whether the propagator is enqueued. This method should only
    /// perform computationally cheap bookkeeping.
    fn notify(
        &mut self,
        _context: PropagationContext,
        _local_id: LocalId,
        _event: DomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after backtracking, allowing the propagator to update its internal data structures
    /// given the restored domains.
    fn synchronise(&mut self, _context: PropagationContext) {}

    /// Returns the priority of the propagator; propagators with a lower value are propagated
    /// first.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// A stateless propagation which does not rely on (or update) any internal data structure.
    ///
    /// It should be the simplest correct implementation; it is used to double-check the
    /// propagations and conflicts of [`Propagator::propagate`].
    fn debug_propagate_from_scratch(&self, context: PropagationContextMut) -> PropagationStatusCP;

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The priority of a propagator, used for determining the order in which propagators are called.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}
