use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::containers::KeyedVec;
use crate::engine::propagation::HasAssignments;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which variables the propagator should be
/// notified.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator + 'static;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// Used while a [`Propagator`] is initialised; propagators use it to register for changes to
/// variables, to allocate reversible integers and to read the current bounds.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    watchers: &'a mut KeyedVec<DomainId, Vec<PropagatorVarId>>,
    assignments: &'a Assignments,
    trailed_values: &'a mut TrailedValues,
    propagator_id: PropagatorId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        watchers: &'a mut KeyedVec<DomainId, Vec<PropagatorVarId>>,
        assignments: &'a Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagatorConstructorContext {
            watchers,
            assignments,
            trailed_values,
            propagator_id,
        }
    }

    /// Subscribes the propagator to changes of `var`; [`Propagator::notify`] will be called with
    /// `local_id` whenever a bound of `var` changes.
    ///
    /// The same variable may be registered under several local ids.
    pub fn register(&mut self, var: DomainId, local_id: LocalId) {
        self.watchers.accomodate(var, Vec::new());
        self.watchers[var].push(PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        });
    }

    /// Allocates a reversible integer with the given initial value.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }

    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
