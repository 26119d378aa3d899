use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;

/// Gives access to the state which can be read by propagators.
pub trait HasAssignments {
    fn assignments(&self) -> &Assignments;
    fn trailed_values(&self) -> &TrailedValues;
}

/// Read access to the bounds of variables and to reversible integers.
pub trait ReadDomains: HasAssignments {
    fn lower_bound(&self, var: &DomainId) -> i32 {
        self.assignments().get_lower_bound(*var)
    }

    fn upper_bound(&self, var: &DomainId) -> i32 {
        self.assignments().get_upper_bound(*var)
    }

    fn is_fixed(&self, var: &DomainId) -> bool {
        self.assignments().is_fixed(*var)
    }

    fn read_trailed(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values().read(trailed_integer)
    }
}

impl<T: HasAssignments> ReadDomains for T {}

/// A read-only view on the domains; handed to propagators when they are notified or
/// synchronised.
#[derive(Clone, Copy, Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed_values: &'a TrailedValues,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        PropagationContext {
            assignments,
            trailed_values,
        }
    }

    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}

/// Handed to a propagator during propagation; next to reading the domains, it allows tightening
/// bounds and writing reversible integers.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
    ) -> Self {
        PropagationContextMut {
            assignments,
            trailed_values,
        }
    }

    pub fn reborrow(&mut self) -> PropagationContextMut<'_> {
        PropagationContextMut {
            assignments: self.assignments,
            trailed_values: self.trailed_values,
        }
    }

    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext {
            assignments: self.assignments,
            trailed_values: self.trailed_values,
        }
    }

    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    pub fn set_lower_bound(&mut self, var: &DomainId, bound: i32) -> Result<(), EmptyDomain> {
        let _ = self.assignments.tighten_lower_bound(*var, bound)?;
        Ok(())
    }

    pub fn set_upper_bound(&mut self, var: &DomainId, bound: i32) -> Result<(), EmptyDomain> {
        let _ = self.assignments.tighten_upper_bound(*var, bound)?;
        Ok(())
    }

    pub fn assign_trailed(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value)
    }
}

impl HasAssignments for PropagationContextMut<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
