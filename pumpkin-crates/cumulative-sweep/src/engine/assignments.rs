use thiserror::Error;

use super::variables::DomainId;
use super::DomainEvent;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::pumpkin_assert_moderate;

/// Returned when a bound update would leave a domain without values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the domain of {domain} became empty")]
pub struct EmptyDomain {
    pub domain: DomainId,
}

/// The interval domains of all integer variables.
///
/// Every change to a domain is recorded on the trail (so that it can be undone with
/// [`Assignments::synchronise`]) and reported as a [`DomainEvent`] which the scheduler drains
/// with [`Assignments::drain_domain_events`].
#[derive(Clone, Debug, Default)]
pub struct Assignments {
    bounds: KeyedVec<DomainId, (i32, i32)>,
    trail: Trail<BoundChange>,
    events: Vec<(DomainId, DomainEvent)>,
}

#[derive(Clone, Copy, Debug)]
struct BoundChange {
    domain: DomainId,
    old_lower_bound: i32,
    old_upper_bound: i32,
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        pumpkin_assert_moderate!(
            lower_bound <= upper_bound,
            "cannot create a variable with an empty domain"
        );
        self.bounds.push((lower_bound, upper_bound))
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.bounds.len()
    }

    pub(crate) fn get_lower_bound(&self, domain: DomainId) -> i32 {
        self.bounds[domain].0
    }

    pub(crate) fn get_upper_bound(&self, domain: DomainId) -> i32 {
        self.bounds[domain].1
    }

    pub(crate) fn is_fixed(&self, domain: DomainId) -> bool {
        let (lower_bound, upper_bound) = self.bounds[domain];
        lower_bound == upper_bound
    }

    /// Raises the lower-bound of `domain` to `new_lower_bound`.
    ///
    /// Returns whether the domain changed.
    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain: DomainId,
        new_lower_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let (lower_bound, upper_bound) = self.bounds[domain];
        if new_lower_bound <= lower_bound {
            return Ok(false);
        }
        if new_lower_bound > upper_bound {
            return Err(EmptyDomain { domain });
        }

        self.record(domain, (new_lower_bound, upper_bound), DomainEvent::LowerBound);
        Ok(true)
    }

    /// Lowers the upper-bound of `domain` to `new_upper_bound`.
    ///
    /// Returns whether the domain changed.
    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain: DomainId,
        new_upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let (lower_bound, upper_bound) = self.bounds[domain];
        if new_upper_bound >= upper_bound {
            return Ok(false);
        }
        if new_upper_bound < lower_bound {
            return Err(EmptyDomain { domain });
        }

        self.record(domain, (lower_bound, new_upper_bound), DomainEvent::UpperBound);
        Ok(true)
    }

    /// Fixes `domain` to `value`.
    pub(crate) fn make_assignment(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let (lower_bound, upper_bound) = self.bounds[domain];
        if value < lower_bound || value > upper_bound {
            return Err(EmptyDomain { domain });
        }
        if lower_bound == upper_bound {
            return Ok(false);
        }

        self.record(domain, (value, value), DomainEvent::Assign);
        Ok(true)
    }

    fn record(&mut self, domain: DomainId, new_bounds: (i32, i32), event: DomainEvent) {
        let (old_lower_bound, old_upper_bound) = self.bounds[domain];
        self.trail.push(BoundChange {
            domain,
            old_lower_bound,
            old_upper_bound,
        });
        self.bounds[domain] = new_bounds;

        let event = if new_bounds.0 == new_bounds.1 {
            DomainEvent::Assign
        } else {
            event
        };
        self.events.push((domain, event));
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    /// Restores every domain to the state it had when `new_checkpoint` was created.
    ///
    /// Pending domain events are discarded.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        self.trail.synchronise(new_checkpoint).for_each(|change| {
            self.bounds[change.domain] = (change.old_lower_bound, change.old_upper_bound)
        });
        self.events.clear();
    }

    pub(crate) fn drain_domain_events(
        &mut self,
    ) -> impl Iterator<Item = (DomainId, DomainEvent)> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tightening_to_an_empty_domain_leaves_the_domain_unchanged() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 5);

        let result = assignments.tighten_lower_bound(x, 6);

        assert_eq!(Err(EmptyDomain { domain: x }), result);
        assert_eq!(0, assignments.get_lower_bound(x));
        assert_eq!(5, assignments.get_upper_bound(x));
    }

    #[test]
    fn weaker_bounds_are_ignored() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(2, 5);

        assert_eq!(Ok(false), assignments.tighten_lower_bound(x, 1));
        assert_eq!(Ok(false), assignments.tighten_upper_bound(x, 7));
        assert_eq!(0, assignments.drain_domain_events().count());
    }

    #[test]
    fn fixing_through_a_bound_is_reported_as_assignment() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(2, 5);
        let y = assignments.grow(2, 5);

        let _ = assignments.tighten_lower_bound(x, 3).expect("non-empty");
        let _ = assignments.tighten_upper_bound(y, 2).expect("non-empty");

        let events = assignments.drain_domain_events().collect::<Vec<_>>();
        assert_eq!(
            vec![(x, DomainEvent::LowerBound), (y, DomainEvent::Assign)],
            events
        );
        assert!(assignments.is_fixed(y));
    }

    #[test]
    fn synchronise_restores_bounds() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);

        assignments.new_checkpoint();
        let _ = assignments.tighten_lower_bound(x, 4).expect("non-empty");
        assignments.new_checkpoint();
        let _ = assignments.make_assignment(x, 7).expect("non-empty");

        assignments.synchronise(1);
        assert_eq!((4, 10), (assignments.get_lower_bound(x), assignments.get_upper_bound(x)));

        assignments.synchronise(0);
        assert_eq!((0, 10), (assignments.get_lower_bound(x), assignments.get_upper_bound(x)));
    }
}
