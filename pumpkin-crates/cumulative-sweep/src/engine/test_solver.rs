//! A small solver which hosts propagators; it allows setting up specific scenarios under which to
//! test the operations of a propagator, and it plays the role of the propagation scheduler.
use std::collections::VecDeque;

use log::debug;

use super::propagation::EnqueueDecision;
use super::propagation::PropagationContext;
use super::propagation::PropagationContextMut;
use super::propagation::Propagator;
use super::propagation::PropagatorConstructor;
use super::propagation::PropagatorConstructorContext;
use super::propagation::PropagatorId;
use super::propagation::PropagatorVarId;
use super::variables::DomainId;
use super::Assignments;
use super::EmptyDomain;
use super::TrailedValues;
use crate::basic_types::Inconsistency;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::statistics::StatisticLogger;

const NUM_PRIORITIES: usize = 4;

/// A container for variables and propagators.
///
/// Every change to a domain (including the changes made by propagators) is dispatched to the
/// propagators which registered for the variable; propagators which request it are enqueued and
/// propagated by [`TestSolver::propagate_until_fixed_point`].
pub struct TestSolver {
    assignments: Assignments,
    trailed_values: TrailedValues,
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    watchers: KeyedVec<DomainId, Vec<PropagatorVarId>>,
    queue: [VecDeque<PropagatorId>; NUM_PRIORITIES],
    enqueued: HashSet<PropagatorId>,
}

impl std::fmt::Debug for TestSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSolver")
            .field("assignments", &self.assignments)
            .field("trailed_values", &self.trailed_values)
            .field(
                "propagators",
                &self.propagators.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("enqueued", &self.enqueued)
            .finish()
    }
}

impl Default for TestSolver {
    fn default() -> Self {
        TestSolver {
            assignments: Assignments::default(),
            trailed_values: TrailedValues::default(),
            propagators: KeyedVec::default(),
            watchers: KeyedVec::default(),
            queue: Default::default(),
            enqueued: HashSet::default(),
        }
    }
}

impl TestSolver {
    pub fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let domain = self.assignments.grow(lower_bound, upper_bound);
        self.watchers.accomodate(domain, Vec::new());
        domain
    }

    /// Creates the propagator and propagates until no propagator is enqueued anymore.
    pub fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorId, Inconsistency>
    where
        Constructor: PropagatorConstructor,
    {
        let propagator_id = PropagatorId::create_from_index(self.propagators.len());
        let context = PropagatorConstructorContext::new(
            &mut self.watchers,
            &self.assignments,
            &mut self.trailed_values,
            propagator_id,
        );
        let propagator = constructor.create(context);
        let _ = self.propagators.push(Box::new(propagator));

        self.propagate_until_fixed_point(propagator_id)?;
        Ok(propagator_id)
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments.get_lower_bound(var)
    }

    pub fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments.get_upper_bound(var)
    }

    pub fn is_fixed(&self, var: DomainId) -> bool {
        self.assignments.is_fixed(var)
    }

    pub fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub), (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] of {var} did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    pub fn increase_lower_bound_and_notify(
        &mut self,
        propagator: PropagatorId,
        var: DomainId,
        value: i32,
    ) -> Result<EnqueueDecision, EmptyDomain> {
        let _ = self.assignments.tighten_lower_bound(var, value)?;
        Ok(self.notify_and_check(propagator))
    }

    pub fn decrease_upper_bound_and_notify(
        &mut self,
        propagator: PropagatorId,
        var: DomainId,
        value: i32,
    ) -> Result<EnqueueDecision, EmptyDomain> {
        let _ = self.assignments.tighten_upper_bound(var, value)?;
        Ok(self.notify_and_check(propagator))
    }

    pub fn set_and_notify(
        &mut self,
        propagator: PropagatorId,
        var: DomainId,
        value: i32,
    ) -> Result<EnqueueDecision, EmptyDomain> {
        let _ = self.assignments.make_assignment(var, value)?;
        Ok(self.notify_and_check(propagator))
    }

    fn notify_and_check(&mut self, propagator: PropagatorId) -> EnqueueDecision {
        self.notify_propagators();
        if self.enqueued.contains(&propagator) {
            EnqueueDecision::Enqueue
        } else {
            EnqueueDecision::Skip
        }
    }

    /// Calls [`Propagator::propagate`] once and dispatches the resulting domain events.
    pub fn propagate(&mut self, propagator: PropagatorId) -> Result<(), Inconsistency> {
        let context = PropagationContextMut::new(&mut self.assignments, &mut self.trailed_values);
        let result = self.propagators[propagator].propagate(context);
        self.handle_result(result)
    }

    /// Calls [`Propagator::debug_propagate_from_scratch`] once and dispatches the resulting
    /// domain events.
    pub fn debug_propagate_from_scratch(
        &mut self,
        propagator: PropagatorId,
    ) -> Result<(), Inconsistency> {
        let context = PropagationContextMut::new(&mut self.assignments, &mut self.trailed_values);
        let result = self.propagators[propagator].debug_propagate_from_scratch(context);
        self.handle_result(result)
    }

    /// Enqueues `propagator` and keeps propagating enqueued propagators until the queue is empty
    /// or a conflict is found.
    pub fn propagate_until_fixed_point(
        &mut self,
        propagator: PropagatorId,
    ) -> Result<(), Inconsistency> {
        self.notify_propagators();
        self.enqueue(propagator);

        while let Some(next) = self.pop_queue() {
            let context =
                PropagationContextMut::new(&mut self.assignments, &mut self.trailed_values);
            let result = self.propagators[next].propagate(context);
            self.handle_result(result)?;
        }

        Ok(())
    }

    fn handle_result(&mut self, result: Result<(), Inconsistency>) -> Result<(), Inconsistency> {
        match result {
            Ok(()) => {
                self.notify_propagators();
                Ok(())
            }
            Err(inconsistency) => {
                debug!("propagation stopped with conflict: {inconsistency}");
                let _ = self.assignments.drain_domain_events().count();
                self.clear_queue();
                Err(inconsistency)
            }
        }
    }

    fn notify_propagators(&mut self) {
        let events = self.assignments.drain_domain_events().collect::<Vec<_>>();

        for (domain, event) in events {
            for watcher in self.watchers[domain].iter() {
                let context = PropagationContext::new(&self.assignments, &self.trailed_values);
                let decision =
                    self.propagators[watcher.propagator].notify(context, watcher.variable, event);

                if decision == EnqueueDecision::Enqueue
                    && self.enqueued.insert(watcher.propagator)
                {
                    let priority = self.propagators[watcher.propagator].priority() as usize;
                    self.queue[priority].push_back(watcher.propagator);
                }
            }
        }
    }

    fn enqueue(&mut self, propagator: PropagatorId) {
        if self.enqueued.insert(propagator) {
            let priority = self.propagators[propagator].priority() as usize;
            self.queue[priority].push_back(propagator);
        }
    }

    fn pop_queue(&mut self) -> Option<PropagatorId> {
        let next = self.queue.iter_mut().find_map(|queue| queue.pop_front())?;
        let _ = self.enqueued.remove(&next);
        Some(next)
    }

    fn clear_queue(&mut self) {
        self.queue.iter_mut().for_each(VecDeque::clear);
        self.enqueued.clear();
    }

    pub fn new_checkpoint(&mut self) {
        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
    }

    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    /// Backtracks to `checkpoint` and lets every propagator synchronise with the restored
    /// domains.
    pub fn synchronise(&mut self, checkpoint: usize) {
        self.assignments.synchronise(checkpoint);
        self.trailed_values.synchronise(checkpoint);
        self.clear_queue();

        for propagator in self.propagators.iter_mut() {
            propagator.synchronise(PropagationContext::new(
                &self.assignments,
                &self.trailed_values,
            ));
        }
    }

    /// Logs the statistics of every propagator, prefixed with its name and id.
    pub fn log_statistics(&self) {
        for (propagator_id, propagator) in self.propagators.iter_enumerated() {
            propagator.log_statistics(StatisticLogger::new([
                propagator.name().to_owned(),
                propagator_id.0.to_string(),
            ]));
        }
    }
}
