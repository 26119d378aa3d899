//! Contains the interface between propagators and the solver which hosts them.
//!
//! A propagator is created from a [`PropagatorConstructor`], which registers the variables the
//! propagator wants to be notified about (each under a [`LocalId`]). Afterwards, the solver calls
//! [`Propagator::notify`] for every changed variable and [`Propagator::propagate`] whenever the
//! propagator is enqueued.
mod constructor;
mod local_id;
mod propagation_context;
mod propagator;
mod propagator_id;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use local_id::LocalId;
pub use propagation_context::HasAssignments;
pub use propagation_context::PropagationContext;
pub use propagation_context::PropagationContextMut;
pub use propagation_context::ReadDomains;
pub use propagator::EnqueueDecision;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_id::PropagatorVarId;
