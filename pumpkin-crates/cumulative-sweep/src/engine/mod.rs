//! The minimal solver machinery which hosts the cumulative propagators: interval domains with
//! backtracking, reversible integers, propagation contexts and a [`TestSolver`] which plays the
//! role of the propagation scheduler.
mod assignments;
mod domain_events;
pub mod propagation;
mod test_solver;
mod trailed;
pub mod variables;

pub use assignments::Assignments;
pub use assignments::EmptyDomain;
pub use domain_events::DomainEvent;
pub use test_solver::TestSolver;
pub use trailed::TrailedInteger;
pub use trailed::TrailedValues;
