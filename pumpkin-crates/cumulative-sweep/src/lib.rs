//! Sweep-based filtering of the multi-resource cumulative constraint.
//!
//! The crate contains the [`CumulativeSweepPropagator`](propagators::cumulative::CumulativeSweepPropagator)
//! together with the solver machinery it needs: interval domains with backtracking
//! ([`engine::Assignments`]), reversible integers, the [`engine::propagation::Propagator`]
//! interface and a [`engine::TestSolver`] which schedules propagators.
//!
//! # Features
//! - `debug-checks`: Enable expensive assertions, such as the consistency of the task rings after
//!   every event batch and the symmetry of the overlap graph. Turning this on slows down
//!   propagation considerably.
//! - `clap`: Derive `clap::ValueEnum` for the propagation method so it can be selected from a
//!   command line.
pub(crate) mod basic_types;
pub mod containers;
pub mod engine;
pub mod propagators;
pub(crate) mod pumpkin_asserts;
pub mod statistics;

pub use convert_case;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagationStatusCP;
pub use crate::basic_types::PropagatorConflict;
