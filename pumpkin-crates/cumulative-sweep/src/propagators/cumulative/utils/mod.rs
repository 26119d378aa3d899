//! Utilities shared by the different parts of the cumulative propagator: the representation of
//! tasks and parameters, bound narrowing and the reversible sets of the overlap graph.
mod reversible_sparse_set;
mod structs;
pub(crate) mod util;

pub(crate) use reversible_sparse_set::ReversibleSparseSet;
pub use structs::ArgTask;
pub(crate) use structs::CumulativeSweepParameters;
pub(crate) use structs::Task;
