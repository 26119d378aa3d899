//! Contains the propagator implementations of this crate.
pub mod cumulative;
