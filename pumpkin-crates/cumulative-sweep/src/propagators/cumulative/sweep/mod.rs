//! The sweep filter: a sweep over the time line which maintains the free capacity of every
//! resource (the gap) based on the compulsory parts of the tasks, and pushes the release of every
//! task which does not fit past the dates at which it conflicts.
//!
//! The earliest-start sweep and the latest-end sweep are the same automaton instantiated with a
//! different [`SweepDirection`](direction::SweepDirection).
mod direction;
mod event_heap;
mod sweep_filter;
mod task_rings;

pub(crate) use sweep_filter::SweepFilter;
pub(crate) use sweep_filter::SweepOutcome;
