//! Contains the propagator for the multi-resource [Cumulative](https://sofdem.github.io/gccat/gccat/Ccumulative.html)
//! constraint based on a sweep over the compulsory parts of the tasks.
//!
//! # Theoretical
//!
//! Each task consists of the following variables:
//! - A start time `s_i`, a duration `d_i` and an end time `e_i` with `s_i + d_i = e_i`
//! - A height `h_i[r]` for every resource `r`
//!
//! Every resource `r` has a capacity `c[r]` which is a variable as well. The constraint ensures
//! that at every time point `t`, the sum of the heights of the tasks which execute at `t` (i.e.
//! `s_i <= t < e_i`) does not exceed the capacity of any of the resources.
//!
//! Oftentimes the following notation is used for the bounds of the variables:
//! - `s⁻` and `s⁺` - The earliest and latest start time of a task
//! - `e⁻` and `e⁺` - The earliest and latest end time of a task
//! - `[s⁺, e⁻)` - The compulsory part of a task; if it is non-empty, then the task executes
//!   during the entire interval regardless of where it is placed
//!
//! The propagator reasons as follows:
//! 1. The bounds of each task are narrowed using `s + d = e`.
//! 2. The energy of the tasks (`d⁻ * h⁻`) is compared to the area of their time window.
//! 3. A sweep from left to right maintains the free capacity left by the compulsory parts and
//!    pushes the earliest start of each task past the time points at which it does not fit; a
//!    sweep from right to left does the same for the latest end times. Both sweeps are repeated
//!    until neither of them tightens a bound.
//!
//! After the first call, only the tasks within two hops of a changed task in the overlap graph
//! (where an edge denotes that two tasks can still execute at the same time) are considered.
//!
//! # Practical
//!
//! ```rust
//! # use pumpkin_cumulative_sweep::engine::TestSolver;
//! # use pumpkin_cumulative_sweep::propagators::cumulative::ArgTask;
//! # use pumpkin_cumulative_sweep::propagators::cumulative::CumulativeSweepConstructor;
//! # use pumpkin_cumulative_sweep::propagators::cumulative::CumulativeSweepOptions;
//! let mut solver = TestSolver::default();
//!
//! // Two tasks with start times in [0, 3], duration 2 and height 1 on a resource with
//! // capacity 1.
//! let tasks = (0..2)
//!     .map(|_| ArgTask {
//!         start_time: solver.new_variable(0, 3),
//!         duration: solver.new_variable(2, 2),
//!         end_time: solver.new_variable(2, 5),
//!         resource_usages: vec![solver.new_variable(1, 1)],
//!     })
//!     .collect::<Vec<_>>();
//! let capacity = solver.new_variable(1, 1);
//!
//! let constructor =
//!     CumulativeSweepConstructor::new(&tasks, vec![capacity], CumulativeSweepOptions::default())
//!         .expect("every task has a single height");
//! let propagator = solver.new_propagator(constructor).expect("no conflict");
//!
//! // Fixing the first task to [1, 3) leaves only [3, 5) for the second task.
//! let _ = solver
//!     .set_and_notify(propagator, tasks[0].start_time, 1)
//!     .expect("1 is in the domain");
//! solver
//!     .propagate_until_fixed_point(propagator)
//!     .expect("no conflict");
//!
//! assert_eq!(3, solver.lower_bound(tasks[1].start_time));
//! ```
mod cumulative_sweep_propagator;
mod energy;
mod options;
mod overlap_graph;
mod sweep;
mod time_table_naive;
mod utils;

pub use cumulative_sweep_propagator::CumulativeSweepConstructor;
pub use cumulative_sweep_propagator::CumulativeSweepPropagator;
pub use cumulative_sweep_propagator::CumulativeSweepStatistics;
pub use options::CumulativeSweepOptions;
pub use options::CumulativeSweepPropagationMethod;
pub use utils::ArgTask;
