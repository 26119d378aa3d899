use super::event_heap::Ascending;
use super::event_heap::Descending;
use super::event_heap::EventHeap;
use super::event_heap::HeapOrder;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::ReadDomains;
use crate::engine::EmptyDomain;
use crate::propagators::cumulative::utils::Task;

/// The event heaps of both directions; they are kept between calls to avoid reallocation.
#[derive(Clone, Debug)]
pub(crate) struct EventHeaps {
    ascending: EventHeap<Ascending>,
    descending: EventHeap<Descending>,
}

impl EventHeaps {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        EventHeaps {
            ascending: EventHeap::with_capacity(capacity),
            descending: EventHeap::with_capacity(capacity),
        }
    }
}

/// Describes one of the two mirrored sweeps.
///
/// The release is the bound which the sweep tightens. In the time order of the sweep, the
/// compulsory part of a task runs from [`SweepDirection::compulsory_start`] to
/// [`SweepDirection::compulsory_end`], and a task released at `r` occupies the resource until at
/// least `shift(r, duration)`.
pub(crate) trait SweepDirection {
    type Order: HeapOrder;

    const NAME: &'static str;

    fn event_heap(heaps: &mut EventHeaps) -> &mut EventHeap<Self::Order>;

    fn release(context: &impl ReadDomains, task: &Task) -> i32;

    fn compulsory_start(context: &impl ReadDomains, task: &Task) -> i32;

    fn compulsory_end(context: &impl ReadDomains, task: &Task) -> i32;

    fn shift(date: i32, duration: i32) -> i32;

    /// The time point whose resource usage is described by the free capacity after all events
    /// at `date` have been processed.
    fn cell(date: i32) -> i32;

    fn update_release(
        context: &mut PropagationContextMut,
        task: &Task,
        release: i32,
    ) -> Result<(), EmptyDomain>;

    fn precedes(date: i32, other: i32) -> bool {
        Self::Order::precedes(date, other)
    }

    /// The date which comes last in the order of the sweep.
    fn later(date: i32, other: i32) -> i32 {
        if Self::precedes(date, other) {
            other
        } else {
            date
        }
    }
}

/// Sweeps from left to right and tightens the earliest start times.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EarliestStart;

impl SweepDirection for EarliestStart {
    type Order = Ascending;

    const NAME: &'static str = "earliest start";

    fn event_heap(heaps: &mut EventHeaps) -> &mut EventHeap<Ascending> {
        &mut heaps.ascending
    }

    fn release(context: &impl ReadDomains, task: &Task) -> i32 {
        task.earliest_start(context)
    }

    fn compulsory_start(context: &impl ReadDomains, task: &Task) -> i32 {
        task.latest_start(context)
    }

    fn compulsory_end(context: &impl ReadDomains, task: &Task) -> i32 {
        task.earliest_end(context)
    }

    fn shift(date: i32, duration: i32) -> i32 {
        date.saturating_add(duration)
    }

    fn cell(date: i32) -> i32 {
        date
    }

    fn update_release(
        context: &mut PropagationContextMut,
        task: &Task,
        release: i32,
    ) -> Result<(), EmptyDomain> {
        context.set_lower_bound(&task.start_variable, release)
    }
}

/// Sweeps from right to left and tightens the latest end times.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LatestEnd;

impl SweepDirection for LatestEnd {
    type Order = Descending;

    const NAME: &'static str = "latest end";

    fn event_heap(heaps: &mut EventHeaps) -> &mut EventHeap<Descending> {
        &mut heaps.descending
    }

    fn release(context: &impl ReadDomains, task: &Task) -> i32 {
        task.latest_end(context)
    }

    fn compulsory_start(context: &impl ReadDomains, task: &Task) -> i32 {
        task.earliest_end(context)
    }

    fn compulsory_end(context: &impl ReadDomains, task: &Task) -> i32 {
        task.latest_start(context)
    }

    fn shift(date: i32, duration: i32) -> i32 {
        date.saturating_sub(duration)
    }

    fn cell(date: i32) -> i32 {
        date.saturating_sub(1)
    }

    fn update_release(
        context: &mut PropagationContextMut,
        task: &Task,
        release: i32,
    ) -> Result<(), EmptyDomain> {
        context.set_upper_bound(&task.end_variable, release)
    }
}
