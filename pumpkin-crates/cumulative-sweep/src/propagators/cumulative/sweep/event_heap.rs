//! A binary heap of sweep [`Event`]s keyed by their date.
//!
//! The order of the heap is a type parameter; the earliest-start sweep extracts the smallest
//! dates first ([`Ascending`]) while the latest-end sweep extracts the largest dates first
//! ([`Descending`]).
use std::marker::PhantomData;

use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;

/// The kinds of events which occur during a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum EventKind {
    /// The (possibly extended) compulsory part of the task starts.
    StartOfCompulsoryPart,
    /// The compulsory part of the task ends; stale if the task's end has moved since the event
    /// was created.
    EndOfCompulsoryPart,
    /// The earliest moment at which the task can be placed.
    Release,
    /// The latest moment at which a task without compulsory part can be placed.
    LatestStart,
    /// From this moment on a task with a minimum duration of 0 fits anywhere by taking that
    /// duration.
    EndOfPlacementWindow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Event {
    pub(crate) date: i32,
    pub(crate) task: usize,
    pub(crate) kind: EventKind,
}

/// Determines which of two dates is extracted first from an [`EventHeap`].
pub(crate) trait HeapOrder {
    /// Returns true if `date` strictly comes before `other` in the order of the heap.
    fn precedes(date: i32, other: i32) -> bool;
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Ascending;

impl HeapOrder for Ascending {
    fn precedes(date: i32, other: i32) -> bool {
        date < other
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Descending;

impl HeapOrder for Descending {
    fn precedes(date: i32, other: i32) -> bool {
        date > other
    }
}

/// A heap with a fixed capacity; inserting beyond the capacity is a programming error.
#[derive(Clone, Debug)]
pub(crate) struct EventHeap<Order> {
    events: Vec<Event>,
    capacity: usize,
    order: PhantomData<Order>,
}

impl<Order: HeapOrder> EventHeap<Order> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        EventHeap {
            events: Vec::with_capacity(capacity),
            capacity,
            order: PhantomData,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    /// The time-complexity of this operation is O(logn)
    pub(crate) fn insert(&mut self, event: Event) {
        pumpkin_assert_simple!(
            self.events.len() < self.capacity,
            "the event heap overflowed its capacity of {}",
            self.capacity
        );
        self.events.push(event);
        self.sift_up(self.events.len() - 1);
    }

    /// Returns the date of the first event without removing it.
    pub(crate) fn peek_date(&self) -> Option<i32> {
        self.events.first().map(|event| event.date)
    }

    /// The time-complexity of this operation is O(logn)
    pub(crate) fn pop(&mut self) -> Option<Event> {
        if self.events.is_empty() {
            return None;
        }

        let last = self.events.len() - 1;
        self.events.swap(0, last);
        let event = self.events.pop();
        if !self.events.is_empty() {
            self.sift_down(0);
        }
        event
    }

    /// Removes every event at the extreme date and places them in `buffer` (which is cleared
    /// first).
    ///
    /// Returns the extreme date, or [`None`] if the heap was empty.
    pub(crate) fn pop_all_at_extreme(&mut self, buffer: &mut Vec<Event>) -> Option<i32> {
        buffer.clear();
        let date = self.peek_date()?;
        while self.peek_date() == Some(date) {
            if let Some(event) = self.pop() {
                buffer.push(event);
            }
        }
        Some(date)
    }

    fn sift_up(&mut self, position: usize) {
        if position > 0 {
            let parent_position = Self::get_parent_position(position);
            if Order::precedes(self.events[position].date, self.events[parent_position].date) {
                self.events.swap(parent_position, position);
                self.sift_up(parent_position);
            }
        }
    }

    fn sift_down(&mut self, position: usize) {
        pumpkin_assert_moderate!(position < self.events.len());

        if let Some(child_position) = self.get_preceding_child_position(position) {
            if Order::precedes(self.events[child_position].date, self.events[position].date) {
                self.events.swap(child_position, position);
                self.sift_down(child_position);
            }
        }
    }

    fn get_preceding_child_position(&self, position: usize) -> Option<usize> {
        let left_child_position = 2 * position + 1;
        let right_child_position = 2 * position + 2;

        if left_child_position >= self.events.len() {
            None
        } else if right_child_position < self.events.len()
            && Order::precedes(
                self.events[right_child_position].date,
                self.events[left_child_position].date,
            )
        {
            Some(right_child_position)
        } else {
            Some(left_child_position)
        }
    }

    fn get_parent_position(child_position: usize) -> usize {
        pumpkin_assert_moderate!(child_position > 0, "Root has no parent.");
        (child_position - 1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: i32, task: usize) -> Event {
        Event {
            date,
            task,
            kind: EventKind::Release,
        }
    }

    #[test]
    fn ascending_heap_extracts_smallest_dates_first() {
        let mut heap = EventHeap::<Ascending>::with_capacity(8);
        for (task, date) in [5, -2, 9, 0, 3, 3].into_iter().enumerate() {
            heap.insert(event(date, task));
        }

        let mut dates = vec![];
        while let Some(event) = heap.pop() {
            dates.push(event.date);
        }

        assert_eq!(vec![-2, 0, 3, 3, 5, 9], dates);
    }

    #[test]
    fn descending_heap_extracts_largest_dates_first() {
        let mut heap = EventHeap::<Descending>::with_capacity(8);
        for (task, date) in [5, -2, 9, 0, 3].into_iter().enumerate() {
            heap.insert(event(date, task));
        }

        assert_eq!(Some(9), heap.peek_date());
        let mut dates = vec![];
        while let Some(event) = heap.pop() {
            dates.push(event.date);
        }

        assert_eq!(vec![9, 5, 3, 0, -2], dates);
    }

    #[test]
    fn pop_all_at_extreme_extracts_exactly_one_date() {
        let mut heap = EventHeap::<Ascending>::with_capacity(8);
        heap.insert(event(4, 0));
        heap.insert(event(1, 1));
        heap.insert(event(4, 2));
        heap.insert(event(1, 3));
        heap.insert(event(7, 4));

        let mut buffer = vec![event(100, 100)];
        assert_eq!(Some(1), heap.pop_all_at_extreme(&mut buffer));
        let mut tasks = buffer.iter().map(|event| event.task).collect::<Vec<_>>();
        tasks.sort();
        assert_eq!(vec![1, 3], tasks);

        assert_eq!(Some(4), heap.pop_all_at_extreme(&mut buffer));
        assert_eq!(2, buffer.len());

        assert_eq!(Some(7), heap.pop_all_at_extreme(&mut buffer));
        assert_eq!(None, heap.pop_all_at_extreme(&mut buffer));
        assert!(buffer.is_empty());
        assert_eq!(None, heap.peek_date());
    }

    #[test]
    #[should_panic]
    fn inserting_beyond_capacity_panics() {
        let mut heap = EventHeap::<Ascending>::with_capacity(1);
        heap.insert(event(0, 0));
        heap.insert(event(1, 1));
    }
}
