//! Classification of tasks during a sweep.
//!
//! Every task is part of exactly one ring; a ring is a circular doubly linked list which starts
//! and ends at a sentinel node. Tasks and sentinels share a single index space: task `i` is node
//! `i`, and the sentinels of the rings are the nodes after the last task.
use crate::pumpkin_assert_advanced;
use crate::pumpkin_assert_moderate;

/// The state of a task during a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TaskState {
    /// The release of the task has not been reached yet.
    None,
    /// The current release of the task is final for this sweep.
    Ready,
    /// The task fits at its current release, but its placement window still needs to be checked
    /// against upcoming decreases of the free capacity.
    Check,
    /// The task does not fit at the current date on the given resource.
    Conflict(usize),
}

#[derive(Clone, Debug)]
pub(crate) struct TaskRings {
    num_tasks: usize,
    num_resources: usize,
    next: Vec<usize>,
    prev: Vec<usize>,
    states: Vec<TaskState>,
}

impl TaskRings {
    pub(crate) fn new(num_tasks: usize, num_resources: usize) -> Self {
        let num_nodes = num_tasks + 3 + num_resources;
        TaskRings {
            num_tasks,
            num_resources,
            next: (0..num_nodes).collect(),
            prev: (0..num_nodes).collect(),
            states: vec![TaskState::None; num_tasks],
        }
    }

    fn sentinel(&self, state: TaskState) -> usize {
        match state {
            TaskState::None => self.num_tasks,
            TaskState::Ready => self.num_tasks + 1,
            TaskState::Check => self.num_tasks + 2,
            TaskState::Conflict(resource) => {
                pumpkin_assert_moderate!(resource < self.num_resources);
                self.num_tasks + 3 + resource
            }
        }
    }

    fn is_sentinel(&self, node: usize) -> bool {
        node >= self.num_tasks
    }

    /// Empties every ring and places the tasks of `subset` in the `None` ring; tasks outside of
    /// the subset are not part of any ring.
    pub(crate) fn reset(&mut self, subset: &[usize]) {
        for node in 0..self.next.len() {
            self.next[node] = node;
            self.prev[node] = node;
        }
        self.states.fill(TaskState::None);

        let sentinel = self.sentinel(TaskState::None);
        for &task in subset {
            self.link_after(sentinel, task);
        }
    }

    pub(crate) fn state(&self, task: usize) -> TaskState {
        self.states[task]
    }

    /// Moves `task` to the front of the ring of `state`.
    ///
    /// The time-complexity of this operation is O(1)
    pub(crate) fn move_to(&mut self, task: usize, state: TaskState) {
        if self.states[task] == state {
            return;
        }
        self.unlink(task);
        let sentinel = self.sentinel(state);
        self.link_after(sentinel, task);
        self.states[task] = state;
    }

    pub(crate) fn first_of(&self, state: TaskState) -> Option<usize> {
        let sentinel = self.sentinel(state);
        let first = self.next[sentinel];
        (first != sentinel).then_some(first)
    }

    /// The task after `task` in its ring, if there is one.
    pub(crate) fn next(&self, task: usize) -> Option<usize> {
        let next = self.next[task];
        (!self.is_sentinel(next)).then_some(next)
    }

    pub(crate) fn is_empty(&self, state: TaskState) -> bool {
        self.first_of(state).is_none()
    }

    /// Iterates over the tasks in the ring of `state`; the ring should not be modified while
    /// iterating.
    pub(crate) fn iter(&self, state: TaskState) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.first_of(state), |&task| self.next(task))
    }

    fn unlink(&mut self, node: usize) {
        let (prev, next) = (self.prev[node], self.next[node]);
        self.next[prev] = next;
        self.prev[next] = prev;
        self.next[node] = node;
        self.prev[node] = node;
    }

    fn link_after(&mut self, sentinel: usize, node: usize) {
        let first = self.next[sentinel];
        self.next[node] = first;
        self.prev[node] = sentinel;
        self.prev[first] = node;
        self.next[sentinel] = node;
    }

    /// Checks that every ring is well-linked and that every task in a ring has the state of that
    /// ring.
    pub(crate) fn debug_check_consistency(&self) -> bool {
        let states = [TaskState::None, TaskState::Ready, TaskState::Check]
            .into_iter()
            .chain((0..self.num_resources).map(TaskState::Conflict));
        for state in states {
            for task in self.iter(state) {
                pumpkin_assert_advanced!(self.next[self.prev[task]] == task);
                if self.states[task] != state {
                    return false;
                }
            }
        }
        true
    }
}
