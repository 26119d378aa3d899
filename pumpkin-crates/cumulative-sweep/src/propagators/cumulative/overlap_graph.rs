//! The overlap graph: an undirected graph over the tasks in which an edge `(i, j)` denotes that
//! the bounds of `i` and `j` do not (yet) prove that they cannot execute at the same time.
//!
//! The neighbourhood of every task is a [`ReversibleSparseSet`], so removed edges are restored
//! automatically on backtracking. A full rebuild reorders the sets in a way that cannot be undone
//! by the trail; synchronising to a checkpoint before the last rebuild therefore invalidates the
//! graph, and it is rebuilt on the next call.
use itertools::Itertools;
use log::debug;

use super::utils::util::can_overlap;
use super::utils::util::narrow_task_bounds;
use super::utils::ReversibleSparseSet;
use super::utils::Task;
use crate::basic_types::Inconsistency;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagatorConstructorContext;
use crate::engine::propagation::ReadDomains;
use crate::pumpkin_assert_extreme;
use crate::pumpkin_assert_moderate;

#[derive(Clone, Debug)]
pub(crate) struct OverlapGraph {
    neighbours: Vec<ReversibleSparseSet>,
    /// The checkpoint at which the graph was last rebuilt; [`None`] if the graph is invalid
    rebuilt_at_checkpoint: Option<usize>,
    /// Marks tasks which are part of the neighbourhood that is currently being collected
    in_neighbourhood: Vec<bool>,
}

impl OverlapGraph {
    pub(crate) fn new(num_tasks: usize, context: &mut PropagatorConstructorContext<'_>) -> Self {
        OverlapGraph {
            neighbours: (0..num_tasks)
                .map(|_| ReversibleSparseSet::new(num_tasks, context.new_trailed_integer(0)))
                .collect(),
            rebuilt_at_checkpoint: None,
            in_neighbourhood: vec![false; num_tasks],
        }
    }

    /// Returns whether the graph needs a [`OverlapGraph::full_rebuild`] before it can be used.
    pub(crate) fn is_invalid(&self) -> bool {
        self.rebuilt_at_checkpoint.is_none()
    }

    /// Invalidates the graph if the backtrack to `checkpoint` undoes the last rebuild.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        if self
            .rebuilt_at_checkpoint
            .is_some_and(|rebuilt_at| checkpoint < rebuilt_at)
        {
            self.rebuilt_at_checkpoint = None;
        }
    }

    /// Recomputes the neighbourhood of every task by testing every pair of tasks.
    ///
    /// Returns the number of edges.
    pub(crate) fn full_rebuild(
        &mut self,
        context: &mut PropagationContextMut,
        tasks: &[Task],
    ) -> usize {
        let mut adjacent = vec![Vec::new(); tasks.len()];
        let mut num_edges = 0;
        for (a, b) in tasks.iter().tuple_combinations() {
            if can_overlap(context, a, b) {
                adjacent[a.index].push(b.index);
                adjacent[b.index].push(a.index);
                num_edges += 1;
            }
        }

        for (set, members) in self.neighbours.iter_mut().zip(adjacent.iter()) {
            set.assign_members(context, members);
        }
        self.rebuilt_at_checkpoint = Some(context.get_checkpoint());

        debug!("rebuilt overlap graph over {} tasks with {num_edges} edges", tasks.len());
        pumpkin_assert_moderate!(self.num_edges(context) == num_edges);
        pumpkin_assert_extreme!(self.debug_is_symmetric(context));
        num_edges
    }

    /// Narrows the bounds of every dirty task and removes the edges of the dirty tasks which the
    /// new bounds prove to be disjoint.
    ///
    /// Returns the number of removed edges.
    pub(crate) fn incremental_update(
        &mut self,
        context: &mut PropagationContextMut,
        tasks: &[Task],
        dirty: &[usize],
    ) -> Result<usize, Inconsistency> {
        for &task in dirty {
            narrow_task_bounds(context, &tasks[task])?;
        }

        let mut num_removed = 0;
        for &task in dirty {
            num_removed += self.prune(context, tasks, task);
        }
        pumpkin_assert_extreme!(self.debug_is_symmetric(context));
        Ok(num_removed)
    }

    /// Removes every edge of `task` to a task it can no longer overlap with.
    fn prune(&mut self, context: &mut PropagationContextMut, tasks: &[Task], task: usize) -> usize {
        let disjoint = self
            .neighbours(context, task)
            .filter(|&other| !can_overlap(context, &tasks[task], &tasks[other]))
            .collect::<Vec<_>>();

        for &other in disjoint.iter() {
            let _ = self.neighbours[task].remove(context, other);
            let _ = self.neighbours[other].remove(context, task);
        }
        disjoint.len()
    }

    pub(crate) fn neighbours<'a>(
        &'a self,
        context: &impl ReadDomains,
        task: usize,
    ) -> impl Iterator<Item = usize> + 'a {
        self.neighbours[task].iter(context)
    }

    pub(crate) fn has_edge(&self, context: &impl ReadDomains, a: usize, b: usize) -> bool {
        self.neighbours[a].contains(context, b)
    }

    pub(crate) fn num_edges(&self, context: &impl ReadDomains) -> usize {
        self.neighbours
            .iter()
            .map(|set| set.len(context))
            .sum::<usize>()
            / 2
    }

    /// Collects the tasks within distance two of a task in `seeds` (including the seeds) into
    /// `subset`, in increasing order of index.
    pub(crate) fn two_hop_neighbourhood(
        &mut self,
        context: &impl ReadDomains,
        seeds: impl IntoIterator<Item = usize>,
        subset: &mut Vec<usize>,
    ) {
        subset.clear();
        for seed in seeds {
            let _ = Self::mark(&mut self.in_neighbourhood, subset, seed);
        }

        let num_seeds = subset.len();
        for position in 0..num_seeds {
            for neighbour in self.neighbours[subset[position]].iter(context) {
                let _ = Self::mark(&mut self.in_neighbourhood, subset, neighbour);
            }
        }

        let num_first_hop = subset.len();
        for position in num_seeds..num_first_hop {
            for neighbour in self.neighbours[subset[position]].iter(context) {
                let _ = Self::mark(&mut self.in_neighbourhood, subset, neighbour);
            }
        }

        for &task in subset.iter() {
            self.in_neighbourhood[task] = false;
        }
        subset.sort_unstable();
    }

    fn mark(in_neighbourhood: &mut [bool], subset: &mut Vec<usize>, task: usize) -> bool {
        if in_neighbourhood[task] {
            return false;
        }
        in_neighbourhood[task] = true;
        subset.push(task);
        true
    }

    fn debug_is_symmetric(&self, context: &impl ReadDomains) -> bool {
        (0..self.neighbours.len()).all(|a| {
            self.neighbours[a]
                .iter(context)
                .all(|b| a != b && self.has_edge(context, b, a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::KeyedVec;
    use crate::engine::propagation::PropagatorId;
    use crate::engine::Assignments;
    use crate::engine::TrailedValues;

    #[derive(Default)]
    struct Harness {
        assignments: Assignments,
        trailed_values: TrailedValues,
        tasks: Vec<Task>,
    }

    impl Harness {
        fn add_task(&mut self, start: (i32, i32), duration: i32) -> usize {
            let index = self.tasks.len();
            self.tasks.push(Task {
                start_variable: self.assignments.grow(start.0, start.1),
                duration_variable: self.assignments.grow(duration, duration),
                end_variable: self.assignments.grow(start.0 + duration, start.1 + duration),
                resource_usages: vec![self.assignments.grow(1, 1)].into_boxed_slice(),
                index,
            });
            index
        }

        fn graph(&mut self) -> OverlapGraph {
            let mut watchers = KeyedVec::default();
            let mut context = PropagatorConstructorContext::new(
                &mut watchers,
                &self.assignments,
                &mut self.trailed_values,
                PropagatorId(0),
            );
            OverlapGraph::new(self.tasks.len(), &mut context)
        }

        fn new_checkpoint(&mut self) {
            self.assignments.new_checkpoint();
            self.trailed_values.new_checkpoint();
        }

        fn synchronise(&mut self, checkpoint: usize) {
            self.assignments.synchronise(checkpoint);
            self.trailed_values.synchronise(checkpoint);
        }
    }

    /// Task `i` can execute in `[2i, 2i + 3)`, so it only overlaps with its direct neighbours.
    fn path(harness: &mut Harness, length: usize) {
        for i in 0..length as i32 {
            let _ = harness.add_task((2 * i, 2 * i + 2), 1);
        }
    }

    #[test]
    fn full_rebuild_connects_exactly_the_overlapping_pairs() {
        let mut harness = Harness::default();
        let _ = harness.add_task((0, 4), 3);
        let _ = harness.add_task((7, 9), 1);
        let _ = harness.add_task((5, 6), 2);
        let _ = harness.add_task((0, 0), 10);
        let _ = harness.add_task((10, 12), 2);
        let mut graph = harness.graph();

        let mut context =
            PropagationContextMut::new(&mut harness.assignments, &mut harness.trailed_values);
        let num_edges = graph.full_rebuild(&mut context, &harness.tasks);

        let mut expected_edges = 0;
        for a in harness.tasks.iter() {
            for b in harness.tasks.iter().filter(|b| b.index != a.index) {
                let expected = a.earliest_start(&context) < b.latest_end(&context)
                    && b.earliest_start(&context) < a.latest_end(&context);
                assert_eq!(expected, graph.has_edge(&context, a.index, b.index));
                if expected && a.index < b.index {
                    expected_edges += 1;
                }
            }
        }
        assert_eq!(expected_edges, num_edges);
        assert_eq!(num_edges, graph.num_edges(&context));
        assert!(!graph.is_invalid());
    }

    #[test]
    fn disjoint_windows_are_never_connected() {
        let mut harness = Harness::default();
        let _ = harness.add_task((0, 2), 2);
        let _ = harness.add_task((5, 7), 2);
        let mut graph = harness.graph();

        let mut context =
            PropagationContextMut::new(&mut harness.assignments, &mut harness.trailed_values);
        let _ = graph.full_rebuild(&mut context, &harness.tasks);

        assert!(!graph.has_edge(&context, 0, 1));
        assert_eq!(0, graph.neighbours(&context, 0).count());
    }

    #[test]
    fn incremental_update_prunes_edges_which_are_restored_on_backtrack() {
        let mut harness = Harness::default();
        let _ = harness.add_task((0, 5), 2);
        let _ = harness.add_task((3, 8), 2);
        let _ = harness.add_task((4, 6), 1);
        let mut graph = harness.graph();
        {
            let mut context =
                PropagationContextMut::new(&mut harness.assignments, &mut harness.trailed_values);
            assert_eq!(3, graph.full_rebuild(&mut context, &harness.tasks));
        }

        harness.new_checkpoint();
        {
            let mut context =
                PropagationContextMut::new(&mut harness.assignments, &mut harness.trailed_values);
            // Task 1 now starts at 7 or later, after task 0 and task 2 have ended.
            context
                .set_lower_bound(&harness.tasks[1].start_variable, 7)
                .expect("non-empty domain");
            let removed = graph
                .incremental_update(&mut context, &harness.tasks, &[1])
                .expect("no conflict");

            assert_eq!(2, removed);
            assert!(!graph.has_edge(&context, 0, 1));
            assert!(!graph.has_edge(&context, 2, 1));
            assert!(graph.has_edge(&context, 0, 2));
        }

        harness.synchronise(0);
        graph.synchronise(0);
        let context =
            PropagationContextMut::new(&mut harness.assignments, &mut harness.trailed_values);
        assert!(!graph.is_invalid());
        assert!(graph.has_edge(&context, 0, 1));
        assert!(graph.has_edge(&context, 1, 2));
        assert_eq!(3, graph.num_edges(&context));
    }

    #[test]
    fn backtracking_before_the_rebuild_invalidates_the_graph() {
        let mut harness = Harness::default();
        path(&mut harness, 3);
        let mut graph = harness.graph();

        harness.new_checkpoint();
        harness.new_checkpoint();
        {
            let mut context =
                PropagationContextMut::new(&mut harness.assignments, &mut harness.trailed_values);
            let _ = graph.full_rebuild(&mut context, &harness.tasks);
        }

        graph.synchronise(2);
        assert!(!graph.is_invalid());

        harness.synchronise(1);
        graph.synchronise(1);
        assert!(graph.is_invalid());
    }

    #[test]
    fn two_hop_neighbourhood_stops_at_distance_two() {
        let mut harness = Harness::default();
        path(&mut harness, 6);
        let mut graph = harness.graph();
        let mut context =
            PropagationContextMut::new(&mut harness.assignments, &mut harness.trailed_values);
        assert_eq!(5, graph.full_rebuild(&mut context, &harness.tasks));

        let mut subset = vec![];
        graph.two_hop_neighbourhood(&context, [0], &mut subset);
        assert_eq!(vec![0, 1, 2], subset);

        graph.two_hop_neighbourhood(&context, [3, 2], &mut subset);
        assert_eq!(vec![0, 1, 2, 3, 4, 5], subset);

        graph.two_hop_neighbourhood(&context, [5], &mut subset);
        assert_eq!(vec![3, 4, 5], subset);
    }
}
