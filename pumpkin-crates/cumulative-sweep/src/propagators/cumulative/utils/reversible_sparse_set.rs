//! A set over the dense universe `[0, n)` with O(1) removals which are undone on backtracking,
//! based on "Sparse-Sets for Domain Implementation - Le Clément et al. (2013)".
//!
//! The elements `elements[..size]` are the members of the set; only `size` is trailed. A removal
//! swaps the removed element to the end of the member prefix, so restoring the size restores the
//! set.
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::ReadDomains;
use crate::engine::TrailedInteger;
use crate::pumpkin_assert_moderate;

#[derive(Clone, Debug)]
pub(crate) struct ReversibleSparseSet {
    elements: Vec<usize>,
    /// `positions[e]` is the index of `e` in `elements`
    positions: Vec<usize>,
    size: TrailedInteger,
}

impl ReversibleSparseSet {
    /// Creates an empty set over `[0, universe)` whose size is stored in `size`.
    ///
    /// `size` should initially be 0.
    pub(crate) fn new(universe: usize, size: TrailedInteger) -> Self {
        ReversibleSparseSet {
            elements: (0..universe).collect(),
            positions: (0..universe).collect(),
            size,
        }
    }

    pub(crate) fn len(&self, context: &impl ReadDomains) -> usize {
        context.read_trailed(self.size) as usize
    }

    pub(crate) fn contains(&self, context: &impl ReadDomains, element: usize) -> bool {
        self.positions[element] < self.len(context)
    }

    pub(crate) fn iter<'a>(
        &'a self,
        context: &impl ReadDomains,
    ) -> impl Iterator<Item = usize> + 'a {
        self.elements[..self.len(context)].iter().copied()
    }

    /// Removes `element` from the set; returns whether it was a member.
    pub(crate) fn remove(&mut self, context: &mut PropagationContextMut, element: usize) -> bool {
        let size = self.len(context);
        let position = self.positions[element];
        if position >= size {
            return false;
        }

        let last = size - 1;
        self.swap(position, last);
        context.assign_trailed(self.size, last as i64);
        true
    }

    /// Replaces the members of the set by `members`.
    ///
    /// This reorders the non-trailed part of the set; it is only valid for backtracking to
    /// checkpoints which are not earlier than the current one.
    pub(crate) fn assign_members(
        &mut self,
        context: &mut PropagationContextMut,
        members: &[usize],
    ) {
        for (target, &member) in members.iter().enumerate() {
            pumpkin_assert_moderate!(member < self.elements.len());
            self.swap(self.positions[member], target);
        }
        context.assign_trailed(self.size, members.len() as i64);
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.elements.swap(i, j);
        self.positions[self.elements[i]] = i;
        self.positions[self.elements[j]] = j;
    }
}
