use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::pumpkin_assert_simple;

/// A stack of undo entries which is segmented by checkpoints.
///
/// Synchronising to an earlier checkpoint hands back the entries that were pushed since, most
/// recent first, so that the owner can restore its state.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// Entry `i` is the length of the trail at the moment checkpoint `i + 1` was created
    delimiters: Vec<usize>,
    entries: Vec<T>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            delimiters: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.delimiters.push(self.entries.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        pumpkin_assert_simple!(new_checkpoint < self.current_checkpoint);

        let retained = self.delimiters[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.delimiters.truncate(new_checkpoint);
        self.entries.drain(retained..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
