use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::butternut_assert_simple;

/// A chronological record of changes, with checkpoints that allow all changes made after a given
/// checkpoint to be popped in reverse order.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where the i-th checkpoint ends (exclusive) on the trail.
    delimiters: Vec<usize>,
    entries: Vec<T>,
}

// We explicitly implement Default and not through a derive, because we want to avoid imposing
// Default on the generic type T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: Default::default(),
            delimiters: Default::default(),
            entries: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    /// Start a new checkpoint and return the checkpoint that was active before this call.
    pub(crate) fn new_checkpoint(&mut self) -> usize {
        self.current_checkpoint += 1;
        self.delimiters.push(self.entries.len());

        self.current_checkpoint - 1
    }

    pub(crate) fn current_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// Pop all entries recorded after `checkpoint`, in reverse chronological order.
    pub(crate) fn pop_to(&mut self, checkpoint: usize) -> Rev<Drain<'_, T>> {
        butternut_assert_simple!(checkpoint < self.current_checkpoint);

        let new_len = self.delimiters[checkpoint];

        self.current_checkpoint = checkpoint;
        self.delimiters.truncate(checkpoint);
        self.entries.drain(new_len..).rev()
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
