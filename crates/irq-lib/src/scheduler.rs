//! Round-robin rotation over an in-memory queue state.

use crate::model::{QueueItem, QueueState};

/// The `simple` scheduling policy: strict sequence-order rotation.
///
/// The head of the item sequence is "current". [`Self::next`] rotates the
/// head to the tail; [`Self::dismiss_current`] removes it permanently.
/// Nothing here can fail: an empty queue is modeled as `None`, never as an
/// error, and no operation reorders the sequence in any other way.
pub struct SimpleScheduler;

impl SimpleScheduler {
    /// The current item, if any. Never mutates.
    #[must_use]
    pub fn current(queue: &QueueState) -> Option<&QueueItem> {
        queue.items.first()
    }

    /// Rotate the head to the tail and return the new current item.
    ///
    /// On an empty queue this is a no-op returning `None`; `updated_at` is
    /// only bumped when a rotation actually happened. Rotating a one-item
    /// queue reorders nothing but still counts as an advance.
    pub fn next(queue: &mut QueueState) -> Option<&QueueItem> {
        if queue.items.is_empty() {
            return None;
        }

        let first = queue.items.remove(0);
        queue.items.push(first);
        queue.touch();

        Self::current(queue)
    }

    /// Remove and return the current item. The item is gone for good; it
    /// is not re-appended.
    pub fn dismiss_current(queue: &mut QueueState) -> Option<QueueItem> {
        if queue.items.is_empty() {
            return None;
        }

        let removed = queue.items.remove(0);
        queue.touch();
        Some(removed)
    }
}
