//! Cross-thread release scheduling for per-thread registries.
//!
//! A thread holding a handle into another thread's registry must not touch
//! that collection directly. It posts the handle to the owner's mailbox;
//! the owning thread drains the mailbox on its next registry operation,
//! or at thread exit at the latest.

use std::sync::Arc;

use crossbeam_queue::SegQueue;

use super::table::Handle;

/// Lock-free queue of handles awaiting release by their owning thread.
#[derive(Clone)]
pub struct ReleaseMailbox {
    queue: Arc<SegQueue<Handle>>,
}

impl ReleaseMailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(SegQueue::new()),
        }
    }

    /// Schedule `handle` for release by the owning thread.
    ///
    /// Posting a stale handle is harmless; the drain skips it.
    pub fn post(&self, handle: Handle) {
        self.queue.push(handle);
    }

    /// Pop one pending handle.
    pub(crate) fn take(&self) -> Option<Handle> {
        self.queue.pop()
    }

    /// Check if there are pending releases.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get the approximate number of pending releases.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for ReleaseMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_take() {
        let mailbox = ReleaseMailbox::new();
        assert!(mailbox.is_empty());

        mailbox.post(Handle::dangling());
        assert_eq!(mailbox.len(), 1);

        assert!(mailbox.take().is_some());
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_clones_share_the_queue() {
        let mailbox = ReleaseMailbox::new();
        let other = mailbox.clone();

        other.post(Handle::dangling());
        assert!(!mailbox.is_empty());
    }
}
