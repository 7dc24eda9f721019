//! Per-thread registries.
//!
//! Each thread owns an independent collection with no locking. The
//! thread-local destructor releases whatever the thread still tracks when
//! it exits; other threads schedule releases through the registry's
//! mailbox instead of touching the collection directly.

use std::cell::RefCell;

use crate::api::config::RegistryConfig;
use crate::api::stats::RegistryStats;
use crate::registry::deferred::ReleaseMailbox;
use crate::registry::table::{Handle, SlotTable};
use crate::text::{self, Encoding};

/// A single-owner registry without locking.
///
/// Usually reached through [`with_local`], which keeps one instance per
/// thread and drains it when the thread exits. Constructing one directly
/// is fine too; it is then released when dropped.
pub struct LocalRegistry {
    table: SlotTable,
    mailbox: ReleaseMailbox,
}

impl LocalRegistry {
    /// Create a local registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            table: SlotTable::new(config.capacity),
            mailbox: ReleaseMailbox::new(),
        }
    }

    /// Create a local registry with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RegistryConfig::default())
    }

    /// A mailbox other threads can post releases to.
    pub fn mailbox(&self) -> ReleaseMailbox {
        self.mailbox.clone()
    }

    /// Apply releases other threads have posted since the last drain.
    ///
    /// Every mutating operation drains first, so calling this explicitly
    /// is only needed to observe an up-to-date [`count`](Self::count).
    pub fn drain_mailbox(&mut self) -> usize {
        let mut drained = 0;
        while let Some(handle) = self.mailbox.take() {
            if self.table.release(handle) {
                drained += 1;
            }
        }
        drained
    }

    /// Copy `bytes` into a fresh heap allocation and track it.
    pub fn register(&mut self, bytes: &[u8]) -> Option<Handle> {
        self.drain_mailbox();
        self.table.register(bytes)
    }

    /// Release one tracked allocation. Stale handles are a no-op.
    pub fn release(&mut self, handle: Handle) {
        self.drain_mailbox();
        self.table.release(handle);
    }

    /// Reallocate a tracked allocation to `new_size` bytes, grow-or-move.
    ///
    /// Same contract as the shared registry: the returned handle replaces
    /// the one passed in, `new_size == 0` is a release, and a failed
    /// reallocation leaves the original handle valid and tracked.
    pub fn resize(&mut self, handle: Handle, new_size: usize) -> Option<Handle> {
        self.drain_mailbox();
        self.table.resize(handle, new_size)
    }

    /// Release every tracked allocation. Safe to call repeatedly.
    pub fn cleanup_all(&mut self) {
        self.drain_mailbox();
        self.table.cleanup();
    }

    /// Number of live, tracked allocations.
    pub fn count(&self) -> usize {
        self.table.live()
    }

    /// Whether `handle` still refers to a live allocation.
    pub fn contains(&self, handle: Handle) -> bool {
        self.table.get(handle).is_some()
    }

    /// Size in bytes of the allocation behind `handle`.
    pub fn size_of(&self, handle: Handle) -> Option<usize> {
        self.table.get(handle).map(|buf| buf.size())
    }

    /// Borrow the tracked bytes behind `handle`.
    pub fn bytes(&self, handle: Handle) -> Option<&[u8]> {
        self.table.get(handle).map(|buf| buf.as_slice())
    }

    /// Mutably borrow the tracked bytes behind `handle`.
    pub fn bytes_mut(&mut self, handle: Handle) -> Option<&mut [u8]> {
        self.table.get_mut(handle).map(|buf| buf.as_mut_slice())
    }

    /// Extract a substring of `source` and track the result here.
    ///
    /// See [`text::substring`](crate::text::substring) for the index
    /// semantics.
    pub fn substring(
        &mut self,
        source: &[u8],
        start: i32,
        length: i32,
        encoding: Encoding,
    ) -> Option<Handle> {
        let range = text::char_range(source, start, length, encoding)?;
        self.register(&source[range])
    }

    /// Snapshot of this registry's statistics.
    pub fn stats(&self) -> RegistryStats {
        self.table.stats()
    }
}

impl Drop for LocalRegistry {
    fn drop(&mut self) {
        self.drain_mailbox();
        self.table.cleanup();
    }
}

thread_local! {
    static LOCAL: RefCell<Option<LocalRegistry>> = const { RefCell::new(None) };
}

/// Execute a closure with the calling thread's registry.
///
/// Initializes the registry lazily on first access; it lives until the
/// thread exits, at which point everything it still tracks is released.
pub fn with_local<F, R>(f: F) -> R
where
    F: FnOnce(&mut LocalRegistry) -> R,
{
    LOCAL.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let local = borrow.get_or_insert_with(LocalRegistry::with_defaults);
        f(local)
    })
}

/// Check if the calling thread has a registry yet.
pub fn local_initialized() -> bool {
    LOCAL.with(|cell| cell.borrow().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_register_and_release() {
        let mut registry = LocalRegistry::with_defaults();

        let handle = registry.register(b"local").unwrap();
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.bytes(handle), Some(&b"local"[..]));

        registry.release(handle);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_mailbox_release_from_other_thread() {
        let mut registry = LocalRegistry::with_defaults();
        let handle = registry.register(b"cross-thread").unwrap();

        let mailbox = registry.mailbox();
        std::thread::spawn(move || mailbox.post(handle))
            .join()
            .unwrap();

        assert_eq!(registry.drain_mailbox(), 1);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_mutating_ops_drain_the_mailbox() {
        let mut registry = LocalRegistry::with_defaults();
        let doomed = registry.register(b"doomed").unwrap();

        registry.mailbox().post(doomed);

        // the next registration applies the pending release first
        registry.register(b"fresh").unwrap();
        assert_eq!(registry.count(), 1);
        assert!(!registry.contains(doomed));
    }

    #[test]
    fn test_with_local_reuses_one_instance() {
        std::thread::spawn(|| {
            assert!(!local_initialized());

            let first = with_local(|registry| registry.register(b"tls").unwrap());
            assert!(local_initialized());

            let live = with_local(|registry| {
                assert!(registry.contains(first));
                registry.count()
            });
            assert_eq!(live, 1);

            with_local(|registry| registry.cleanup_all());
            assert_eq!(with_local(|registry| registry.count()), 0);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_local_substring() {
        let mut registry = LocalRegistry::with_defaults();

        let hello = registry
            .substring("Hello World!".as_bytes(), 1, 5, Encoding::Utf8)
            .unwrap();
        assert_eq!(registry.bytes(hello), Some(&b"Hello"[..]));
    }
}
