//! The shared registry type.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::api::config::RegistryConfig;
use crate::api::stats::RegistryStats;
use crate::registry::table::{Handle, SlotTable};
use crate::sync::mutex::Mutex;
use crate::text::{self, Encoding};

/// A concurrency-safe registry of tracked heap allocations.
///
/// Cheap to clone (clones share one collection) and safe to use from any
/// thread: every mutating operation runs to completion under a single
/// lock, so operations on the same handle are totally ordered. Dropping
/// the last clone releases anything still tracked.
///
/// # Example
///
/// ```rust
/// use trackalloc::{Encoding, ResourceRegistry};
///
/// let registry = ResourceRegistry::with_defaults();
///
/// let tail = registry
///     .substring("Hello World!".as_bytes(), 7, 100, Encoding::Utf8)
///     .unwrap();
/// assert_eq!(registry.to_vec(tail).unwrap(), b"World!");
///
/// registry.release(tail);
/// assert_eq!(registry.count(), 0);
/// ```
#[derive(Clone)]
pub struct ResourceRegistry {
    inner: Arc<Shared>,
}

struct Shared {
    table: Mutex<SlotTable>,
    /// Mirror of the table's live count, kept in sync under the lock so
    /// `count()` never has to take it.
    live: AtomicUsize,
}

impl ResourceRegistry {
    /// Create a registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                table: Mutex::new(SlotTable::new(config.capacity)),
                live: AtomicUsize::new(0),
            }),
        }
    }

    /// Create a registry with the default (growable) configuration.
    pub fn with_defaults() -> Self {
        Self::new(RegistryConfig::default())
    }

    /// Copy `bytes` into a fresh heap allocation and track it.
    ///
    /// Returns `None` when a fixed-capacity table is full or the platform
    /// allocator refuses; either way nothing leaks and the live count is
    /// unchanged.
    pub fn register(&self, bytes: &[u8]) -> Option<Handle> {
        let mut table = self.inner.table.lock();
        let handle = table.register(bytes);
        self.inner.live.store(table.live(), Ordering::Release);
        handle
    }

    /// Release one tracked allocation.
    ///
    /// Stale or unknown handles are a no-op, so a double release is
    /// harmless.
    pub fn release(&self, handle: Handle) {
        let mut table = self.inner.table.lock();
        table.release(handle);
        self.inner.live.store(table.live(), Ordering::Release);
    }

    /// Reallocate a tracked allocation to `new_size` bytes, grow-or-move.
    ///
    /// The returned handle replaces the one passed in, which is stale the
    /// instant this call returns. `new_size == 0` behaves exactly like
    /// [`release`](Self::release) and returns `None`. On reallocation
    /// failure `None` is returned and the original handle stays valid and
    /// tracked. Bytes past the old size read as zero after a grow.
    pub fn resize(&self, handle: Handle, new_size: usize) -> Option<Handle> {
        let mut table = self.inner.table.lock();
        let next = table.resize(handle, new_size);
        self.inner.live.store(table.live(), Ordering::Release);
        next
    }

    /// Release every tracked allocation. Safe to call repeatedly.
    pub fn cleanup_all(&self) {
        let mut table = self.inner.table.lock();
        table.cleanup();
        self.inner.live.store(0, Ordering::Release);
    }

    /// Number of live, tracked allocations.
    pub fn count(&self) -> usize {
        self.inner.live.load(Ordering::Acquire)
    }

    /// Whether `handle` still refers to a live allocation.
    pub fn contains(&self, handle: Handle) -> bool {
        self.inner.table.lock().get(handle).is_some()
    }

    /// Size in bytes of the allocation behind `handle`.
    pub fn size_of(&self, handle: Handle) -> Option<usize> {
        self.inner.table.lock().get(handle).map(|buf| buf.size())
    }

    /// Borrow the tracked bytes behind `handle` for the duration of `f`.
    pub fn with_bytes<R>(&self, handle: Handle, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        let table = self.inner.table.lock();
        table.get(handle).map(|buf| f(buf.as_slice()))
    }

    /// Mutably borrow the tracked bytes behind `handle` for the duration
    /// of `f`.
    pub fn with_bytes_mut<R>(&self, handle: Handle, f: impl FnOnce(&mut [u8]) -> R) -> Option<R> {
        let mut table = self.inner.table.lock();
        table.get_mut(handle).map(|buf| f(buf.as_mut_slice()))
    }

    /// Copy the tracked bytes behind `handle` into a `Vec`.
    pub fn to_vec(&self, handle: Handle) -> Option<Vec<u8>> {
        self.with_bytes(handle, |bytes| bytes.to_vec())
    }

    /// Extract a substring of `source` and track the result here.
    ///
    /// See [`text::substring`](crate::text::substring) for the index
    /// semantics.
    pub fn substring(
        &self,
        source: &[u8],
        start: i32,
        length: i32,
        encoding: Encoding,
    ) -> Option<Handle> {
        text::substring(self, source, start, length, encoding)
    }

    /// Snapshot of this registry's statistics.
    pub fn stats(&self) -> RegistryStats {
        self.inner.table.lock().stats()
    }
}
