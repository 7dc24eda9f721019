//! The slot table: live allocations, their handles, and the free list.
//!
//! One table backs both registry variants. Slots carry a generation
//! counter; a handle resolves only while its generation matches, so a
//! released or resized-away handle is inert rather than dangerous.

use crate::api::config::CapacityPolicy;
use crate::api::stats::RegistryStats;
use crate::diagnostics::{self, RegistryEvent};

use super::buf::RawBuf;

/// An opaque reference to one tracked heap allocation.
///
/// Handles are created only by a registry. Releasing (or resizing) an
/// allocation makes its previous handle *stale*: every later operation
/// through a stale handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// A handle that never resolves (for default initialization).
    pub const fn dangling() -> Self {
        Self {
            index: u32::MAX,
            generation: 0,
        }
    }

    /// Check if this is the dangling sentinel.
    pub fn is_dangling(&self) -> bool {
        self.index == u32::MAX
    }

    /// Get the raw slot index (for debugging).
    pub fn raw_index(&self) -> u32 {
        self.index
    }

    /// Get the generation (for debugging).
    pub fn raw_generation(&self) -> u32 {
        self.generation
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::dangling()
    }
}

/// Internal slot for one tracked allocation.
struct Slot {
    /// The tracked buffer; `None` while the slot is vacant.
    buf: Option<RawBuf>,
    /// Bumped whenever the slot's occupant changes.
    generation: u32,
}

/// The live collection shared by both registry variants.
///
/// Not synchronized: the shared registry wraps it in a mutex, the
/// per-thread registry owns it outright.
pub(crate) struct SlotTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    policy: CapacityPolicy,
    live: usize,
    tracked_bytes: usize,
    peak_tracked_bytes: usize,
    total_registered: u64,
    total_released: u64,
    total_resized: u64,
    rejected_registrations: u64,
}

impl SlotTable {
    pub fn new(policy: CapacityPolicy) -> Self {
        Self {
            slots: Vec::with_capacity(policy.initial_slots()),
            free: Vec::new(),
            policy,
            live: 0,
            tracked_bytes: 0,
            peak_tracked_bytes: 0,
            total_registered: 0,
            total_released: 0,
            total_resized: 0,
            rejected_registrations: 0,
        }
    }

    /// Number of live, tracked allocations.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Copy `bytes` into a fresh allocation and track it.
    ///
    /// A full fixed-capacity table rejects the registration and releases
    /// nothing the caller could leak; allocator refusal likewise surfaces
    /// as `None` with the live count unchanged.
    pub fn register(&mut self, bytes: &[u8]) -> Option<Handle> {
        if let CapacityPolicy::Fixed(capacity) = self.policy {
            if self.live >= capacity {
                self.rejected_registrations += 1;
                diagnostics::emit(&RegistryEvent::RegistrationRejected {
                    size: bytes.len(),
                    capacity,
                });
                return None;
            }
        }

        let buf = RawBuf::with_copy_of(bytes)?;
        let addr = buf.addr();
        let size = buf.size();
        let handle = self.insert(buf);

        self.live += 1;
        self.tracked_bytes += size;
        if self.tracked_bytes > self.peak_tracked_bytes {
            self.peak_tracked_bytes = self.tracked_bytes;
        }
        self.total_registered += 1;

        diagnostics::emit(&RegistryEvent::Registered {
            addr,
            size,
            live: self.live,
        });
        Some(handle)
    }

    /// Place `buf` in a vacant slot, bumping its generation.
    fn insert(&mut self, buf: RawBuf) -> Handle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.buf = Some(buf);
            Handle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                buf: Some(buf),
                generation: 1,
            });
            Handle {
                index,
                generation: 1,
            }
        }
    }

    /// Resolve a handle to its buffer, or `None` if the handle is stale.
    pub fn get(&self, handle: Handle) -> Option<&RawBuf> {
        if handle.is_dangling() {
            return None;
        }
        self.slots.get(handle.index as usize).and_then(|slot| {
            if slot.generation == handle.generation {
                slot.buf.as_ref()
            } else {
                None
            }
        })
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut RawBuf> {
        if handle.is_dangling() {
            return None;
        }
        self.slots.get_mut(handle.index as usize).and_then(|slot| {
            if slot.generation == handle.generation {
                slot.buf.as_mut()
            } else {
                None
            }
        })
    }

    /// Release one tracked allocation and vacate its slot.
    ///
    /// Returns `false` (and does nothing) on a stale or dangling handle,
    /// so releasing twice is a harmless no-op.
    pub fn release(&mut self, handle: Handle) -> bool {
        if handle.is_dangling() {
            return false;
        }
        let slot = match self.slots.get_mut(handle.index as usize) {
            Some(slot) if slot.generation == handle.generation => slot,
            _ => return false,
        };
        let buf = match slot.buf.take() {
            Some(buf) => buf,
            None => return false,
        };

        let addr = buf.addr();
        self.tracked_bytes -= buf.size();
        drop(buf);

        self.free.push(handle.index);
        self.live -= 1;
        self.total_released += 1;

        diagnostics::emit(&RegistryEvent::Released {
            addr,
            live: self.live,
        });
        true
    }

    /// Grow-or-move reallocation of one tracked allocation.
    ///
    /// The returned handle replaces the one passed in, which is stale as
    /// soon as this returns. `new_size == 0` behaves exactly like
    /// [`release`](Self::release). On reallocation failure `None` is
    /// returned and the original handle stays valid and tracked.
    pub fn resize(&mut self, handle: Handle, new_size: usize) -> Option<Handle> {
        if new_size == 0 {
            self.release(handle);
            return None;
        }
        if handle.is_dangling() {
            return None;
        }

        let index = handle.index as usize;
        let slot = match self.slots.get_mut(index) {
            Some(slot) if slot.generation == handle.generation => slot,
            _ => return None,
        };
        let buf = match slot.buf.as_mut() {
            Some(buf) => buf,
            None => return None,
        };

        let old_addr = buf.addr();
        let old_size = buf.size();
        if !buf.resize(new_size) {
            return None;
        }
        let new_addr = buf.addr();

        slot.generation = slot.generation.wrapping_add(1);
        let next = Handle {
            index: handle.index,
            generation: slot.generation,
        };

        self.tracked_bytes = self.tracked_bytes - old_size + new_size;
        if self.tracked_bytes > self.peak_tracked_bytes {
            self.peak_tracked_bytes = self.tracked_bytes;
        }
        self.total_resized += 1;

        diagnostics::emit(&RegistryEvent::Resized {
            old_addr,
            new_addr,
            new_size,
        });
        Some(next)
    }

    /// Release every live allocation. Safe to call on an empty table.
    pub fn cleanup(&mut self) -> usize {
        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(buf) = slot.buf.take() {
                drop(buf);
                self.free.push(index as u32);
                released += 1;
            }
        }

        self.live = 0;
        self.tracked_bytes = 0;
        self.total_released += released as u64;

        diagnostics::emit(&RegistryEvent::CleanupFinished { released });
        released
    }

    /// Snapshot of this table's statistics.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            live_handles: self.live,
            tracked_bytes: self.tracked_bytes,
            peak_tracked_bytes: self.peak_tracked_bytes,
            total_registered: self.total_registered,
            total_released: self.total_released,
            total_resized: self.total_resized,
            rejected_registrations: self.rejected_registrations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn growable() -> SlotTable {
        SlotTable::new(CapacityPolicy::Growable { baseline: 4 })
    }

    #[test]
    fn test_register_release_live() {
        let mut table = growable();

        let a = table.register(b"first").unwrap();
        let b = table.register(b"second").unwrap();
        assert_eq!(table.live(), 2);
        assert_eq!(table.get(a).unwrap().as_slice(), b"first");

        assert!(table.release(a));
        assert_eq!(table.live(), 1);
        assert_eq!(table.get(b).unwrap().as_slice(), b"second");

        // second release through the same handle is a no-op
        assert!(!table.release(a));
        assert_eq!(table.live(), 1);
    }

    #[test]
    fn test_generation_invalidation_on_reuse() {
        let mut table = growable();

        let first = table.register(b"one").unwrap();
        table.release(first);

        let second = table.register(b"two").unwrap();

        // same slot, different generation
        assert_eq!(first.raw_index(), second.raw_index());
        assert_ne!(first.raw_generation(), second.raw_generation());

        assert!(table.get(first).is_none());
        assert_eq!(table.get(second).unwrap().as_slice(), b"two");
    }

    #[test]
    fn test_resize_replaces_handle() {
        let mut table = growable();

        let old = table.register(b"abcdef").unwrap();
        let new = table.resize(old, 3).unwrap();

        assert!(table.get(old).is_none());
        assert_eq!(table.get(new).unwrap().as_slice(), b"abc");
        assert_eq!(table.live(), 1);

        // the stale handle cannot resize either
        assert!(table.resize(old, 10).is_none());
        assert_eq!(table.live(), 1);
    }

    #[test]
    fn test_resize_to_zero_releases() {
        let mut table = growable();

        let handle = table.register(b"gone").unwrap();
        assert!(table.resize(handle, 0).is_none());
        assert_eq!(table.live(), 0);
        assert!(table.get(handle).is_none());
    }

    #[test]
    fn test_fixed_capacity_rejects() {
        let mut table = SlotTable::new(CapacityPolicy::Fixed(2));

        let a = table.register(b"a").unwrap();
        assert!(table.register(b"b").is_some());
        let c = table.register(b"c");
        assert!(c.is_none());
        assert_eq!(table.live(), 2);
        assert_eq!(table.stats().rejected_registrations, 1);

        // releasing frees a slot for the next registration
        assert!(table.release(a));
        assert!(table.register(b"d").is_some());
        assert_eq!(table.live(), 2);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mut table = growable();

        table.register(b"x").unwrap();
        table.register(b"y").unwrap();

        assert_eq!(table.cleanup(), 2);
        assert_eq!(table.live(), 0);
        assert_eq!(table.cleanup(), 0);
        assert_eq!(table.live(), 0);
    }

    #[test]
    fn test_dangling_handle_is_inert() {
        let mut table = growable();

        let dangling = Handle::dangling();
        assert!(dangling.is_dangling());
        assert!(table.get(dangling).is_none());
        assert!(!table.release(dangling));
        assert!(table.resize(dangling, 8).is_none());
    }

    #[test]
    fn test_byte_accounting() {
        let mut table = growable();

        let a = table.register(b"12345678").unwrap();
        table.register(b"1234").unwrap();
        assert_eq!(table.stats().tracked_bytes, 12);
        assert_eq!(table.stats().peak_tracked_bytes, 12);

        table.release(a);
        assert_eq!(table.stats().tracked_bytes, 4);
        assert_eq!(table.stats().peak_tracked_bytes, 12);
    }
}
