//! Registry event types.

use std::fmt;

/// One observable registry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A fresh allocation was registered.
    Registered {
        /// Address of the tracked allocation.
        addr: usize,
        /// Size of the tracked allocation in bytes.
        size: usize,
        /// Live count after the registration.
        live: usize,
    },
    /// A tracked allocation was released and its slot vacated.
    Released {
        /// Address the allocation lived at (already freed when emitted).
        addr: usize,
        /// Live count after the release.
        live: usize,
    },
    /// A tracked allocation was reallocated, in place or moved.
    Resized {
        /// Address before the reallocation.
        old_addr: usize,
        /// Address after the reallocation.
        new_addr: usize,
        /// New size in bytes.
        new_size: usize,
    },
    /// Bulk cleanup released every live allocation.
    CleanupFinished {
        /// Number of allocations released.
        released: usize,
    },
    /// A registration was rejected by a fixed-capacity table.
    RegistrationRejected {
        /// Size of the rejected registration in bytes.
        size: usize,
        /// The table's capacity ceiling.
        capacity: usize,
    },
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::Registered { addr, size, live } => {
                write!(f, "register: {:#x} ({} bytes, {} live)", addr, size, live)
            }
            RegistryEvent::Released { addr, live } => {
                write!(f, "release: {:#x} ({} live)", addr, live)
            }
            RegistryEvent::Resized {
                old_addr,
                new_addr,
                new_size,
            } => {
                write!(
                    f,
                    "resize: {:#x} -> {:#x} ({} bytes)",
                    old_addr, new_addr, new_size
                )
            }
            RegistryEvent::CleanupFinished { released } => {
                write!(f, "cleanup: released {} allocation(s)", released)
            }
            RegistryEvent::RegistrationRejected { size, capacity } => {
                write!(
                    f,
                    "rejected: {} byte registration, table at capacity {}",
                    size, capacity
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = RegistryEvent::Registered {
            addr: 0x1000,
            size: 32,
            live: 3,
        };
        assert_eq!(event.to_string(), "register: 0x1000 (32 bytes, 3 live)");

        let event = RegistryEvent::CleanupFinished { released: 2 };
        assert_eq!(event.to_string(), "cleanup: released 2 allocation(s)");
    }
}
