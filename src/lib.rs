//! # trackalloc
//!
//! Thread-aware tracking of heap allocations, paired with an
//! encoding-aware substring extractor that allocates through the tracker.
//!
//! ## Features
//!
//! - Registry of live allocations: register, release, tracked
//!   reallocation, bulk cleanup, live count
//! - Opaque generation-checked handles: a released handle is inert, not
//!   dangerous
//! - Shared (mutex-guarded) and per-thread (lock-free) registry variants,
//!   plus a lazily-created process-wide instance
//! - Cross-thread release mailbox for the per-thread variant
//! - SQL-style `substring` over UTF-8 and a legacy double-byte encoding,
//!   with 1-based and negative character indexing
//! - Registry event output, statistics, optional `parking_lot` mutexes,
//!   optional buffer poisoning under the `debug` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use trackalloc::{Encoding, ResourceRegistry};
//!
//! let registry = ResourceRegistry::with_defaults();
//!
//! let greeting = "안녕하세요 세상! Hello World!";
//! let hangul = registry
//!     .substring(greeting.as_bytes(), 1, 2, Encoding::Utf8)
//!     .unwrap();
//! assert_eq!(registry.to_vec(hangul).unwrap(), "안녕".as_bytes());
//!
//! registry.cleanup_all();
//! assert_eq!(registry.count(), 0);
//! ```

pub mod api;
pub mod diagnostics;
pub mod text;

mod core;
mod registry;
mod sync;
mod util;

// Re-export the public API at the crate root for convenience
pub use api::config::{CapacityPolicy, RegistryConfig};
pub use api::registry::ResourceRegistry;
pub use api::stats::RegistryStats;

// Handles and cross-thread release scheduling
pub use registry::deferred::ReleaseMailbox;
pub use registry::table::Handle;

// Process-wide and per-thread instances
pub use crate::core::global::{global, init_global, shutdown};
pub use crate::core::tls::{local_initialized, with_local, LocalRegistry};

// Text extraction
pub use text::{char_count, char_range, substring, Encoding};

// Event output controls
pub use diagnostics::{events_suppressed, suppress_events, RegistryEvent};
