//! Observable registry events.
//!
//! Every mutating registry operation emits one event. Events are a
//! diagnostic aid, not a contract: the exact wording may change and
//! callers must not parse it.

mod emit;
mod event;

pub use emit::{events_suppressed, suppress_events};
pub use event::RegistryEvent;

pub(crate) use emit::emit;
