//! Process-wide and per-thread registry instances.

pub mod global;
pub mod tls;
