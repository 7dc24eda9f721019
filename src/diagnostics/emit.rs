//! Event emission backend.
//!
//! Events go to stderr in debug builds (or with the `diagnostics`
//! feature), or through the `log` crate when that feature is enabled. A
//! global switch silences everything; tests use it to keep output clean.

use std::sync::atomic::{AtomicBool, Ordering};

use super::event::RegistryEvent;

/// Global flag to suppress event output.
static EVENTS_SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// Silence (or re-enable) all registry event output.
pub fn suppress_events(suppress: bool) {
    EVENTS_SUPPRESSED.store(suppress, Ordering::Relaxed);
}

/// Check whether event output is currently silenced.
pub fn events_suppressed() -> bool {
    EVENTS_SUPPRESSED.load(Ordering::Relaxed)
}

/// Emit one registry event.
pub(crate) fn emit(event: &RegistryEvent) {
    if events_suppressed() {
        return;
    }
    emit_impl(event);
}

#[cfg(feature = "log")]
fn emit_impl(event: &RegistryEvent) {
    match event {
        RegistryEvent::RegistrationRejected { .. } => log::warn!("{}", event),
        _ => log::debug!("{}", event),
    }
}

#[cfg(not(feature = "log"))]
fn emit_impl(event: &RegistryEvent) {
    #[cfg(any(debug_assertions, feature = "diagnostics"))]
    eprintln!("[trackalloc] {}", event);

    #[cfg(not(any(debug_assertions, feature = "diagnostics")))]
    let _ = event;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppression_toggle() {
        suppress_events(true);
        assert!(events_suppressed());
        suppress_events(false);
        assert!(!events_suppressed());
    }
}
