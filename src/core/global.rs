//! The process-wide shared registry.
//!
//! Constructed lazily on first use and torn down by an explicit,
//! caller-visible [`shutdown`] call; there is no implicit process-exit
//! hook.

use std::sync::OnceLock;

use crate::api::config::RegistryConfig;
use crate::api::registry::ResourceRegistry;

static GLOBAL: OnceLock<ResourceRegistry> = OnceLock::new();

/// The process-wide registry, created with the default configuration on
/// first access.
pub fn global() -> &'static ResourceRegistry {
    GLOBAL.get_or_init(ResourceRegistry::with_defaults)
}

/// Install a specifically configured process-wide registry.
///
/// Returns `false` when the registry already exists; the first caller
/// wins and later configurations are ignored.
pub fn init_global(config: RegistryConfig) -> bool {
    GLOBAL.set(ResourceRegistry::new(config)).is_ok()
}

/// Release everything the process-wide registry still tracks.
///
/// The registry stays usable afterwards. Safe to call repeatedly, and
/// before first use.
pub fn shutdown() {
    if let Some(registry) = GLOBAL.get() {
        registry.cleanup_all();
    }
}
