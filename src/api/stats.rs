//! Registry statistics.

use crate::util::fmt::format_bytes;

/// Aggregated statistics for one registry.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Live, tracked allocations.
    pub live_handles: usize,
    /// Bytes currently tracked.
    pub tracked_bytes: usize,
    /// High-water mark of tracked bytes.
    pub peak_tracked_bytes: usize,
    /// Registrations accepted since creation.
    pub total_registered: u64,
    /// Releases performed, whether explicit, via zero-size resize, or bulk
    /// cleanup.
    pub total_released: u64,
    /// Successful reallocations.
    pub total_resized: u64,
    /// Registrations rejected by a fixed-capacity table.
    pub rejected_registrations: u64,
}

impl RegistryStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted registrations not yet released.
    pub fn outstanding(&self) -> u64 {
        self.total_registered.saturating_sub(self.total_released)
    }
}

impl std::fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Registry Statistics:")?;
        writeln!(f, "  Live handles:  {}", self.live_handles)?;
        writeln!(f, "  Tracked bytes: {}", format_bytes(self.tracked_bytes))?;
        writeln!(f, "  Peak tracked:  {}", format_bytes(self.peak_tracked_bytes))?;
        writeln!(f, "  Registered:    {}", self.total_registered)?;
        writeln!(f, "  Released:      {}", self.total_released)?;
        writeln!(f, "  Resized:       {}", self.total_resized)?;
        writeln!(f, "  Rejected:      {}", self.rejected_registrations)?;
        Ok(())
    }
}
