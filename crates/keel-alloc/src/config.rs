//! Arena configuration parameters.

use keel_core::AllocError;

use crate::MAX_ALIGN;

/// Configuration for [`BumpAllocator`](crate::BumpAllocator).
///
/// Validated when the arena is created; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Alignment, in bytes, of every block the arena hands out.
    ///
    /// Default: 16. Must be a non-zero power of two.
    pub alignment: usize,
}

impl ArenaConfig {
    /// Default block alignment.
    pub const DEFAULT_ALIGNMENT: usize = MAX_ALIGN;

    /// Create a config with the default alignment.
    pub fn new() -> Self {
        Self {
            alignment: Self::DEFAULT_ALIGNMENT,
        }
    }

    /// Override the block alignment.
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.alignment.is_power_of_two() {
            return Err(AllocError::InvalidConfig {
                reason: format!(
                    "alignment must be a non-zero power of two, got {}",
                    self.alignment
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
