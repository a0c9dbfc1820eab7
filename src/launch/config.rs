//! Configuration for einops operations.

use serde::{Deserialize, Serialize};

/// Configuration options for an [`Einops`](super::Einops) engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EinopsConfig {
    /// Whether parsed patterns are memoized. Ignored without `std`.
    pub use_cache: bool,
    /// Maximum number of cached patterns; 0 means unbounded.
    pub cache_capacity: usize,
    /// Whether explicit sizes for names absent from the pattern are rejected.
    pub strict_sizes: bool,
}

impl Default for EinopsConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            cache_capacity: 0,
            strict_sizes: true,
        }
    }
}

impl EinopsConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the pattern cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Bounds the number of cached patterns.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Enables or disables rejection of unused explicit sizes.
    pub fn with_strict_sizes(mut self, enabled: bool) -> Self {
        self.strict_sizes = enabled;
        self
    }

    /// Creates a config optimized for speed (cache on, lenient sizes).
    pub fn fast() -> Self {
        Self {
            use_cache: true,
            cache_capacity: 0,
            strict_sizes: false,
        }
    }

    /// Creates a config optimized for correctness (no cache, strict sizes).
    pub fn safe() -> Self {
        Self {
            use_cache: false,
            cache_capacity: 0,
            strict_sizes: true,
        }
    }
}
