//! Configuration for the relocator module.

use serde::{Deserialize, Serialize};

/// Configuration for the file system relocator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocatorConfig {
    /// Whether to use a plain rename for the move when possible.
    #[serde(default = "default_true")]
    pub prefer_atomic_moves: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RelocatorConfig {
    fn default() -> Self {
        Self {
            prefer_atomic_moves: true,
        }
    }
}

impl RelocatorConfig {
    /// Enables or disables atomic moves.
    pub fn with_atomic_moves(mut self, enabled: bool) -> Self {
        self.prefer_atomic_moves = enabled;
        self
    }
}
