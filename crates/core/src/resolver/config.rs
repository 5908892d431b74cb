//! Configuration for download resolution.

use serde::{Deserialize, Serialize};

/// How tracked issue IDs are classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Numeric IDs at or above this value are one-off downloads.
    #[serde(default = "default_one_off_threshold")]
    pub one_off_threshold: u64,

    /// Prefix marking a story-arc issue ID.
    #[serde(default = "default_story_arc_marker")]
    pub story_arc_marker: String,
}

fn default_one_off_threshold() -> u64 {
    900_000
}

fn default_story_arc_marker() -> String {
    "S".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            one_off_threshold: default_one_off_threshold(),
            story_arc_marker: default_story_arc_marker(),
        }
    }
}

impl ResolverConfig {
    /// Sets the one-off threshold.
    pub fn with_one_off_threshold(mut self, threshold: u64) -> Self {
        self.one_off_threshold = threshold;
        self
    }
}
