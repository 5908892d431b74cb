//! Destination planner.
//!
//! Builds the target path for a processed file. Watchlist issues are
//! renamed from a `$Placeholder` template into their series directory;
//! one-off, multi-volume and story-arc downloads keep their name and go to
//! the grab-bag or a story-arc directory.
//!
//! Placeholders: `$Series`, `$series`, `$Issue`, `$Year`, `$Publisher`,
//! `$publisher`, `$VolumeY`, `$VolumeN`.

mod config;
#[allow(clippy::module_inception)]
mod planner;
mod template;
mod types;

pub use config::{LibraryConfig, NamingConfig};
pub use planner::{reading_order_prefix, DestinationPlanner, STORY_ARCS_DIR};
pub use template::{ascii_series_name, render_template, strip_volume_placeholder, TemplateValues};
pub use types::Destination;
