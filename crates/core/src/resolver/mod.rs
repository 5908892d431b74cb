//! Download resolver.
//!
//! Maps a completed download's job name to the tracking-log entry written
//! when it was grabbed, then decides once what kind of reference the tracked
//! ID is ([`IssueRef`]).
//!
//! # Example
//!
//! ```ignore
//! use shortbox_core::resolver::{DownloadResolver, ResolverConfig};
//!
//! let resolver = DownloadResolver::new(ResolverConfig::default(), catalog);
//! let resolution = resolver.resolve("Saga 005 (2020)")?;
//! if resolution.issue_ref.is_one_off_route() {
//!     // grab-bag or story-arc directory
//! }
//! ```

mod config;
mod error;
#[allow(clippy::module_inception)]
mod resolver;
mod types;

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use resolver::{normalize_download_name, DownloadResolver};
pub use types::{IssueRef, Resolution};
