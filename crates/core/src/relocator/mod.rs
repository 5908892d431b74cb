//! Relocator module for moving processed files into the library.
//!
//! A relocation is three steps, in order:
//!
//! - rename the file next to where it is,
//! - move it into the destination directory (created first, with parents),
//! - optionally remove the download folder.
//!
//! The first failing step aborts the relocation. There is no rollback, so a
//! file renamed but not moved stays renamed.
//!
//! # Example
//!
//! ```ignore
//! use shortbox_core::relocator::{FsRelocator, Relocator, RelocationJob};
//!
//! let relocator = FsRelocator::with_defaults();
//! let job = RelocationJob::new(source, destination).with_cleanup(download_folder);
//! let result = relocator.relocate(job).await?;
//! println!("Moved to {}", result.final_path.display());
//! ```

mod config;
mod error;
mod fs_relocator;
mod traits;
mod types;

pub use config::RelocatorConfig;
pub use error::RelocateError;
pub use fs_relocator::FsRelocator;
pub use traits::Relocator;
pub use types::{RelocationJob, RelocationResult};
