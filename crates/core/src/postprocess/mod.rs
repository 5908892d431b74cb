//! Post-process coordinator.
//!
//! Takes a finished download (or a folder for manual reconciliation) and
//! walks it through the pipeline:
//!
//! ```text
//! Resolve -> (OneOffRoute | Normalize) -> TagMetadata? -> PlanDestination
//!         -> Relocate -> UpdateTracking -> Notify? -> Done
//! ```
//!
//! A run stops early in one of the terminal failure states
//! (`Unresolvable`, `CorruptArchive`, `MissingSourceFile`, `MoveFailed`,
//! `CleanupFailed`, `CatalogUnavailable`). Nothing is rolled back: a file
//! renamed before a failed move stays renamed.
//!
//! # Example
//!
//! ```ignore
//! use shortbox_core::postprocess::{DownloadJob, PostProcessor};
//!
//! let processor = PostProcessor::from_config(&config, catalog)?;
//! let report = processor
//!     .process_download(DownloadJob::automatic("Saga.005.2012", "/downloads/Saga.005.2012"))
//!     .await;
//! for line in report.log.lines() {
//!     println!("{}", line.message);
//! }
//! ```

mod error;
mod processor;
mod types;

pub use error::SetupError;
pub use processor::PostProcessor;
pub use types::{
    DownloadJob, JobOrigin, LogLevel, LogLine, ManualRunReport, PipelineState, PostProcessReport,
    ProcessOutcome, RunLog, MANUAL_RUN,
};
