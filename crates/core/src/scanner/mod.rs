//! Manual reconciliation scanner.
//!
//! Walks an arbitrary folder, matches file names against every followed
//! series and turns the text after the series name into an issue number
//! with the same digit rule the catalog uses for its own rows.
//!
//! # Example
//!
//! ```ignore
//! use shortbox_core::scanner::{FsFileMatcher, ManualScanner};
//!
//! let scanner = ManualScanner::new(catalog, Arc::new(FsFileMatcher::new()));
//! let report = scanner.scan(Path::new("/downloads/unsorted"))?;
//! println!("{}", report.summary());
//! ```

mod error;
mod fs_matcher;
#[allow(clippy::module_inception)]
mod scanner;
mod tokens;
mod traits;
mod types;

pub use error::ScanError;
pub use fs_matcher::{first_archive, is_comic_archive, FsFileMatcher};
pub use scanner::ManualScanner;
pub use tokens::{find_issue_token, tokenize, IssueToken};
pub use traits::SeriesFileMatcher;
pub use types::{CandidateFile, ManualCandidate, ScanReport, SkippedFile};
