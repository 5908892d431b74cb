//! Metadata tagging for downloaded archives.
//!
//! Tagging writes catalog metadata into the archive before it is renamed.
//! A failed run is not fatal: processing continues with the untagged file.
//! A corrupt archive is fatal and stops the run.
//!
//! # Example
//!
//! ```ignore
//! use shortbox_core::tagger::{CommandTagger, MetadataTagger, TagRequest, TaggingConfig};
//!
//! let tagger = CommandTagger::new(TaggingConfig::default().with_program("/usr/bin/comictagger"));
//! let outcome = tagger
//!     .tag(TagRequest { issue_id: "5001".into(), folder: download_dir, file: None })
//!     .await?;
//! ```

mod command;
mod config;
mod error;
mod traits;
mod types;

pub use command::CommandTagger;
pub use config::TaggingConfig;
pub use error::TaggerError;
pub use traits::MetadataTagger;
pub use types::{TagOutcome, TagRequest};
