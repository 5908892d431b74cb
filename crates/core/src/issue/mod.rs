//! Issue number normalization.
//!
//! Catalog issue numbers arrive as free-form strings (`"5"`, `"5.1"`,
//! `"12AU"`). This module turns them into:
//!
//! - an [`OrderKey`] used to match files against catalog rows, and
//! - a pretty string (`"005"`, `"Annual 02"`) used in file names.
//!
//! Padding is driven by a [`PaddingPolicy`] with one setting per tier
//! (`<10`, `10..100`, `>=100`).

mod normalizer;
mod types;

pub use normalizer::{issue_order_key, IssueNormalizer};
pub use types::{
    IssueKind, IssueSuffix, NormalizedIssue, OrderKey, PaddingLevel, PaddingPolicy,
};
