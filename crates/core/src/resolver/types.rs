//! Types for download resolution.

use serde::{Deserialize, Serialize};

use crate::catalog::TrackingLogEntry;
use crate::issue::IssueKind;

/// What a tracked issue ID refers to, decided once at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueRef {
    /// An issue of a followed series.
    Watchlist {
        series_id: String,
        issue_id: String,
        kind: IssueKind,
    },
    /// An issue grabbed for a story-arc reading list.
    StoryArc {
        /// Tracked ID with the marker removed.
        issue_arc_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        arc_name: Option<String>,
    },
    /// A multi-volume pack.
    MultiVolume { issue_id: String },
    /// A one-off download outside the watchlist.
    OneOff { issue_id: String },
}

impl IssueRef {
    /// The ID as recorded in the tracking log (markers removed).
    pub fn issue_id(&self) -> &str {
        match self {
            IssueRef::Watchlist { issue_id, .. } => issue_id,
            IssueRef::StoryArc { issue_arc_id, .. } => issue_arc_id,
            IssueRef::MultiVolume { issue_id } => issue_id,
            IssueRef::OneOff { issue_id } => issue_id,
        }
    }

    /// Whether this reference skips renaming and goes to the one-off route.
    pub fn is_one_off_route(&self) -> bool {
        !matches!(self, IssueRef::Watchlist { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueRef::Watchlist { .. } => "watchlist",
            IssueRef::StoryArc { .. } => "story_arc",
            IssueRef::MultiVolume { .. } => "multi_volume",
            IssueRef::OneOff { .. } => "one_off",
        }
    }
}

/// Result of resolving a download job name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The normalized name that matched the tracking log.
    pub download_name: String,
    /// The matched tracking-log entry.
    pub tracking: TrackingLogEntry,
    /// Regular issue or annual, from the job name.
    pub kind: IssueKind,
    pub issue_ref: IssueRef,
    /// Whether the underscore retry was needed.
    pub retried: bool,
}
