//! Destination planning.

use std::path::{Path, PathBuf};

use super::config::{LibraryConfig, NamingConfig};
use super::template::{ascii_series_name, render_template, strip_volume_placeholder, TemplateValues};
use super::types::Destination;
use crate::catalog::{CatalogIssue, CatalogSeries};
use crate::resolver::IssueRef;

/// Directory under the library root that holds story-arc folders.
pub const STORY_ARCS_DIR: &str = "StoryArcs";

/// Reading-order prefix: `7` -> `"007"`, `42` -> `"042"`, `120` -> `"120"`.
pub fn reading_order_prefix(order: u32) -> String {
    match order {
        0..=9 => format!("00{order}"),
        10..=98 => format!("0{order}"),
        _ => order.to_string(),
    }
}

fn split_file_name(file_name: &str) -> (&str, String) {
    let path = Path::new(file_name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) => (stem, format!(".{}", ext.to_lowercase())),
        _ => (file_name, String::new()),
    }
}

fn dir_safe(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Computes where a file goes and what it is called.
///
/// Planning is pure: the same inputs always give the same destination.
#[derive(Debug, Clone)]
pub struct DestinationPlanner {
    library: LibraryConfig,
    naming: NamingConfig,
}

impl DestinationPlanner {
    pub fn new(library: LibraryConfig, naming: NamingConfig) -> Self {
        Self { library, naming }
    }

    pub fn library(&self) -> &LibraryConfig {
        &self.library
    }

    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Template values for a catalog issue and its pretty number.
    pub fn template_values(
        series: &CatalogSeries,
        issue: &CatalogIssue,
        pretty_issue: &str,
    ) -> TemplateValues {
        let year = issue
            .release_year()
            .map(str::to_string)
            .or_else(|| series.start_year.map(|y| y.to_string()))
            .unwrap_or_default();

        TemplateValues {
            series: ascii_series_name(&series.name),
            issue: pretty_issue.to_string(),
            year,
            publisher: series.publisher.clone(),
            volume_year: series.start_year,
            volume: series.version.clone().filter(|v| !v.trim().is_empty()),
        }
    }

    /// Renders the new file name, extension included.
    ///
    /// With renaming disabled or an empty template the original stem is
    /// kept. The extension is always lower-cased; the rest only when
    /// lower-case filenames are enabled.
    pub fn file_name(&self, values: &TemplateValues, original_file_name: &str) -> String {
        let (original_stem, extension) = split_file_name(original_file_name);

        let mut name = if !self.naming.rename_files || self.naming.file_format.trim().is_empty() {
            tracing::debug!("renaming disabled, keeping original file name");
            original_stem.to_string()
        } else {
            let format = if values.volume.is_none() {
                strip_volume_placeholder(&self.naming.file_format)
            } else {
                self.naming.file_format.clone()
            };
            let rendered = render_template(&format, values);
            if self.naming.replace_spaces {
                rendered.replace(' ', &self.naming.replace_char)
            } else {
                rendered
            }
        };

        name.retain(|c| !matches!(c, ',' | ':' | '?'));
        name = name.replace(['/', '\\'], "-");

        if self.naming.lowercase_filenames {
            name = name.to_lowercase();
        }

        format!("{name}{extension}")
    }

    /// Destination for an issue of a followed series: always inside the
    /// series' own directory.
    pub fn plan_watchlist(
        &self,
        series: &CatalogSeries,
        issue: &CatalogIssue,
        pretty_issue: &str,
        original_file_name: &str,
    ) -> Destination {
        let values = Self::template_values(series, issue, pretty_issue);
        Destination {
            directory: series.location.clone(),
            file_name: self.file_name(&values, original_file_name),
        }
    }

    /// Directory for one-off, multi-volume and story-arc downloads.
    ///
    /// Story arcs go to `StoryArcs/<arc>` when arc directories are enabled
    /// and the library root otherwise. Only one-off and multi-volume
    /// downloads use the grab-bag.
    pub fn one_off_directory(&self, issue_ref: &IssueRef) -> PathBuf {
        match issue_ref {
            IssueRef::StoryArc {
                arc_name: Some(arc),
                ..
            } if self.library.story_arc_dirs => self
                .library
                .destination_root
                .join(STORY_ARCS_DIR)
                .join(dir_safe(arc)),
            IssueRef::StoryArc { .. } => self.library.destination_root.clone(),
            _ => self
                .library
                .grab_bag_dir
                .clone()
                .unwrap_or_else(|| self.library.destination_root.clone()),
        }
    }

    /// Destination for a download routed outside the series directories.
    ///
    /// The original file name is kept, prefixed with the reading order for
    /// story arcs when that is enabled and an order is known.
    pub fn plan_one_off(
        &self,
        issue_ref: &IssueRef,
        original_file_name: &str,
        reading_order: Option<u32>,
    ) -> Destination {
        let directory = self.one_off_directory(issue_ref);

        let file_name = match (issue_ref, reading_order) {
            (IssueRef::StoryArc { .. }, Some(order)) if self.library.reading_order => {
                format!("{}-{}", reading_order_prefix(order), original_file_name)
            }
            _ => original_file_name.to_string(),
        };

        Destination {
            directory,
            file_name,
        }
    }
}
