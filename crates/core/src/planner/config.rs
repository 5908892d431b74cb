//! Configuration for destination planning.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::issue::PaddingPolicy;

/// File naming settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Whether files are renamed at all.
    #[serde(default = "default_true")]
    pub rename_files: bool,

    /// Filename template, e.g. `"$Series $Issue ($Year)"`.
    #[serde(default = "default_file_format")]
    pub file_format: String,

    /// Replace spaces in the rendered name with `replace_char`.
    #[serde(default)]
    pub replace_spaces: bool,

    #[serde(default = "default_replace_char")]
    pub replace_char: String,

    /// Lower-case the final filename.
    #[serde(default)]
    pub lowercase_filenames: bool,

    /// Zero-padding tiers for issue numbers.
    #[serde(default)]
    pub padding: PaddingPolicy,
}

fn default_true() -> bool {
    true
}

fn default_file_format() -> String {
    "$Series $Issue ($Year)".to_string()
}

fn default_replace_char() -> String {
    ".".to_string()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            rename_files: true,
            file_format: default_file_format(),
            replace_spaces: false,
            replace_char: default_replace_char(),
            lowercase_filenames: false,
            padding: PaddingPolicy::default(),
        }
    }
}

impl NamingConfig {
    /// Sets the filename template.
    pub fn with_file_format(mut self, format: impl Into<String>) -> Self {
        self.file_format = format.into();
        self
    }

    /// Enables or disables renaming.
    pub fn with_rename(mut self, enabled: bool) -> Self {
        self.rename_files = enabled;
        self
    }

    /// Replaces spaces with the given character.
    pub fn with_space_replacement(mut self, replace_char: impl Into<String>) -> Self {
        self.replace_spaces = true;
        self.replace_char = replace_char.into();
        self
    }

    /// Enables lower-case filenames.
    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase_filenames = enabled;
        self
    }

    /// Sets the padding policy.
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }
}

/// Library layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Root of the comic library. Story-arc directories live under it and
    /// one-off downloads fall back to it.
    pub destination_root: PathBuf,

    /// Directory for one-off downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grab_bag_dir: Option<PathBuf>,

    /// File story-arc downloads under `StoryArcs/<arc>`.
    #[serde(default)]
    pub story_arc_dirs: bool,

    /// Prefix story-arc files with their reading order.
    #[serde(default)]
    pub reading_order: bool,

    /// Directory that replaces the folder reported by the downloader.
    /// Jobs are then looked up as `<override>/<job name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir_override: Option<PathBuf>,
}

impl LibraryConfig {
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            destination_root: destination_root.into(),
            grab_bag_dir: None,
            story_arc_dirs: false,
            reading_order: false,
            download_dir_override: None,
        }
    }

    /// Sets the one-off directory.
    pub fn with_grab_bag_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.grab_bag_dir = Some(path.into());
        self
    }

    /// Enables story-arc directories, optionally with reading-order prefixes.
    pub fn with_story_arcs(mut self, arc_dirs: bool, reading_order: bool) -> Self {
        self.story_arc_dirs = arc_dirs;
        self.reading_order = reading_order;
        self
    }

    /// Sets the download directory override.
    pub fn with_download_dir_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_dir_override = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::PaddingLevel;

    #[test]
    fn test_default_naming() {
        let config = NamingConfig::default();
        assert!(config.rename_files);
        assert_eq!(config.file_format, "$Series $Issue ($Year)");
        assert!(!config.replace_spaces);
        assert_eq!(config.padding.under_ten, PaddingLevel::DoubleZero);
    }

    #[test]
    fn test_naming_builder() {
        let config = NamingConfig::default()
            .with_file_format("$Series - $Issue")
            .with_space_replacement("_")
            .with_lowercase(true)
            .with_rename(false);

        assert_eq!(config.file_format, "$Series - $Issue");
        assert!(config.replace_spaces);
        assert_eq!(config.replace_char, "_");
        assert!(config.lowercase_filenames);
        assert!(!config.rename_files);
    }

    #[test]
    fn test_library_builder() {
        let config = LibraryConfig::new("/comics")
            .with_grab_bag_dir("/comics/one-offs")
            .with_story_arcs(true, true);

        assert_eq!(config.destination_root, PathBuf::from("/comics"));
        assert_eq!(config.grab_bag_dir, Some(PathBuf::from("/comics/one-offs")));
        assert!(config.story_arc_dirs);
        assert!(config.reading_order);
        assert!(config.download_dir_override.is_none());
    }
}
