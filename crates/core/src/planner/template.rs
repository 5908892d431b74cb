//! Filename template rendering.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([A-Za-z]+)").unwrap());

/// `$VolumeN` together with the decoration that only makes sense around it.
const VOLUME_DECORATIONS: [&str; 5] = [
    " - $VolumeN",
    "($VolumeN)",
    "[$VolumeN]",
    "{$VolumeN}",
    "$VolumeN",
];

/// Values substituted into a filename template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    pub series: String,
    pub issue: String,
    pub year: String,
    pub publisher: String,
    /// Series start year, rendered as `V<year>`.
    pub volume_year: Option<u16>,
    /// Series version tag.
    pub volume: Option<String>,
}

impl TemplateValues {
    fn lookup(&self, placeholder: &str) -> Option<String> {
        let value = match placeholder {
            "Series" => self.series.clone(),
            "series" => self.series.to_lowercase(),
            "Issue" => self.issue.clone(),
            "Year" => self.year.clone(),
            "Publisher" => self.publisher.clone(),
            "publisher" => self.publisher.to_lowercase(),
            "VolumeY" => self
                .volume_year
                .map(|y| format!("V{y}"))
                .unwrap_or_default(),
            "VolumeN" => self.volume.clone().unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}

/// Drops non-ASCII characters from a series name and trims it.
pub fn ascii_series_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Removes `$VolumeN` and its brackets or leading `" - "` from a template,
/// then collapses runs of whitespace.
pub fn strip_volume_placeholder(format: &str) -> String {
    let mut cleaned = format.to_string();
    for decoration in VOLUME_DECORATIONS {
        cleaned = cleaned.replace(decoration, "");
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Substitutes every known `$Placeholder`. Unknown placeholders stay as
/// written.
pub fn render_template(format: &str, values: &TemplateValues) -> String {
    PLACEHOLDER
        .replace_all(format, |caps: &Captures| {
            values
                .lookup(&caps[1])
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
