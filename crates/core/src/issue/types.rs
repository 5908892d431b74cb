//! Types for issue number normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Leading zeros prepended to one tier of issue numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddingLevel {
    /// No padding.
    #[serde(rename = "none")]
    None,
    /// One leading zero (`5` -> `05`).
    #[serde(rename = "0x")]
    SingleZero,
    /// Two leading zeros (`5` -> `005`).
    #[serde(rename = "00x")]
    DoubleZero,
}

impl PaddingLevel {
    /// The literal prefix for this level.
    pub fn prefix(self) -> &'static str {
        match self {
            PaddingLevel::None => "",
            PaddingLevel::SingleZero => "0",
            PaddingLevel::DoubleZero => "00",
        }
    }
}

/// Zero-padding settings per magnitude tier.
///
/// The tier is chosen from the integer part of the issue number only, so
/// `5.1` pads like `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingPolicy {
    /// Issues below 10.
    #[serde(default = "default_under_ten")]
    pub under_ten: PaddingLevel,
    /// Issues in `10..100`.
    #[serde(default = "default_under_hundred")]
    pub under_hundred: PaddingLevel,
    /// Issues of 100 and above.
    #[serde(default = "default_hundreds")]
    pub hundreds: PaddingLevel,
}

fn default_under_ten() -> PaddingLevel {
    PaddingLevel::DoubleZero
}

fn default_under_hundred() -> PaddingLevel {
    PaddingLevel::SingleZero
}

fn default_hundreds() -> PaddingLevel {
    PaddingLevel::None
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        Self {
            under_ten: default_under_ten(),
            under_hundred: default_under_hundred(),
            hundreds: default_hundreds(),
        }
    }
}

impl PaddingPolicy {
    /// A policy that never pads.
    pub fn unpadded() -> Self {
        Self {
            under_ten: PaddingLevel::None,
            under_hundred: PaddingLevel::None,
            hundreds: PaddingLevel::None,
        }
    }

    /// Returns the padding level for an integer issue value.
    pub fn level_for(&self, value: u32) -> PaddingLevel {
        match value {
            0..=9 => self.under_ten,
            10..=99 => self.under_hundred,
            _ => self.hundreds,
        }
    }
}

/// Whether an issue lives in the regular issues table or the annuals table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    #[default]
    Regular,
    Annual,
}

impl IssueKind {
    /// Picks the kind from a job or file name ("annual" anywhere, any case).
    pub fn from_name(name: &str) -> Self {
        if name.to_lowercase().contains("annual") {
            IssueKind::Annual
        } else {
            IssueKind::Regular
        }
    }

    pub fn is_annual(self) -> bool {
        matches!(self, IssueKind::Annual)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::Regular => "regular",
            IssueKind::Annual => "annual",
        }
    }
}

/// Alternate-universe style suffix carried by some issue numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueSuffix {
    #[serde(rename = "AU")]
    Au,
    #[serde(rename = "AI")]
    Ai,
}

impl IssueSuffix {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueSuffix::Au => "AU",
            IssueSuffix::Ai => "AI",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "au" => Some(IssueSuffix::Au),
            "ai" => Some(IssueSuffix::Ai),
            _ => None,
        }
    }
}

/// Sort/match key derived from a raw issue number.
///
/// `fraction` is the weighted fractional part: `.1` -> 10, `.12` -> 120,
/// `.10` -> 10. Two raw strings with the same key refer to the same issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderKey {
    pub whole: u32,
    pub fraction: u32,
    pub suffix: Option<IssueSuffix>,
}

impl OrderKey {
    pub fn new(whole: u32, fraction: u32) -> Self {
        Self {
            whole,
            fraction,
            suffix: None,
        }
    }

    pub fn with_suffix(mut self, suffix: IssueSuffix) -> Self {
        self.suffix = Some(suffix);
        self
    }

    /// True for anything other than issue zero.
    pub fn is_positive(&self) -> bool {
        self.whole > 0 || self.fraction > 0
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.whole)?;
        if self.fraction > 0 {
            write!(f, "+{}", self.fraction)?;
        }
        if let Some(suffix) = self.suffix {
            write!(f, "{}", suffix.as_str())?;
        }
        Ok(())
    }
}

/// Output of the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIssue {
    /// `None` when the integer part is not numeric (e.g. `"Alpha"`).
    pub order_key: Option<OrderKey>,
    /// Display form used in file names, e.g. `"005"`, `"Annual 02"`.
    pub pretty: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_tiers() {
        let policy = PaddingPolicy::default();
        assert_eq!(policy.level_for(0), PaddingLevel::DoubleZero);
        assert_eq!(policy.level_for(9), PaddingLevel::DoubleZero);
        assert_eq!(policy.level_for(10), PaddingLevel::SingleZero);
        assert_eq!(policy.level_for(99), PaddingLevel::SingleZero);
        assert_eq!(policy.level_for(100), PaddingLevel::None);
    }

    #[test]
    fn test_padding_level_serde_names() {
        let policy: PaddingPolicy = toml::from_str(
            r#"
under_ten = "0x"
under_hundred = "none"
hundreds = "00x"
"#,
        )
        .unwrap();
        assert_eq!(policy.under_ten, PaddingLevel::SingleZero);
        assert_eq!(policy.under_hundred, PaddingLevel::None);
        assert_eq!(policy.hundreds, PaddingLevel::DoubleZero);
    }

    #[test]
    fn test_issue_kind_from_name() {
        assert_eq!(IssueKind::from_name("Batman.ANNUAL.02"), IssueKind::Annual);
        assert_eq!(IssueKind::from_name("Batman.002"), IssueKind::Regular);
    }

    #[test]
    fn test_order_key_ordering() {
        let plain = OrderKey::new(5, 0);
        let decimal = OrderKey::new(5, 10);
        let au = OrderKey::new(5, 0).with_suffix(IssueSuffix::Au);
        assert!(plain < decimal);
        assert!(plain < au);
        assert!(OrderKey::new(4, 900) < plain);
        assert!(!OrderKey::new(0, 0).is_positive());
    }
}
