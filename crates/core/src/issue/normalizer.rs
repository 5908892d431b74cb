//! Issue number parsing and pretty-printing.

use super::types::{IssueKind, IssueSuffix, NormalizedIssue, OrderKey, PaddingPolicy};

/// Fractional part of an issue number after zero trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fraction {
    digits: String,
    weight: u32,
}

/// Numeric pieces of an issue number with the suffix already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IssueParts {
    whole: u32,
    fraction: Option<Fraction>,
}

/// Splits a trailing `AU`/`AI` marker off an issue string.
///
/// Only strips when the remainder ends in a digit, so words that merely end
/// in those letters are left alone.
pub(crate) fn split_suffix(raw: &str) -> (&str, Option<IssueSuffix>) {
    let trimmed = raw.trim();
    if trimmed.len() < 3 || !trimmed.is_char_boundary(trimmed.len() - 2) {
        return (trimmed, None);
    }

    let (base, tail) = trimmed.split_at(trimmed.len() - 2);
    let Some(suffix) = IssueSuffix::parse(tail) else {
        return (trimmed, None);
    };

    let base = base.trim_end();
    if base.ends_with(|c: char| c.is_ascii_digit()) {
        (base, Some(suffix))
    } else {
        (trimmed, None)
    }
}

fn parse_parts(base: &str) -> Option<IssueParts> {
    let (whole_text, fraction_text) = match base.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (base, None),
    };

    if whole_text.is_empty() || !whole_text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole = whole_text.parse::<u32>().ok()?;

    let fraction = match fraction_text {
        Some(text) if !text.bytes().all(|b| b.is_ascii_digit()) => return None,
        Some(text) if text.bytes().any(|b| b != b'0') => {
            // One digit is scaled as-is; longer fractions lose trailing
            // zeros first. ".05" and ".5" therefore share a weight.
            let digits = if text.len() == 1 {
                text
            } else {
                text.trim_end_matches('0')
            };
            let value = digits.parse::<u32>().ok()?;
            Some(Fraction {
                digits: digits.to_string(),
                weight: value.checked_mul(10)?,
            })
        }
        _ => None,
    };

    Some(IssueParts { whole, fraction })
}

/// Derives the order key for a raw issue string.
///
/// This is the shared digit-extraction rule: the catalog indexes issues with
/// it and the manual scanner looks tokens up with it.
pub fn issue_order_key(raw: &str) -> Option<OrderKey> {
    let (base, suffix) = split_suffix(raw);
    let parts = parse_parts(base)?;
    Some(OrderKey {
        whole: parts.whole,
        fraction: parts.fraction.map_or(0, |f| f.weight),
        suffix,
    })
}

/// Turns raw catalog issue numbers into their display form.
#[derive(Debug, Clone, Default)]
pub struct IssueNormalizer {
    policy: PaddingPolicy,
}

impl IssueNormalizer {
    pub fn new(policy: PaddingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PaddingPolicy {
        &self.policy
    }

    /// Normalizes a raw issue number.
    ///
    /// Non-numeric issue numbers come back unpadded with no order key.
    pub fn normalize(&self, raw: &str, kind: IssueKind) -> NormalizedIssue {
        let (base, suffix) = split_suffix(raw);

        let (order_key, mut pretty) = match parse_parts(base) {
            Some(parts) => {
                let padding = self.policy.level_for(parts.whole).prefix();
                let number = match &parts.fraction {
                    Some(fraction) => format!("{}.{}", parts.whole, fraction.digits),
                    None => parts.whole.to_string(),
                };
                let key = OrderKey {
                    whole: parts.whole,
                    fraction: parts.fraction.as_ref().map_or(0, |f| f.weight),
                    suffix,
                };
                (Some(key), format!("{padding}{number}"))
            }
            None => {
                tracing::debug!(raw = %raw, "issue number is not numeric, leaving it unpadded");
                (None, base.to_string())
            }
        };

        if let Some(suffix) = suffix {
            pretty.push(' ');
            pretty.push_str(suffix.as_str());
        }

        if kind.is_annual() {
            pretty = format!("Annual {pretty}");
        }

        NormalizedIssue { order_key, pretty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::PaddingLevel;

    fn policy(under_ten: PaddingLevel) -> PaddingPolicy {
        PaddingPolicy {
            under_ten,
            ..PaddingPolicy::default()
        }
    }

    #[test]
    fn test_single_zero_padding() {
        let normalizer = IssueNormalizer::new(policy(PaddingLevel::SingleZero));
        let issue = normalizer.normalize("5", IssueKind::Regular);
        assert_eq!(issue.pretty, "05");
        assert_eq!(issue.order_key, Some(OrderKey::new(5, 0)));
    }

    #[test]
    fn test_default_tiers() {
        let normalizer = IssueNormalizer::default();
        assert_eq!(normalizer.normalize("7", IssueKind::Regular).pretty, "007");
        assert_eq!(normalizer.normalize("42", IssueKind::Regular).pretty, "042");
        assert_eq!(normalizer.normalize("250", IssueKind::Regular).pretty, "250");
    }

    #[test]
    fn test_leading_zeros_are_canonicalized() {
        let normalizer = IssueNormalizer::default();
        let issue = normalizer.normalize("005", IssueKind::Regular);
        assert_eq!(issue.pretty, "005");
        assert_eq!(issue.order_key, Some(OrderKey::new(5, 0)));
    }

    #[test]
    fn test_decimal_keeps_fraction() {
        let normalizer = IssueNormalizer::new(policy(PaddingLevel::SingleZero));
        let issue = normalizer.normalize("5.1", IssueKind::Regular);
        assert_eq!(issue.pretty, "05.1");
        assert_eq!(issue.order_key, Some(OrderKey::new(5, 10)));
    }

    #[test]
    fn test_zero_fraction_is_dropped() {
        let normalizer = IssueNormalizer::new(PaddingPolicy::unpadded());
        let issue = normalizer.normalize("12.00", IssueKind::Regular);
        assert_eq!(issue.pretty, "12");
        assert_eq!(issue.order_key, Some(OrderKey::new(12, 0)));
    }

    #[test]
    fn test_fraction_weighting_quirks() {
        // Observed behavior, kept as-is.
        assert_eq!(issue_order_key("1.1").unwrap().fraction, 10);
        assert_eq!(issue_order_key("1.10").unwrap().fraction, 10);
        assert_eq!(issue_order_key("1.12").unwrap().fraction, 120);
        assert_eq!(issue_order_key("1.05").unwrap().fraction, 50);

        let normalizer = IssueNormalizer::new(PaddingPolicy::unpadded());
        assert_eq!(normalizer.normalize("1.50", IssueKind::Regular).pretty, "1.5");
    }

    #[test]
    fn test_au_suffix() {
        let normalizer = IssueNormalizer::new(PaddingPolicy::unpadded());
        let issue = normalizer.normalize("12AU", IssueKind::Regular);
        assert_eq!(issue.pretty, "12 AU");
        assert_eq!(
            issue.order_key,
            Some(OrderKey::new(12, 0).with_suffix(IssueSuffix::Au))
        );
    }

    #[test]
    fn test_ai_suffix_with_padding() {
        let normalizer = IssueNormalizer::default();
        let issue = normalizer.normalize("3 ai", IssueKind::Regular);
        assert_eq!(issue.pretty, "003 AI");
    }

    #[test]
    fn test_padding_uses_integer_part_only() {
        let normalizer = IssueNormalizer::default();
        let issue = normalizer.normalize("9.5", IssueKind::Regular);
        assert_eq!(issue.pretty, "009.5");
    }

    #[test]
    fn test_annual_prefix() {
        let normalizer = IssueNormalizer::new(policy(PaddingLevel::SingleZero));
        let issue = normalizer.normalize("2", IssueKind::Annual);
        assert_eq!(issue.pretty, "Annual 02");
    }

    #[test]
    fn test_non_numeric_issue() {
        let normalizer = IssueNormalizer::default();
        let issue = normalizer.normalize("Alpha", IssueKind::Regular);
        assert_eq!(issue.pretty, "Alpha");
        assert!(issue.order_key.is_none());

        // "Hai" ends in "ai" but has no digit before it
        assert_eq!(split_suffix("Hai"), ("Hai", None));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = IssueNormalizer::default();
        let first = normalizer.normalize("17.25", IssueKind::Regular);
        let second = normalizer.normalize("17.25", IssueKind::Regular);
        assert_eq!(first, second);
    }
}
