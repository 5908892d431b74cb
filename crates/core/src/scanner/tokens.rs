//! Issue-number extraction from the text that follows a series name.

use crate::issue::{issue_order_key, OrderKey};

/// The token picked as a file's issue number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueToken {
    /// Cleaned token text, e.g. `"005"` or `"12AU"`.
    pub raw: String,
    pub key: OrderKey,
}

fn strip_archive_extension(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    for ext in [".cbr", ".cbz"] {
        if let Some(pos) = lower.find(ext) {
            let mut stripped = token.to_string();
            stripped.replace_range(pos..pos + ext.len(), "");
            return stripped;
        }
    }
    token.to_string()
}

fn strip_c2c(token: String) -> String {
    let lower = token.to_ascii_lowercase();
    let Some(pos) = lower.find("(c2c)") else {
        return token;
    };
    let mut replaced = token;
    replaced.replace_range(pos..pos + 5, " ");
    // What is left is re-split; the first word becomes the token.
    replaced
        .split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_default()
}

/// Removes dots from tokens that are not decimal numbers (`"v.2"` -> `"v2"`).
fn collapse_stray_dots(token: String) -> String {
    if token.contains('.') && token.parse::<f64>().is_err() {
        token.replace('.', "")
    } else {
        token
    }
}

/// Splits remainder text into cleaned words.
///
/// `_` becomes a space, `#` and `'` are dropped, then each word loses any
/// archive extension, a `(c2c)` marker and non-decimal dots.
pub fn tokenize(remainder: &str) -> Vec<String> {
    let cleaned: String = remainder
        .chars()
        .filter(|c| *c != '#' && *c != '\'')
        .map(|c| if c == '_' { ' ' } else { c })
        .collect();

    cleaned
        .split_whitespace()
        .map(strip_archive_extension)
        .map(strip_c2c)
        .map(collapse_stray_dots)
        .collect()
}

/// Finds the first token that reads as a positive issue number.
///
/// A separate `AU` word right after a numeric token is merged into it and
/// not considered on its own.
pub fn find_issue_token(remainder: &str) -> Option<IssueToken> {
    let tokens = tokenize(remainder);
    let mut idx = 0;

    while idx < tokens.len() {
        let mut token = tokens[idx].clone();
        let mut consumed = 1;

        let is_positive_integer = !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
            && token.bytes().any(|b| b != b'0');
        if is_positive_integer {
            if let Some(next) = tokens.get(idx + 1) {
                if next.eq_ignore_ascii_case("au") {
                    tracing::debug!(token = %token, "AU detected separate from issue, combining");
                    token.push_str("AU");
                    consumed = 2;
                }
            }
        }

        if let Some(key) = issue_order_key(&token).filter(OrderKey::is_positive) {
            return Some(IssueToken { raw: token, key });
        }

        idx += consumed;
    }

    None
}
