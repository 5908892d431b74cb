//! Directory-walking series file matcher.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::ScanError;
use super::tokens::find_issue_token;
use super::traits::SeriesFileMatcher;
use super::types::CandidateFile;
use crate::catalog::CatalogSeries;
use crate::issue::IssueKind;

/// Returns true for `.cbr`/`.cbz` files, any case.
pub fn is_comic_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("cbr") || e.eq_ignore_ascii_case("cbz"))
        .unwrap_or(false)
}

/// First comic archive under `folder`, in file-name order.
pub fn first_archive(folder: &Path) -> Option<PathBuf> {
    if folder.is_file() {
        return is_comic_archive(folder).then(|| folder.to_path_buf());
    }
    WalkDir::new(folder)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| is_comic_archive(path))
}

/// Lower-cased words of `text` with the byte offset just past each one.
///
/// Apostrophes inside a word are ignored and a standalone `&` reads as
/// `and`, so `"Batman & Robin's"` and `"Batman and Robins"` agree.
fn words_with_ends(text: &str) -> Vec<(String, usize)> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut current_end = 0;

    for (idx, c) in text.char_indices() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
            current_end = idx + c.len_utf8();
        } else if c == '\'' && !current.is_empty() {
            continue;
        } else {
            if !current.is_empty() {
                words.push((std::mem::take(&mut current), current_end));
            }
            if c == '&' {
                words.push(("and".to_string(), idx + 1));
            }
        }
    }
    if !current.is_empty() {
        words.push((current, current_end));
    }
    words
}

/// Byte offset in `file_name` where the text after `series_name` starts,
/// if the file name begins with the series name word for word.
pub(crate) fn match_series_prefix(file_name: &str, series_name: &str) -> Option<usize> {
    let series_words = words_with_ends(series_name);
    if series_words.is_empty() {
        return None;
    }

    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let file_words = words_with_ends(stem);
    if file_words.len() < series_words.len() {
        return None;
    }

    let matches = series_words
        .iter()
        .zip(&file_words)
        .all(|((series_word, _), (file_word, _))| series_word == file_word);
    if !matches {
        return None;
    }

    file_words.get(series_words.len() - 1).map(|(_, end)| *end)
}

/// First `(YYYY)` in the text.
fn bracketed_year(text: &str) -> Option<u16> {
    let bytes = text.as_bytes();
    bytes.windows(6).find_map(|w| {
        if w[0] == b'(' && w[5] == b')' && w[1..5].iter().all(u8::is_ascii_digit) {
            std::str::from_utf8(&w[1..5]).ok()?.parse().ok()
        } else {
            None
        }
    })
}

/// Matches files by walking the folder tree.
///
/// A file matches when its name starts with the series name (or an
/// alternate) word for word. Files whose bracketed year predates the
/// series' start year are rejected.
#[derive(Debug, Clone, Default)]
pub struct FsFileMatcher;

impl FsFileMatcher {
    pub fn new() -> Self {
        Self
    }

    fn archives_under(folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(folder)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = entry.map_err(|e| ScanError::Walk {
                path: folder.to_path_buf(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() && is_comic_archive(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// Issue-count hint for files without a year: a regular issue numbered
/// above the series' expected count belongs to another volume. A count of
/// zero means unknown.
fn exceeds_issue_count(file_name: &str, remainder: &str, series: &CatalogSeries) -> bool {
    if series.total_issues == 0 || IssueKind::from_name(file_name).is_annual() {
        return false;
    }
    find_issue_token(remainder)
        .map(|token| token.key.whole > series.total_issues)
        .unwrap_or(false)
}

impl SeriesFileMatcher for FsFileMatcher {
    fn name(&self) -> &str {
        "fs"
    }

    fn find_candidates(
        &self,
        folder: &Path,
        series: &CatalogSeries,
    ) -> Result<Vec<CandidateFile>, ScanError> {
        if !folder.is_dir() {
            return Err(ScanError::FolderNotFound {
                path: folder.to_path_buf(),
            });
        }

        let mut candidates = Vec::new();
        for path in Self::archives_under(folder)? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let matched = series.search_names().find_map(|name| {
                match_series_prefix(file_name, name).map(|offset| (name, offset))
            });
            let Some((matched_name, offset)) = matched else {
                continue;
            };

            let remainder = &file_name[offset..];
            match (bracketed_year(remainder), series.start_year) {
                (Some(year), Some(start_year)) if year < start_year => {
                    tracing::debug!(
                        file = %file_name,
                        year,
                        start_year,
                        "file predates series start, skipping"
                    );
                    continue;
                }
                (None, _) if exceeds_issue_count(file_name, remainder, series) => {
                    tracing::debug!(
                        file = %file_name,
                        total_issues = series.total_issues,
                        "issue number beyond the series' issue count, skipping"
                    );
                    continue;
                }
                _ => {}
            }

            candidates.push(CandidateFile {
                matched_name: matched_name.to_string(),
                remainder: remainder.to_string(),
                path,
            });
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn series(name: &str, alternates: &[&str], start_year: Option<u16>) -> CatalogSeries {
        CatalogSeries {
            id: "1".to_string(),
            name: name.to_string(),
            alternate_names: alternates.iter().map(|s| s.to_string()).collect(),
            start_year,
            publisher: "Image".to_string(),
            location: PathBuf::from("/comics/x"),
            version: None,
            total_issues: 10,
        }
    }

    #[test]
    fn test_match_series_prefix() {
        let file = "Series Name 005 (2020).cbr";
        let offset = match_series_prefix(file, "Series Name").unwrap();
        assert_eq!(&file[offset..], " 005 (2020).cbr");

        let file = "Batman_and_Robins_012.cbz";
        let offset = match_series_prefix(file, "Batman & Robin's").unwrap();
        assert_eq!(&file[offset..], "_012.cbz");

        assert!(match_series_prefix("Saga Deluxe 01.cbr", "Sagas").is_none());
        assert!(match_series_prefix("Saga.cbr", "Saga Deluxe").is_none());
    }

    #[test]
    fn test_bracketed_year() {
        assert_eq!(bracketed_year(" 005 (2020) (digital)"), Some(2020));
        assert_eq!(bracketed_year(" 005 (digital)"), None);
    }

    #[test]
    fn test_find_candidates_walks_subfolders() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("Saga 001 (2012).cbz"), b"x").unwrap();
        fs::write(temp.path().join("nested/saga_002_(2012).CBR"), b"x").unwrap();
        fs::write(temp.path().join("Saga 003.txt"), b"x").unwrap();
        fs::write(temp.path().join("Paper Girls 001.cbz"), b"x").unwrap();

        let matcher = FsFileMatcher::new();
        let found = matcher
            .find_candidates(temp.path(), &series("Saga", &[], Some(2012)))
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.matched_name == "Saga"));
    }

    #[test]
    fn test_find_candidates_uses_alternates_and_year_hint() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("TMNT 010 (2014).cbz"), b"x").unwrap();
        fs::write(temp.path().join("TMNT 001 (1984).cbz"), b"x").unwrap();

        let matcher = FsFileMatcher::new();
        let found = matcher
            .find_candidates(
                temp.path(),
                &series("Teenage Mutant Ninja Turtles", &["TMNT"], Some(2011)),
            )
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_name, "TMNT");
        assert_eq!(found[0].remainder, " 010 (2014).cbz");
    }

    #[test]
    fn test_issue_count_hint_without_year() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Saga 007.cbz"), b"x").unwrap();
        fs::write(temp.path().join("Saga 015.cbz"), b"x").unwrap();
        fs::write(temp.path().join("Saga 016 (2013).cbz"), b"x").unwrap();
        fs::write(temp.path().join("Saga Annual 012.cbz"), b"x").unwrap();

        let matcher = FsFileMatcher::new();
        let mut found: Vec<_> = matcher
            .find_candidates(temp.path(), &series("Saga", &[], Some(2012)))
            .unwrap()
            .into_iter()
            .map(|c| c.remainder)
            .collect();
        found.sort();

        // #15 has no year and exceeds the 10 expected issues
        assert_eq!(found, vec![" 007.cbz", " 016 (2013).cbz", " Annual 012.cbz"]);

        // Unknown count disables the hint
        let open_ended = CatalogSeries {
            total_issues: 0,
            ..series("Saga", &[], Some(2012))
        };
        let found = matcher.find_candidates(temp.path(), &open_ended).unwrap();
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn test_missing_folder() {
        let matcher = FsFileMatcher::new();
        let result = matcher.find_candidates(Path::new("/nonexistent/folder"), &series("Saga", &[], None));
        assert!(matches!(result, Err(ScanError::FolderNotFound { .. })));
    }

    #[test]
    fn test_first_archive_in_name_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("readme.nfo"), b"x").unwrap();
        fs::write(temp.path().join("b.cbz"), b"x").unwrap();
        fs::write(temp.path().join("a.CBR"), b"x").unwrap();

        assert_eq!(first_archive(temp.path()), Some(temp.path().join("a.CBR")));
        assert_eq!(
            first_archive(&temp.path().join("b.cbz")),
            Some(temp.path().join("b.cbz"))
        );
        assert_eq!(first_archive(&temp.path().join("missing")), None);
    }
}
