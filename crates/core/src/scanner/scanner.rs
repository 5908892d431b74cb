//! Folder-wide reconciliation against the whole catalog.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::ScanError;
use super::tokens::find_issue_token;
use super::traits::SeriesFileMatcher;
use super::types::{CandidateFile, ManualCandidate, ScanReport, SkippedFile};
use crate::catalog::{CatalogSeries, ComicCatalog};
use crate::issue::IssueKind;
use crate::metrics;

/// Matches every file under a folder against every followed series.
pub struct ManualScanner {
    catalog: Arc<dyn ComicCatalog>,
    matcher: Arc<dyn SeriesFileMatcher>,
}

impl ManualScanner {
    pub fn new(catalog: Arc<dyn ComicCatalog>, matcher: Arc<dyn SeriesFileMatcher>) -> Self {
        Self { catalog, matcher }
    }

    /// Scans `folder` and returns the files that map to catalog issues.
    ///
    /// A file claimed by several series goes to the one whose matched name
    /// is longest. Files without a usable issue number are skipped and
    /// reported, never fatal.
    pub fn scan(&self, folder: &Path) -> Result<ScanReport, ScanError> {
        let all_series = self.catalog.list_series()?;
        if all_series.is_empty() {
            tracing::error!(
                folder = %folder.display(),
                "no series in the catalog, nothing to reconcile against"
            );
            return Ok(ScanReport::default());
        }

        if !folder.is_dir() {
            return Err(ScanError::FolderNotFound {
                path: folder.to_path_buf(),
            });
        }

        let mut report = ScanReport::default();
        // path -> (index into report.candidates, matched name length)
        let mut claimed: HashMap<PathBuf, (usize, usize)> = HashMap::new();

        for series in &all_series {
            let files = self.matcher.find_candidates(folder, series)?;
            if files.is_empty() {
                report.unmatched_series += 1;
                continue;
            }
            report.files_matched += files.len();

            for file in files {
                match self.match_issue(series, &file) {
                    Ok(candidate) => {
                        let name_len = file.matched_name.len();
                        match claimed.get(&candidate.path).copied() {
                            Some((idx, existing_len)) if existing_len >= name_len => {
                                tracing::debug!(
                                    path = %candidate.path.display(),
                                    kept = %report.candidates[idx].series.name,
                                    dropped = %series.name,
                                    "file already claimed by a closer series match"
                                );
                            }
                            Some((idx, _)) => {
                                claimed.insert(candidate.path.clone(), (idx, name_len));
                                report.candidates[idx] = candidate;
                            }
                            None => {
                                claimed.insert(
                                    candidate.path.clone(),
                                    (report.candidates.len(), name_len),
                                );
                                report.candidates.push(candidate);
                            }
                        }
                    }
                    Err(e) if e.is_skippable() => {
                        tracing::info!(error = %e, "skipping file");
                        metrics::MANUAL_CANDIDATES
                            .with_label_values(&["skipped"])
                            .inc();
                        report.skipped.push(SkippedFile {
                            path: file.path.clone(),
                            series_id: series.id.clone(),
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        metrics::MANUAL_CANDIDATES
            .with_label_values(&["matched"])
            .inc_by(report.candidates.len() as u64);

        tracing::info!("{}", report.summary());
        Ok(report)
    }

    fn match_issue(
        &self,
        series: &CatalogSeries,
        file: &CandidateFile,
    ) -> Result<ManualCandidate, ScanError> {
        let Some(token) = find_issue_token(&file.remainder) else {
            return Err(ScanError::ambiguous(
                file.path.clone(),
                &series.name,
                "no positive issue number in file name",
            ));
        };

        let file_name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let kind = IssueKind::from_name(&file_name);

        match self.catalog.find_issue_by_key(&series.id, kind, &token.key)? {
            Some(issue) => {
                tracing::info!(
                    series = %series.name,
                    series_id = %series.id,
                    issue_id = %issue.id,
                    issue = %token.raw,
                    "found matching issue"
                );
                Ok(ManualCandidate {
                    series: series.clone(),
                    issue,
                    path: file.path.clone(),
                })
            }
            None => Err(ScanError::ambiguous(
                file.path.clone(),
                &series.name,
                format!("no {} issue #{} in the catalog", kind.as_str(), token.raw),
            )),
        }
    }
}
