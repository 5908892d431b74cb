//! Tracking-log lookup for completed downloads.

use std::sync::Arc;

use super::config::ResolverConfig;
use super::error::ResolveError;
use super::types::{IssueRef, Resolution};
use crate::catalog::ComicCatalog;
use crate::issue::IssueKind;

const ARCHIVE_EXTENSIONS: [&str; 2] = [".cbr", ".cbz"];

/// Normalizes a download job name the way names are written to the
/// tracking log.
///
/// Drops a trailing `.cbr`/`.cbz`, turns spaces into dots, removes
/// `,` `:` `?` and spells `&` as `and`.
pub fn normalize_download_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let stem = match ARCHIVE_EXTENSIONS.iter().find(|ext| lower.ends_with(*ext)) {
        Some(ext) => &name[..name.len() - ext.len()],
        None => name,
    };

    let mut normalized = String::with_capacity(stem.len());
    for c in stem.chars() {
        match c {
            ' ' => normalized.push('.'),
            ',' | ':' | '?' => {}
            '&' => normalized.push_str("and"),
            other => normalized.push(other),
        }
    }
    normalized
}

/// Maps download job names to catalog issues.
pub struct DownloadResolver {
    config: ResolverConfig,
    catalog: Arc<dyn ComicCatalog>,
}

impl DownloadResolver {
    pub fn new(config: ResolverConfig, catalog: Arc<dyn ComicCatalog>) -> Self {
        Self { config, catalog }
    }

    /// Resolves a job name to a tracking entry and a classified reference.
    ///
    /// The normalized name is tried first, then the same name with `_`
    /// replaced by `.`.
    pub fn resolve(&self, job_name: &str) -> Result<Resolution, ResolveError> {
        let primary = normalize_download_name(job_name);
        let mut attempts = vec![primary.clone()];

        let (download_name, tracking, retried) =
            match self.catalog.find_tracking_entry(&primary)? {
                Some(entry) => (primary, entry, false),
                None => {
                    let retry = primary.replace('_', ".");
                    tracing::debug!(
                        name = %primary,
                        retry = %retry,
                        "no tracking entry, retrying with underscores as dots"
                    );
                    let found = if retry != primary {
                        attempts.push(retry.clone());
                        self.catalog.find_tracking_entry(&retry)?
                    } else {
                        None
                    };
                    match found {
                        Some(entry) => {
                            tracing::info!(name = %retry, "corrected and found the download");
                            (retry, entry, true)
                        }
                        None => {
                            return Err(ResolveError::Unresolvable {
                                name: job_name.to_string(),
                                attempts,
                            })
                        }
                    }
                }
            };

        let kind = IssueKind::from_name(&download_name);
        let issue_ref = self.classify(&tracking.issue_id, kind, tracking.story_arc.as_deref())?;

        tracing::debug!(
            download = %download_name,
            issue_id = %tracking.issue_id,
            kind = kind.as_str(),
            route = issue_ref.label(),
            "resolved download"
        );

        Ok(Resolution {
            download_name,
            tracking,
            kind,
            issue_ref,
            retried,
        })
    }

    /// Classifies a tracked issue ID.
    ///
    /// Story-arc marker first, then multi-volume markers, then the numeric
    /// one-off threshold. Anything numeric below the threshold must exist in
    /// the catalog table chosen by `kind`.
    pub fn classify(
        &self,
        issue_id: &str,
        kind: IssueKind,
        story_arc: Option<&str>,
    ) -> Result<IssueRef, ResolveError> {
        let marker = self.config.story_arc_marker.as_str();
        if let Some(rest) = issue_id.strip_prefix(marker).filter(|r| !r.is_empty()) {
            return Ok(IssueRef::StoryArc {
                issue_arc_id: rest.to_string(),
                arc_name: story_arc
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            });
        }

        if issue_id.contains('G') || issue_id.contains('-') {
            return Ok(IssueRef::MultiVolume {
                issue_id: issue_id.to_string(),
            });
        }

        let numeric = issue_id
            .parse::<u64>()
            .map_err(|_| ResolveError::UnrecognizedId {
                issue_id: issue_id.to_string(),
            })?;

        if numeric >= self.config.one_off_threshold {
            return Ok(IssueRef::OneOff {
                issue_id: issue_id.to_string(),
            });
        }

        match self.catalog.get_issue(issue_id, kind)? {
            Some(issue) => Ok(IssueRef::Watchlist {
                series_id: issue.series_id,
                issue_id: issue.id,
                kind,
            }),
            None => Err(ResolveError::UnknownIssue {
                issue_id: issue_id.to_string(),
                kind,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogIssue, IssueStatus, SqliteCatalog, TrackingLogEntry};
    use chrono::Utc;

    fn track(catalog: &SqliteCatalog, name: &str, issue_id: &str, arc: Option<&str>) {
        catalog
            .upsert_tracking_entry(&TrackingLogEntry {
                download_name: name.to_string(),
                issue_id: issue_id.to_string(),
                story_arc: arc.map(str::to_string),
                created_at: Utc::now(),
            })
            .unwrap();
    }

    fn add_issue(catalog: &SqliteCatalog, id: &str, kind: IssueKind) {
        catalog
            .upsert_issue(&CatalogIssue {
                id: id.to_string(),
                series_id: "42".to_string(),
                issue_number: "5".to_string(),
                release_date: None,
                status: IssueStatus::Snatched,
                kind,
            })
            .unwrap();
    }

    fn resolver(catalog: SqliteCatalog) -> DownloadResolver {
        DownloadResolver::new(ResolverConfig::default(), Arc::new(catalog))
    }

    #[test]
    fn test_normalize_download_name() {
        assert_eq!(
            normalize_download_name("Batman & Robin: Year One, Part 2?.CBZ"),
            "Batman.and.Robin.Year.One.Part.2"
        );
        assert_eq!(normalize_download_name("Saga.005.2020.cbr"), "Saga.005.2020");
        assert_eq!(normalize_download_name("Some_Comic_01"), "Some_Comic_01");
    }

    #[test]
    fn test_resolve_watchlist_issue() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        track(&catalog, "Saga.005.(2020)", "1001", None);
        add_issue(&catalog, "1001", IssueKind::Regular);

        let resolution = resolver(catalog).resolve("Saga 005 (2020)").unwrap();
        assert_eq!(resolution.download_name, "Saga.005.(2020)");
        assert!(!resolution.retried);
        assert_eq!(
            resolution.issue_ref,
            IssueRef::Watchlist {
                series_id: "42".to_string(),
                issue_id: "1001".to_string(),
                kind: IssueKind::Regular,
            }
        );
    }

    #[test]
    fn test_resolve_retries_with_underscores() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        track(&catalog, "Some.Comic.01", "1001", None);
        add_issue(&catalog, "1001", IssueKind::Regular);

        let resolution = resolver(catalog).resolve("Some_Comic_01").unwrap();
        assert_eq!(resolution.download_name, "Some.Comic.01");
        assert!(resolution.retried);
    }

    #[test]
    fn test_resolve_unresolvable_lists_attempts() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        let err = resolver(catalog).resolve("Some_Comic_01").unwrap_err();
        match err {
            ResolveError::Unresolvable { attempts, .. } => {
                assert_eq!(attempts, vec!["Some_Comic_01", "Some.Comic.01"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_annual_uses_annual_table() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        track(&catalog, "Batman.Annual.02", "2002", None);
        add_issue(&catalog, "2002", IssueKind::Annual);

        let resolution = resolver(catalog).resolve("Batman Annual 02").unwrap();
        assert_eq!(resolution.kind, IssueKind::Annual);
        assert!(matches!(
            resolution.issue_ref,
            IssueRef::Watchlist {
                kind: IssueKind::Annual,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_routes() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        let resolver = resolver(catalog);

        assert_eq!(
            resolver
                .classify("S555", IssueKind::Regular, Some("Court of Owls"))
                .unwrap(),
            IssueRef::StoryArc {
                issue_arc_id: "555".to_string(),
                arc_name: Some("Court of Owls".to_string()),
            }
        );
        assert!(matches!(
            resolver.classify("G123", IssueKind::Regular, None).unwrap(),
            IssueRef::MultiVolume { .. }
        ));
        assert!(matches!(
            resolver.classify("12-34", IssueKind::Regular, None).unwrap(),
            IssueRef::MultiVolume { .. }
        ));
        assert!(matches!(
            resolver.classify("900000", IssueKind::Regular, None).unwrap(),
            IssueRef::OneOff { .. }
        ));
        assert!(matches!(
            resolver.classify("899999", IssueKind::Regular, None),
            Err(ResolveError::UnknownIssue { .. })
        ));
        assert!(matches!(
            resolver.classify("abc", IssueKind::Regular, None),
            Err(ResolveError::UnrecognizedId { .. })
        ));
    }
}
