//! Types for user scripts.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogIssue, CatalogSeries};

/// Metadata for one issue, as handed to scripts.
///
/// Field names are part of the script contract and stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub name: String,
    pub comicyear: String,
    pub comicid: String,
    pub issueid: String,
    pub issueyear: String,
    pub issue: String,
    pub publisher: String,
}

impl SeriesMeta {
    /// Metadata for an issue of a followed series.
    pub fn from_catalog(series: &CatalogSeries, issue: &CatalogIssue) -> Self {
        Self {
            name: series.name.clone(),
            comicyear: series
                .start_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            comicid: series.id.clone(),
            issueid: issue.id.clone(),
            issueyear: issue.release_year().unwrap_or_default().to_string(),
            issue: issue.issue_number.clone(),
            publisher: series.publisher.clone(),
        }
    }
}

/// The JSON payload passed as the last script argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptMetadata {
    pub seriesmeta: Vec<SeriesMeta>,
}

impl ScriptMetadata {
    pub fn single(meta: SeriesMeta) -> Self {
        Self {
            seriesmeta: vec![meta],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Arguments for one script invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptArgs {
    /// Before renaming: job name, job folder, metadata.
    Pre {
        job_name: String,
        job_folder: String,
        metadata: String,
    },
    /// After notifications: job name, job folder, new file name, new
    /// folder, metadata.
    Post {
        job_name: String,
        job_folder: String,
        file_name: String,
        folder: String,
        metadata: String,
    },
}

impl ScriptArgs {
    pub fn phase(&self) -> &'static str {
        match self {
            ScriptArgs::Pre { .. } => "pre",
            ScriptArgs::Post { .. } => "post",
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            ScriptArgs::Pre {
                job_name,
                job_folder,
                metadata,
            } => vec![job_name, job_folder, metadata],
            ScriptArgs::Post {
                job_name,
                job_folder,
                file_name,
                folder,
                metadata,
            } => vec![job_name, job_folder, file_name, folder, metadata],
        }
    }
}

/// What a finished script produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Stdout followed by stderr.
    pub output: String,
}

impl ScriptOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IssueStatus;
    use crate::issue::IssueKind;
    use std::path::PathBuf;

    #[test]
    fn test_metadata_json_shape() {
        let series = CatalogSeries {
            id: "10".to_string(),
            name: "Saga".to_string(),
            alternate_names: vec![],
            start_year: Some(2012),
            publisher: "Image".to_string(),
            location: PathBuf::from("/comics/Saga"),
            version: None,
            total_issues: 60,
        };
        let issue = CatalogIssue {
            id: "5001".to_string(),
            series_id: "10".to_string(),
            issue_number: "5".to_string(),
            release_date: Some("2012-08-15".to_string()),
            status: IssueStatus::Snatched,
            kind: IssueKind::Regular,
        };

        let json = ScriptMetadata::single(SeriesMeta::from_catalog(&series, &issue))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let meta = &value["seriesmeta"][0];
        assert_eq!(meta["name"], "Saga");
        assert_eq!(meta["comicyear"], "2012");
        assert_eq!(meta["comicid"], "10");
        assert_eq!(meta["issueid"], "5001");
        assert_eq!(meta["issueyear"], "2012");
        assert_eq!(meta["issue"], "5");
        assert_eq!(meta["publisher"], "Image");
    }

    #[test]
    fn test_post_args_order() {
        let args = ScriptArgs::Post {
            job_name: "job".to_string(),
            job_folder: "/dl/job".to_string(),
            file_name: "Saga 005 (2012).cbz".to_string(),
            folder: "/comics/Saga".to_string(),
            metadata: "{}".to_string(),
        };
        assert_eq!(args.phase(), "post");
        assert_eq!(
            args.into_vec(),
            vec!["job", "/dl/job", "Saga 005 (2012).cbz", "/comics/Saga", "{}"]
        );
    }
}
