//! Manual reconciliation integration tests.
//!
//! A manual run scans a folder of existing files against every series in
//! the catalog and files each match into the library.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use shortbox_core::{
    catalog::{ComicCatalog, IssueStatus, SqliteCatalog},
    config::Config,
    issue::IssueKind,
    postprocess::{DownloadJob, PipelineState, PostProcessor, ProcessOutcome},
    relocator::FsRelocator,
    scripts::ScriptArgs,
    testing::{fixtures, MockNotifier, MockScriptRunner, MockTagger},
};

struct TestHarness {
    catalog: Arc<SqliteCatalog>,
    tagger: Arc<MockTagger>,
    pre_script: Arc<MockScriptRunner>,
    post_script: Arc<MockScriptRunner>,
    notifier: Arc<MockNotifier>,
    unsorted: TempDir,
    library: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            catalog: Arc::new(SqliteCatalog::in_memory().expect("Failed to create catalog")),
            tagger: Arc::new(MockTagger::new()),
            pre_script: Arc::new(MockScriptRunner::new()),
            post_script: Arc::new(MockScriptRunner::new()),
            notifier: Arc::new(MockNotifier::new()),
            unsorted: TempDir::new().expect("Failed to create unsorted dir"),
            library: TempDir::new().expect("Failed to create library dir"),
        }
    }

    fn processor(&self) -> PostProcessor {
        PostProcessor::new(
            &Config::new(self.library.path()),
            Arc::clone(&self.catalog) as Arc<dyn ComicCatalog>,
            Arc::new(FsRelocator::with_defaults()),
        )
        .with_tagger(self.tagger.clone())
        .with_pre_script(self.pre_script.clone())
        .with_post_script(self.post_script.clone())
        .with_notifier(self.notifier.clone())
    }

    /// Saga (2012) with issues #5 and #6 in the catalog.
    fn seed_saga(&self) {
        let series = fixtures::series("10", "Saga", 2012, self.library.path());
        self.catalog.upsert_series(&series).unwrap();
        self.catalog
            .upsert_issue(&fixtures::issue("105", "10", "5", "2013-01-16"))
            .unwrap();
        self.catalog
            .upsert_issue(&fixtures::issue("106", "10", "6", "2013-02-20"))
            .unwrap();
    }

    fn series_dir(&self) -> PathBuf {
        self.library.path().join("Saga (2012)")
    }
}

#[tokio::test]
async fn test_manual_run_files_matches_and_keeps_the_folder() {
    let harness = TestHarness::new();
    harness.seed_saga();
    // A stale tracking entry from an earlier snatch of the same issue
    harness
        .catalog
        .upsert_tracking_entry(&fixtures::tracking_entry("Saga.005.2013", "105"))
        .unwrap();
    let file = fixtures::write_archive(harness.unsorted.path(), "Saga 005 (2013).cbr");
    fixtures::write_archive(harness.unsorted.path(), "Paper Girls 001 (2015).cbz");

    let report = harness.processor().process_manual(harness.unsorted.path()).await;

    assert_eq!(report.files_matched, 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.failed(), 0);
    assert!(report.log.contains("Manual run finished: 1 processed, 0 failed"));

    let expected = harness.series_dir().join("Saga 005 (2013).cbr");
    assert_eq!(report.results[0].state, PipelineState::Done);
    assert_eq!(report.results[0].final_path(), Some(expected.as_path()));
    assert!(expected.exists());
    assert!(!file.exists());

    // The source folder and unmatched files stay put
    assert!(harness.unsorted.path().exists());
    assert!(harness.unsorted.path().join("Paper Girls 001 (2015).cbz").exists());

    // Bookkeeping
    assert!(harness
        .catalog
        .find_tracking_entry("Saga.005.2013")
        .unwrap()
        .is_none());
    let issue = harness
        .catalog
        .get_issue("105", IssueKind::Regular)
        .unwrap()
        .unwrap();
    assert_eq!(issue.status, IssueStatus::Downloaded);

    // Tagger gets the exact file
    let requests = harness.tagger.recorded_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].file.as_deref(), Some(file.as_path()));

    // Manual runs neither notify nor run the post-script
    assert!(harness.notifier.sent_messages().await.is_empty());
    assert_eq!(harness.post_script.run_count().await, 0);
    let pre = harness.pre_script.recorded_runs().await;
    assert_eq!(pre.len(), 1);
    match &pre[0] {
        ScriptArgs::Pre { job_name, .. } => assert_eq!(job_name, "Manual Run"),
        other => panic!("expected pre-script args, got {:?}", other),
    }
}

#[tokio::test]
async fn test_manual_run_continues_after_a_failed_candidate() {
    let harness = TestHarness::new();
    harness.seed_saga();
    fixtures::write_archive(harness.unsorted.path(), "Saga 005 (2013).cbz");
    fixtures::write_archive(harness.unsorted.path(), "Saga 006 (2013).cbz");

    // Block the destination of #5
    let blocker = harness.series_dir().join("Saga 005 (2013).cbz");
    std::fs::create_dir_all(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), b"x").unwrap();

    let report = harness.processor().process_manual(harness.unsorted.path()).await;

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.failed(), 1);
    let states: Vec<_> = report.results.iter().map(|r| r.state).collect();
    assert!(states.contains(&PipelineState::MoveFailed));
    assert!(states.contains(&PipelineState::Done));
    assert!(harness.series_dir().join("Saga 006 (2013).cbz").is_file());
}

#[tokio::test]
async fn test_manual_run_reports_unknown_issues_as_skipped() {
    let harness = TestHarness::new();
    harness.seed_saga();
    fixtures::write_archive(harness.unsorted.path(), "Saga 040 (2016).cbz");

    let report = harness.processor().process_manual(harness.unsorted.path()).await;

    assert!(report.results.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].series_id, "10");
    assert!(harness.unsorted.path().join("Saga 040 (2016).cbz").exists());
}

#[tokio::test]
async fn test_manual_run_with_empty_catalog() {
    let harness = TestHarness::new();
    fixtures::write_archive(harness.unsorted.path(), "Saga 005 (2013).cbz");

    let report = harness.processor().process_manual(harness.unsorted.path()).await;

    assert!(report.results.is_empty());
    assert!(report
        .log
        .contains("There are no series in the catalog to match against"));
    assert!(harness.unsorted.path().join("Saga 005 (2013).cbz").exists());
}

#[tokio::test]
async fn test_process_dispatches_on_job_name() {
    let harness = TestHarness::new();
    harness.seed_saga();
    fixtures::write_archive(harness.unsorted.path(), "Saga 006 (2013).cbz");

    let outcome = harness
        .processor()
        .process(DownloadJob::new("Manual Run", harness.unsorted.path()))
        .await;

    match outcome {
        ProcessOutcome::Manual(report) => assert_eq!(report.processed(), 1),
        other => panic!("expected a manual run, got {:?}", other),
    }
}
