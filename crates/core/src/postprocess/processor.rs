//! The post-process coordinator.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::error::SetupError;
use super::types::{
    DownloadJob, JobOrigin, ManualRunReport, PipelineState, PostProcessReport, ProcessOutcome,
    RunLog, MANUAL_RUN,
};
use crate::catalog::{CatalogError, CatalogIssue, CatalogSeries, ComicCatalog, IssueStatus};
use crate::config::Config;
use crate::issue::{IssueKind, IssueNormalizer};
use crate::metrics;
use crate::notify::{build_notifiers, NotificationMessage, Notifier};
use crate::planner::{DestinationPlanner, LibraryConfig};
use crate::relocator::{FsRelocator, RelocationJob, RelocationResult, Relocator};
use crate::resolver::{DownloadResolver, IssueRef, Resolution};
use crate::scanner::{
    first_archive, FsFileMatcher, ManualCandidate, ManualScanner, ScanReport, SeriesFileMatcher,
};
use crate::scripts::{ScriptArgs, ScriptMetadata, ScriptRunner, SeriesMeta, ShellScriptRunner};
use crate::tagger::{CommandTagger, MetadataTagger, TagOutcome, TagRequest};
use crate::updater::{CatalogUpdater, SeriesUpdater};

/// A step either hands its value on or stops the run in a terminal state.
/// The reason is already in the run log when a step returns `Err`.
type Step<T> = Result<T, PipelineState>;

/// Bookkeeping for one coordinator pass.
struct Run {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    started: Instant,
    job_name: String,
    origin: JobOrigin,
    issue_ref: Option<IssueRef>,
    source: Option<PathBuf>,
    final_path: Option<PathBuf>,
    log: RunLog,
}

impl Run {
    fn new(job_name: &str, origin: JobOrigin) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            started: Instant::now(),
            job_name: job_name.to_string(),
            origin,
            issue_ref: None,
            source: None,
            final_path: None,
            log: RunLog::new(job_name),
        }
    }

    fn enter(&mut self, state: PipelineState) {
        self.log.debug(format!("-> {}", state));
    }

    fn catalog_failure(&mut self, context: &str, error: CatalogError) -> PipelineState {
        self.log.error(format!("{}: {}", context, error));
        PipelineState::CatalogUnavailable
    }

    fn finish(mut self, state: PipelineState) -> PostProcessReport {
        if state == PipelineState::Done {
            self.log.info("Post-processing completed");
        } else {
            self.log.error(format!("Post-processing stopped: {}", state));
        }

        let elapsed = self.started.elapsed();
        metrics::POSTPROCESS_RUNS
            .with_label_values(&[state.as_str()])
            .inc();
        metrics::POSTPROCESS_DURATION
            .with_label_values(&[self.origin.as_str()])
            .observe(elapsed.as_secs_f64());

        PostProcessReport {
            run_id: self.run_id,
            job_name: self.job_name,
            origin: self.origin,
            state,
            issue_ref: self.issue_ref,
            source: self.source,
            final_path: self.final_path,
            started_at: self.started_at,
            duration_ms: elapsed.as_millis() as u64,
            log: self.log,
        }
    }
}

/// A catalog issue on its way into its series directory.
struct IssueFiling<'a> {
    job_name: &'a str,
    job_folder: &'a Path,
    series: &'a CatalogSeries,
    issue: &'a CatalogIssue,
    source: PathBuf,
    /// Hand the tagger this exact file instead of the folder.
    exact_file: bool,
    cleanup: Option<PathBuf>,
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Drives a download (or a manual batch) from job name to filed issue.
///
/// Runs never fail: every outcome, including terminal failures, comes back
/// as a report whose log says what happened.
pub struct PostProcessor {
    library: LibraryConfig,
    catalog: Arc<dyn ComicCatalog>,
    resolver: DownloadResolver,
    normalizer: IssueNormalizer,
    planner: DestinationPlanner,
    relocator: Arc<dyn Relocator>,
    tagger: Option<Arc<dyn MetadataTagger>>,
    pre_script: Option<Arc<dyn ScriptRunner>>,
    post_script: Option<Arc<dyn ScriptRunner>>,
    notifiers: Vec<Arc<dyn Notifier>>,
    updater: Arc<dyn SeriesUpdater>,
    matcher: Arc<dyn SeriesFileMatcher>,
}

impl PostProcessor {
    /// Creates a coordinator with no tagger, scripts or notifiers.
    pub fn new(
        config: &Config,
        catalog: Arc<dyn ComicCatalog>,
        relocator: Arc<dyn Relocator>,
    ) -> Self {
        Self {
            library: config.library.clone(),
            resolver: DownloadResolver::new(config.resolver.clone(), Arc::clone(&catalog)),
            normalizer: IssueNormalizer::new(config.naming.padding),
            planner: DestinationPlanner::new(config.library.clone(), config.naming.clone()),
            relocator,
            tagger: None,
            pre_script: None,
            post_script: None,
            notifiers: Vec::new(),
            updater: Arc::new(CatalogUpdater::new(Arc::clone(&catalog))),
            matcher: Arc::new(FsFileMatcher::new()),
            catalog,
        }
    }

    /// Creates a coordinator with every collaborator the configuration
    /// enables: filesystem relocation, the tagging command, user scripts
    /// and notification channels.
    pub fn from_config(config: &Config, catalog: Arc<dyn ComicCatalog>) -> Result<Self, SetupError> {
        let mut processor = Self::new(config, catalog, Arc::new(FsRelocator::with_defaults()));

        if config.tagging.enabled {
            processor = processor.with_tagger(Arc::new(CommandTagger::new(config.tagging.clone())));
        }

        let working_dir = config.scripts.working_dir.clone();
        if let Some(command) = config.scripts.pre_script.as_deref() {
            let runner = ShellScriptRunner::new(command, working_dir.clone())?;
            processor = processor.with_pre_script(Arc::new(runner));
        }
        if let Some(command) = config.scripts.post_script.as_deref() {
            let runner = ShellScriptRunner::new(command, working_dir)?;
            processor = processor.with_post_script(Arc::new(runner));
        }

        for notifier in build_notifiers(&config.notifications)? {
            processor = processor.with_notifier(notifier);
        }

        Ok(processor)
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn MetadataTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn with_pre_script(mut self, runner: Arc<dyn ScriptRunner>) -> Self {
        self.pre_script = Some(runner);
        self
    }

    pub fn with_post_script(mut self, runner: Arc<dyn ScriptRunner>) -> Self {
        self.post_script = Some(runner);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn with_status_updater(mut self, updater: Arc<dyn SeriesUpdater>) -> Self {
        self.updater = updater;
        self
    }

    pub fn with_file_matcher(mut self, matcher: Arc<dyn SeriesFileMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Processes a job according to its origin.
    pub async fn process(&self, job: DownloadJob) -> ProcessOutcome {
        match job.origin {
            JobOrigin::Automatic => ProcessOutcome::Download(self.process_download(job).await),
            JobOrigin::Manual => ProcessOutcome::Manual(self.process_manual(&job.folder).await),
        }
    }

    /// Processes one finished download.
    pub async fn process_download(&self, job: DownloadJob) -> PostProcessReport {
        let mut run = Run::new(&job.name, JobOrigin::Automatic);
        let state = match self.run_download(&job, &mut run).await {
            Ok(()) => PipelineState::Done,
            Err(state) => state,
        };
        run.finish(state)
    }

    /// Matches every file in `folder` against the catalog and files each
    /// match. A failed file is logged and the batch moves on.
    pub async fn process_manual(&self, folder: &Path) -> ManualRunReport {
        let run_id = Uuid::new_v4();
        let mut log = RunLog::new(MANUAL_RUN);
        log.info(format!("Manual reconciliation of {}", folder.display()));

        let scanner = ManualScanner::new(Arc::clone(&self.catalog), Arc::clone(&self.matcher));
        let scan = match scanner.scan(folder) {
            Ok(scan) => {
                if scan.files_matched == 0 && scan.unmatched_series == 0 {
                    log.error("There are no series in the catalog to match against");
                }
                scan
            }
            Err(e) => {
                log.error(format!("Manual scan failed: {}", e));
                ScanReport::default()
            }
        };

        log.info(scan.summary());
        for skipped in &scan.skipped {
            log.warn(format!(
                "Skipping {}: {}",
                skipped.path.display(),
                skipped.reason
            ));
        }

        let mut results = Vec::with_capacity(scan.candidates.len());
        for candidate in scan.candidates {
            let path = candidate.path.clone();
            let report = self.process_candidate(candidate).await;
            if !report.succeeded() {
                log.warn(format!("{} stopped at {}", path.display(), report.state));
            }
            results.push(report);
        }

        let mut report = ManualRunReport {
            run_id,
            folder: folder.to_path_buf(),
            files_matched: scan.files_matched,
            unmatched_series: scan.unmatched_series,
            skipped: scan.skipped,
            results,
            log,
        };
        let summary = format!(
            "Manual run finished: {} processed, {} failed",
            report.processed(),
            report.failed()
        );
        report.log.info(summary);
        report
    }

    async fn run_download(&self, job: &DownloadJob, run: &mut Run) -> Step<()> {
        let folder = match &self.library.download_dir_override {
            Some(dir) => {
                let folder = dir.join(&job.name);
                run.log.info(format!(
                    "Download directory override in effect, using {}",
                    folder.display()
                ));
                folder
            }
            None => job.folder.clone(),
        };
        run.log.info(format!(
            "Post-processing {} from {}",
            job.name,
            folder.display()
        ));

        run.enter(PipelineState::Resolve);
        let resolution = self.resolver.resolve(&job.name).map_err(|e| {
            run.log.error(format!("Unable to resolve download: {}", e));
            if e.is_catalog_failure() {
                PipelineState::CatalogUnavailable
            } else {
                PipelineState::Unresolvable
            }
        })?;
        if resolution.retried {
            run.log.info(format!(
                "Found the download after correcting the name to {}",
                resolution.download_name
            ));
        }
        run.issue_ref = Some(resolution.issue_ref.clone());

        let source = Self::locate_source(&folder, run)?;

        let (series_id, issue_id, kind) = match &resolution.issue_ref {
            IssueRef::Watchlist {
                series_id,
                issue_id,
                kind,
            } => (series_id.as_str(), issue_id.as_str(), *kind),
            _ => return self.run_one_off(&folder, &resolution, source, run).await,
        };

        let (series, issue) = self.load_issue(series_id, issue_id, kind, run)?;
        self.file_issue(
            IssueFiling {
                job_name: &job.name,
                job_folder: &folder,
                series: &series,
                issue: &issue,
                source,
                exact_file: false,
                cleanup: folder.is_dir().then(|| folder.clone()),
            },
            run,
        )
        .await?;

        run.enter(PipelineState::UpdateTracking);
        self.consume_tracking_entry(&resolution.download_name, run)?;
        self.mark_downloaded(&series, &issue, run)?;

        self.notify(&series, &issue, run).await;

        if let Some(runner) = &self.post_script {
            let metadata = ScriptMetadata::single(SeriesMeta::from_catalog(&series, &issue));
            if let (Some(final_path), Some(metadata)) =
                (run.final_path.clone(), Self::metadata_json(&metadata, run))
            {
                let args = ScriptArgs::Post {
                    job_name: job.name.clone(),
                    job_folder: folder.display().to_string(),
                    file_name: file_name_of(&final_path),
                    folder: final_path
                        .parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    metadata,
                };
                Self::run_script(runner.as_ref(), args, run).await;
            }
        }

        Ok(())
    }

    /// One-off, multi-volume and story-arc downloads: no tagging, no
    /// renaming, no scripts, no status update or rescan.
    async fn run_one_off(
        &self,
        folder: &Path,
        resolution: &Resolution,
        source: PathBuf,
        run: &mut Run,
    ) -> Step<()> {
        run.enter(PipelineState::OneOffRoute);
        let issue_ref = &resolution.issue_ref;
        run.log.info(format!(
            "{} download {}, filing outside the watchlist",
            issue_ref.label(),
            issue_ref.issue_id()
        ));

        let arc_entry = match issue_ref {
            IssueRef::StoryArc { issue_arc_id, .. } => self
                .catalog
                .get_reading_list_entry(issue_arc_id)
                .map_err(|e| run.catalog_failure("Unable to read the reading list", e))?,
            _ => None,
        };

        // The reading list knows the arc name when the tracking entry does not.
        let routed = match (issue_ref, &arc_entry) {
            (
                IssueRef::StoryArc {
                    issue_arc_id,
                    arc_name: None,
                },
                Some(entry),
            ) => IssueRef::StoryArc {
                issue_arc_id: issue_arc_id.clone(),
                arc_name: Some(entry.arc_name.clone()),
            },
            _ => issue_ref.clone(),
        };

        run.enter(PipelineState::PlanDestination);
        let destination = self.planner.plan_one_off(
            &routed,
            &file_name_of(&source),
            arc_entry.as_ref().map(|e| e.reading_order),
        );

        run.enter(PipelineState::Relocate);
        let mut job = RelocationJob::new(source, destination);
        if folder.is_dir() {
            job = job.with_cleanup(folder.to_path_buf());
        }
        let result = self.relocate(job, run).await?;

        run.enter(PipelineState::UpdateTracking);
        self.consume_tracking_entry(&resolution.download_name, run)?;

        match arc_entry {
            Some(mut entry) => {
                entry.status = IssueStatus::Downloaded;
                entry.location = Some(result.final_path.clone());
                self.catalog
                    .upsert_reading_list_entry(&entry)
                    .map_err(|e| run.catalog_failure("Unable to update the reading list", e))?;
                run.log.info(format!(
                    "Reading list for {} updated: #{} downloaded",
                    entry.arc_name, entry.reading_order
                ));
            }
            None if matches!(issue_ref, IssueRef::StoryArc { .. }) => {
                run.log.warn(format!(
                    "No reading-list entry for story-arc issue {}",
                    issue_ref.issue_id()
                ));
            }
            None => {}
        }

        Ok(())
    }

    async fn process_candidate(&self, candidate: ManualCandidate) -> PostProcessReport {
        let mut run = Run::new(MANUAL_RUN, JobOrigin::Manual);
        let state = match self.run_candidate(&candidate, &mut run).await {
            Ok(()) => PipelineState::Done,
            Err(state) => state,
        };
        run.finish(state)
    }

    /// A manual candidate: renamed and moved, never cleaned up, no
    /// notifications or post-script.
    async fn run_candidate(&self, candidate: &ManualCandidate, run: &mut Run) -> Step<()> {
        let ManualCandidate {
            series,
            issue,
            path,
        } = candidate;
        run.issue_ref = Some(IssueRef::Watchlist {
            series_id: series.id.clone(),
            issue_id: issue.id.clone(),
            kind: issue.kind,
        });
        run.source = Some(path.clone());
        run.log.info(format!(
            "Processing {} as {} #{}",
            path.display(),
            series.name,
            issue.issue_number
        ));

        if !path.is_file() {
            run.log.error(format!("{} no longer exists", path.display()));
            return Err(PipelineState::MissingSourceFile);
        }

        let folder = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.file_issue(
            IssueFiling {
                job_name: MANUAL_RUN,
                job_folder: &folder,
                series,
                issue,
                source: path.clone(),
                exact_file: true,
                cleanup: None,
            },
            run,
        )
        .await?;

        run.enter(PipelineState::UpdateTracking);
        let removed = self
            .catalog
            .remove_tracking_entries_for_issue(&issue.id)
            .map_err(|e| run.catalog_failure("Unable to clear the tracking log", e))?;
        if removed > 0 {
            run.log.debug(format!("Removed {} tracking entries", removed));
        }
        self.mark_downloaded(series, issue, run)?;
        Ok(())
    }

    /// Normalize, tag, pre-script, plan and relocate a catalog issue.
    async fn file_issue(&self, filing: IssueFiling<'_>, run: &mut Run) -> Step<RelocationResult> {
        let IssueFiling {
            job_name,
            job_folder,
            series,
            issue,
            mut source,
            exact_file,
            cleanup,
        } = filing;

        run.enter(PipelineState::Normalize);
        let normalized = self.normalizer.normalize(&issue.issue_number, issue.kind);
        run.log.info(format!(
            "{} issue {} -> {}",
            series.name, issue.issue_number, normalized.pretty
        ));

        if let Some(tagger) = &self.tagger {
            run.enter(PipelineState::TagMetadata);
            let request = TagRequest {
                issue_id: issue.id.clone(),
                folder: job_folder.to_path_buf(),
                file: exact_file.then(|| source.clone()),
            };
            source = Self::tag(tagger.as_ref(), request, source, run).await?;
            run.source = Some(source.clone());
        }

        let metadata = ScriptMetadata::single(SeriesMeta::from_catalog(series, issue));
        self.run_pre_script(job_name, job_folder, &metadata, run).await;

        run.enter(PipelineState::PlanDestination);
        let destination =
            self.planner
                .plan_watchlist(series, issue, &normalized.pretty, &file_name_of(&source));
        run.log.info(format!("New filename: {}", destination.file_name));

        run.enter(PipelineState::Relocate);
        let mut job = RelocationJob::new(source, destination);
        if let Some(folder) = cleanup {
            job = job.with_cleanup(folder);
        }
        self.relocate(job, run).await
    }

    fn locate_source(folder: &Path, run: &mut Run) -> Step<PathBuf> {
        match first_archive(folder) {
            Some(path) => {
                run.log.debug(format!("Source file: {}", path.display()));
                run.source = Some(path.clone());
                Ok(path)
            }
            None => {
                run.log.error(format!(
                    "No .cbr/.cbz file found in {}",
                    folder.display()
                ));
                Err(PipelineState::MissingSourceFile)
            }
        }
    }

    fn load_issue(
        &self,
        series_id: &str,
        issue_id: &str,
        kind: IssueKind,
        run: &mut Run,
    ) -> Step<(CatalogSeries, CatalogIssue)> {
        let series = self
            .catalog
            .get_series(series_id)
            .map_err(|e| run.catalog_failure("Unable to load the series", e))?;
        let Some(series) = series else {
            run.log.error(format!("Series {} is not in the catalog", series_id));
            return Err(PipelineState::Unresolvable);
        };

        let issue = self
            .catalog
            .get_issue(issue_id, kind)
            .map_err(|e| run.catalog_failure("Unable to load the issue", e))?;
        let Some(issue) = issue else {
            run.log.error(format!(
                "{} issue {} is not in the catalog",
                kind.as_str(),
                issue_id
            ));
            return Err(PipelineState::Unresolvable);
        };

        Ok((series, issue))
    }

    async fn tag(
        tagger: &dyn MetadataTagger,
        request: TagRequest,
        source: PathBuf,
        run: &mut Run,
    ) -> Step<PathBuf> {
        let label = |result: &str| {
            metrics::TAGGING_RESULTS.with_label_values(&[result]).inc();
        };

        match tagger.tag(request).await {
            Ok(TagOutcome::Tagged { path }) => {
                label("tagged");
                run.log.info(format!("Metadata written to {}", path.display()));
                Ok(path)
            }
            Ok(TagOutcome::Failed { reason }) => {
                label("failed");
                run.log.warn(format!(
                    "Tagging failed, continuing with the untagged file: {}",
                    reason
                ));
                Ok(source)
            }
            Ok(TagOutcome::CorruptArchive { reason }) => {
                label("corrupt");
                run.log.error(format!(
                    "Archive is corrupt, retry with another copy: {}",
                    reason
                ));
                Err(PipelineState::CorruptArchive)
            }
            Err(e) => {
                label("error");
                run.log.warn(format!(
                    "{} tagger could not run, continuing with the untagged file: {}",
                    tagger.name(),
                    e
                ));
                Ok(source)
            }
        }
    }

    async fn relocate(&self, job: RelocationJob, run: &mut Run) -> Step<RelocationResult> {
        match self.relocator.relocate(job).await {
            Ok(result) => {
                run.log.info(format!("Moved to {}", result.final_path.display()));
                if result.cleaned_up {
                    run.log.info("Removed the download folder");
                }
                run.final_path = Some(result.final_path.clone());
                Ok(result)
            }
            Err(e) => {
                run.log.error(format!("Relocation failed: {}", e));
                Err(e.terminal_state())
            }
        }
    }

    fn consume_tracking_entry(&self, download_name: &str, run: &mut Run) -> Step<()> {
        let removed = self
            .catalog
            .remove_tracking_entry(download_name)
            .map_err(|e| run.catalog_failure("Unable to clear the tracking log", e))?;
        if !removed {
            run.log.warn(format!(
                "Tracking entry {} was already gone",
                download_name
            ));
        }
        Ok(())
    }

    fn mark_downloaded(
        &self,
        series: &CatalogSeries,
        issue: &CatalogIssue,
        run: &mut Run,
    ) -> Step<()> {
        self.updater
            .mark_downloaded(&issue.id, issue.kind)
            .map_err(|e| run.catalog_failure("Unable to mark the issue downloaded", e))?;
        self.updater
            .request_rescan(&series.id)
            .map_err(|e| run.catalog_failure("Unable to request a rescan", e))?;
        run.log.info(format!(
            "{} #{} marked downloaded, rescan requested",
            series.name, issue.issue_number
        ));
        Ok(())
    }

    async fn notify(&self, series: &CatalogSeries, issue: &CatalogIssue, run: &mut Run) {
        if self.notifiers.is_empty() {
            return;
        }
        run.enter(PipelineState::Notify);

        let year = issue
            .release_year()
            .map(str::to_string)
            .or_else(|| series.start_year.map(|y| y.to_string()))
            .unwrap_or_default();
        let message = NotificationMessage::download_complete(&series.name, &year, &issue.issue_number);

        for notifier in &self.notifiers {
            match notifier.notify(&message).await {
                Ok(()) => {
                    metrics::NOTIFICATIONS_SENT
                        .with_label_values(&[notifier.name(), "success"])
                        .inc();
                    run.log.debug(format!("{} notification sent", notifier.name()));
                }
                Err(e) => {
                    metrics::NOTIFICATIONS_SENT
                        .with_label_values(&[notifier.name(), "failure"])
                        .inc();
                    run.log
                        .warn(format!("{} notification failed: {}", notifier.name(), e));
                }
            }
        }
    }

    async fn run_pre_script(
        &self,
        job_name: &str,
        job_folder: &Path,
        metadata: &ScriptMetadata,
        run: &mut Run,
    ) {
        let Some(runner) = &self.pre_script else {
            return;
        };
        let Some(metadata) = Self::metadata_json(metadata, run) else {
            return;
        };
        let args = ScriptArgs::Pre {
            job_name: job_name.to_string(),
            job_folder: job_folder.display().to_string(),
            metadata,
        };
        Self::run_script(runner.as_ref(), args, run).await;
    }

    fn metadata_json(metadata: &ScriptMetadata, run: &mut Run) -> Option<String> {
        match metadata.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                run.log
                    .warn(format!("Unable to encode script metadata: {}", e));
                None
            }
        }
    }

    async fn run_script(runner: &dyn ScriptRunner, args: ScriptArgs, run: &mut Run) {
        let phase = args.phase();
        run.log.info(format!("Running {}-processing script", phase));

        match runner.run(args).await {
            Ok(output) => {
                for line in output.output.lines().filter(|l| !l.trim().is_empty()) {
                    run.log.info(format!("[{}-script] {}", phase, line));
                }
                if !output.success() {
                    run.log.warn(format!(
                        "{}-processing script exited with code {:?}",
                        phase, output.exit_code
                    ));
                }
            }
            Err(e) => {
                run.log
                    .warn(format!("{}-processing script failed: {}", phase, e));
            }
        }
    }
}
