pub mod catalog;
pub mod config;
pub mod issue;
pub mod metrics;
pub mod notify;
pub mod planner;
pub mod postprocess;
pub mod relocator;
pub mod resolver;
pub mod scanner;
pub mod scripts;
pub mod tagger;
pub mod testing;
pub mod updater;

pub use catalog::{CatalogError, ComicCatalog, SqliteCatalog};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use issue::{IssueKind, IssueNormalizer, NormalizedIssue, OrderKey, PaddingPolicy};
pub use postprocess::{
    DownloadJob, JobOrigin, ManualRunReport, PipelineState, PostProcessReport, PostProcessor,
    ProcessOutcome, RunLog, SetupError, MANUAL_RUN,
};
pub use resolver::{DownloadResolver, IssueRef};
