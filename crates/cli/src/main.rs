mod metrics;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shortbox_core::{
    load_config, validate_config, ComicCatalog, Config, DownloadJob, PostProcessor,
    ProcessOutcome, RunLog, SanitizedConfig, SqliteCatalog,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Post-processing for completed comic downloads.
#[derive(Debug, Parser)]
#[command(name = "shortbox", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = "SHORTBOX_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Print the Prometheus text exposition after the run.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Post-process a finished download.
    Process {
        /// Download name as reported by the download client.
        #[arg(long)]
        name: String,
        /// Folder (or single file) the download was saved to.
        #[arg(long)]
        folder: PathBuf,
    },
    /// Match a folder of existing files against the catalog and file them.
    Manual {
        #[arg(long)]
        folder: PathBuf,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the run finished but a file was not filed.
async fn run(cli: Cli) -> Result<bool> {
    init_tracing(cli.json);

    info!("shortbox {}", VERSION);
    info!("Loading configuration from {:?}", cli.config);
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    let succeeded = match cli.command {
        Command::Config => {
            let sanitized = SanitizedConfig::from(&config);
            println!("{}", serde_json::to_string_pretty(&sanitized)?);
            true
        }
        Command::Process { name, folder } => {
            let processor = build_processor(&config)?;
            let outcome = processor.process(DownloadJob::new(name, folder)).await;
            print_outcome(&outcome);
            outcome.succeeded()
        }
        Command::Manual { folder } => {
            let processor = build_processor(&config)?;
            let outcome = processor.process(DownloadJob::manual(folder)).await;
            print_outcome(&outcome);
            outcome.succeeded()
        }
    };

    if cli.metrics {
        print!("{}", metrics::encode_metrics()?);
    }
    Ok(succeeded)
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_processor(config: &Config) -> Result<PostProcessor> {
    info!("Database path: {:?}", config.database.path);
    let catalog: Arc<dyn ComicCatalog> = Arc::new(
        SqliteCatalog::new(&config.database.path).context("Failed to open the catalog")?,
    );
    info!("Catalog opened");

    let processor = PostProcessor::from_config(config, catalog)
        .context("Failed to set up the post-processor")?;
    info!("Post-processor ready (library: {:?})", config.library.destination_root);
    Ok(processor)
}

fn print_outcome(outcome: &ProcessOutcome) {
    match outcome {
        ProcessOutcome::Download(report) => {
            print_log(&report.log);
            println!("{}: {}", report.job_name, report.state);
        }
        ProcessOutcome::Manual(report) => {
            print_log(&report.log);
            for result in &report.results {
                print_log(&result.log);
            }
            println!(
                "{}: {} processed, {} failed, {} skipped",
                report.folder.display(),
                report.processed(),
                report.failed(),
                report.skipped.len()
            );
        }
    }
}

fn print_log(log: &RunLog) {
    for line in log.lines() {
        println!(
            "{} {:<5} {}",
            line.at.format("%Y-%m-%d %H:%M:%S"),
            format!("{:?}", line.level).to_uppercase(),
            line.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_command() {
        let cli = Cli::try_parse_from([
            "shortbox",
            "--config",
            "/etc/shortbox.toml",
            "process",
            "--name",
            "Saga.005.2013",
            "--folder",
            "/downloads/Saga.005.2013",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/shortbox.toml"));
        match cli.command {
            Command::Process { name, folder } => {
                assert_eq!(name, "Saga.005.2013");
                assert_eq!(folder, PathBuf::from("/downloads/Saga.005.2013"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_manual_with_metrics() {
        let cli = Cli::try_parse_from(["shortbox", "manual", "--folder", "/comics/unsorted", "--metrics"])
            .unwrap();
        assert!(cli.metrics);
        assert!(matches!(cli.command, Command::Manual { .. }));
    }

    #[test]
    fn test_build_processor_from_minimal_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = Config::new(temp.path().join("library"));
        config.database.path = temp.path().join("shortbox.db");

        assert!(build_processor(&config).is_ok());
        assert!(temp.path().join("shortbox.db").exists());
    }
}
