//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Post-processing runs (final state, duration)
//! - Tagging and notifications
//! - File relocation and manual scans

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Post-processing
// =============================================================================

/// Post-processing runs by final state.
pub static POSTPROCESS_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shortbox_postprocess_runs_total",
            "Total post-processing runs",
        ),
        &["state"], // "done", "unresolvable", "corrupt_archive", ...
    )
    .unwrap()
});

/// Post-processing run duration in seconds.
pub static POSTPROCESS_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shortbox_postprocess_duration_seconds",
            "Duration of a post-processing run",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
        &["mode"], // "automatic", "manual"
    )
    .unwrap()
});

/// Tagging attempts by outcome.
pub static TAGGING_RESULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shortbox_tagging_results_total", "Metadata tagging outcomes"),
        &["result"], // "tagged", "failed", "corrupt", "error"
    )
    .unwrap()
});

/// Notifications by channel and result.
pub static NOTIFICATIONS_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shortbox_notifications_total", "Notifications sent"),
        &["channel", "result"], // result: "success", "failure"
    )
    .unwrap()
});

// =============================================================================
// Files
// =============================================================================

/// Files moved into the library.
pub static FILES_RELOCATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shortbox_files_relocated_total",
        "Total files moved into the library",
    )
    .unwrap()
});

/// Manual scan candidates by result.
pub static MANUAL_CANDIDATES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shortbox_manual_candidates_total",
            "Files considered by manual scans",
        ),
        &["result"], // "matched", "skipped"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(POSTPROCESS_RUNS.clone()),
        Box::new(POSTPROCESS_DURATION.clone()),
        Box::new(TAGGING_RESULTS.clone()),
        Box::new(NOTIFICATIONS_SENT.clone()),
        Box::new(FILES_RELOCATED.clone()),
        Box::new(MANUAL_CANDIDATES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        POSTPROCESS_RUNS.with_label_values(&["done"]).inc();
        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"shortbox_postprocess_runs_total".to_string()));
    }
}
