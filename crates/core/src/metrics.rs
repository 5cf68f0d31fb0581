//! Prometheus metrics for the scan pipeline.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Scans started.
pub static SCANS_STARTED: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("spoor_scans_started_total", "Total scans started").unwrap());

/// Scans completed successfully.
pub static SCANS_COMPLETED: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("spoor_scans_completed_total", "Total scans completed").unwrap());

/// Scans failed, by failure kind.
pub static SCANS_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("spoor_scans_failed_total", "Total scans failed"),
        &["kind"], // "feature_disabled", "invalid_response", "api_error"
    )
    .unwrap()
});

/// Wiki summary lookups, by outcome.
pub static WIKI_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("spoor_wiki_lookups_total", "Total wiki summary lookups"),
        &["outcome"], // "ok", "not_found", "network", "decode"
    )
    .unwrap()
});

/// Register all core metrics with the given registry.
pub fn register_core_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(SCANS_STARTED.clone()))?;
    registry.register(Box::new(SCANS_COMPLETED.clone()))?;
    registry.register(Box::new(SCANS_FAILED.clone()))?;
    registry.register(Box::new(WIKI_LOOKUPS.clone()))?;
    Ok(())
}
