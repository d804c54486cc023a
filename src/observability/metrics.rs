//! Metrics collection.
//!
//! # Metrics
//! - `mirror_probe_total` (counter): sub-check outcomes by dialect and outcome
//! - `mirror_consistency_total` (counter): consistency probe outcomes
//! - `mirror_ranked_instances` (gauge): ranked mirrors per dialect
//! - `mirror_run_status` (gauge): published status value
//!
//! A run is a short-lived job, so instead of serving a scrape endpoint the
//! binary can install a Prometheus recorder and dump a text-format snapshot
//! when the run ends.

use std::fs;
use std::path::Path;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::config::Dialect;

/// Install a Prometheus recorder as the global metrics recorder.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Write every recorded metric in Prometheus text format.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    fs::write(path, handle.render())?;
    tracing::info!(path = %path.display(), "Wrote metrics snapshot");
    Ok(())
}

pub fn record_probe(dialect: Dialect, outcome: &'static str) {
    metrics::counter!("mirror_probe_total", "dialect" => dialect.as_str(), "outcome" => outcome)
        .increment(1);
}

pub fn record_consistency(outcome: &'static str) {
    metrics::counter!("mirror_consistency_total", "outcome" => outcome).increment(1);
}

pub fn record_ranked(dialect: Dialect, count: usize) {
    metrics::gauge!("mirror_ranked_instances", "dialect" => dialect.as_str()).set(count as f64);
}

pub fn record_run_status(status: i32) {
    metrics::gauge!("mirror_run_status").set(status as f64);
}
