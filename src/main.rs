//! Mirror ranker (v1)
//!
//! Probes every candidate mirror in each API dialect, ranks them by latency
//! score, reconciles paired mirrors across dialects, and publishes the result.
//!
//! # Architecture Overview
//!
//! ```text
//!   unified_instances.txt ──┐
//!   unified_instances.json ─┤
//!                           ▼
//!                    ┌─────────────┐     ┌──────────┐     ┌────────┐
//!                    │ candidates  │────▶│  probe   │────▶│scoring │
//!                    └─────────────┘     │(fan-out) │     │ + rank │
//!                                        └──────────┘     └───┬────┘
//!                                                             │
//!                    ┌─────────────┐     ┌──────────┐     ┌───▼──────┐
//!   git remote ◀─────│  publish    │◀────│  report  │◀────│reconcile │
//!                    │ files + git │     │  (diff)  │     │+fallback │
//!                    └─────────────┘     └──────────┘     └──────────┘
//! ```
//!
//! Invocation is parameterless: fixed-name inputs are read from and outputs
//! written to the working directory.

use std::path::{Path, PathBuf};

use clap::Parser;

use mirror_ranker::candidates::{load_association, read_candidates};
use mirror_ranker::config::load_or_default;
use mirror_ranker::observability::{logging, metrics};
use mirror_ranker::publish::{commit_message, write_instance_set, write_ordering, GitPublisher, Publisher};
use mirror_ranker::{pipeline, HttpProber};

#[derive(Parser)]
#[command(name = "mirror-ranker")]
#[command(about = "Rank public mirrors and publish the reconciled instance set", long_about = None)]
struct Cli {
    /// Optional TOML config; defaults apply when the file is absent.
    #[arg(short, long, default_value = "mirror-ranker.toml")]
    config: PathBuf,

    /// Write local files only.
    #[arg(long)]
    no_publish: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;

    logging::init(&config.observability.log_level);
    tracing::info!(
        timeout_ms = config.probe.timeout_ms,
        canaries = config.probe.canary_streams.len(),
        "mirror-ranker v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let recorder = match &config.observability.metrics_file {
        Some(path) => Some((metrics::install()?, PathBuf::from(path))),
        None => None,
    };

    let candidates_path = PathBuf::from(&config.files.candidates);
    let output_path = PathBuf::from(&config.files.output);

    let candidates = read_candidates(&candidates_path)?;
    let table = load_association(Path::new(&config.files.association), &candidates)?;
    let prober = HttpProber::new(&config)?;

    let report = pipeline::run(&prober, &config.fallback, &candidates, &table).await;

    write_instance_set(&output_path, &report.instances)?;
    if report.ordering.is_empty() {
        tracing::warn!(path = %candidates_path.display(), "No candidates parsed, leaving ordering file untouched");
    } else {
        write_ordering(&candidates_path, &report.ordering)?;
    }

    if config.publish.enabled && !cli.no_publish {
        let publisher = GitPublisher::new(config.publish.clone(), ".");
        let message = commit_message(&report.diff, &config.publish.default_message);
        if let Err(e) = publisher.publish(&[candidates_path, output_path], &message).await {
            tracing::error!(error = %e, "Publish failed, local files kept");
        }
    }

    if let Some((handle, path)) = &recorder {
        if let Err(e) = metrics::write_snapshot(handle, path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write metrics snapshot");
        }
    }

    tracing::info!(status = report.instances.status, "Done");
    Ok(())
}
