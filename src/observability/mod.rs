//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, run span with run id)
//!     → metrics.rs (probe outcome counters, run status gauge)
//!
//! Consumers:
//!     → Log aggregation (stdout of the scheduled job)
//!     → Prometheus text snapshot (observability.metrics_file), or any
//!       recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (instance, dialect, check) on every probe event
//! - Metrics go through the `metrics` facade; without a recorder they are no-ops

pub mod logging;
pub mod metrics;
