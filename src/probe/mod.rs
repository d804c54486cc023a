//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! (candidate base URL, dialect)
//!     → recipe.rs (expand {canary} steps into concrete checks)
//!     → executor.rs (timed GET → validate → optional media follow-up)
//!     → outcome.rs (Success { score } | Failure { kind }) per sub-check
//! ```
//!
//! # Design Decisions
//! - Latency clock restarts at every sub-step; sub-step scores are summed later
//! - A failed sub-step only zeroes its own contribution
//! - No retries; the next scheduled run is the retry
//! - Timeouts come from the HTTP client, no extra timer layer

pub mod executor;
pub mod outcome;
pub mod recipe;

pub use executor::{HttpProber, ProbeError, Prober};
pub use outcome::{FailureKind, PairOutcome, ProbeOutcome};
