//! Scoring subsystem.
//!
//! # Data Flow
//! ```text
//! Vec<ProbeOutcome> per (candidate, dialect)
//!     → aggregate.rs (sum → CandidateScore)
//!     → ranker.rs (stable sort descending, drop score <= 0 → RankedList)
//! ```
//!
//! # Design Decisions
//! - Scores are summed, not averaged: passing more checks outweighs raw speed
//!   as long as a single check's score stays below the gap between pass counts.
//!   That bound is not enforced.
//! - Ties keep insertion order (stable sort)

pub mod aggregate;
pub mod ranker;

pub use aggregate::{aggregate, CandidateScore};
pub use ranker::{rank, rank_all, RankedList};
