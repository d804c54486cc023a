//! Persistence and publishing.
//!
//! # Data Flow
//! ```text
//! RunReport
//!     → output.rs (dynamic_instances.json + rewritten candidate ordering)
//!     → git.rs (git add → commit with diff message → push)
//! ```
//!
//! # Design Decisions
//! - Local files are written first; publish failures never roll them back
//! - A failed commit (e.g. nothing changed) does not prevent the push attempt

pub mod git;
pub mod output;

pub use git::{commit_message, GitPublisher, PublishError, Publisher};
pub use output::{render_instance_set, render_ordering, write_instance_set, write_ordering, PersistError};
