//! Run-over-run change reporting.

pub mod diff;

pub use diff::{diff_message, movements, Move, Movement};
