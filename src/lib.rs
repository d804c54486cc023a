//! Mirror ranking library: probe, score, reconcile, and rank public mirrors.

pub mod candidates;
pub mod config;
pub mod observability;
pub mod pipeline;
pub mod probe;
pub mod publish;
pub mod reconcile;
pub mod report;
pub mod scoring;

pub use config::RankerConfig;
pub use pipeline::{run, RunReport};
pub use probe::{HttpProber, Prober};
pub use reconcile::DynamicInstanceSet;
