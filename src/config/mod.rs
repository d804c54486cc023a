//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! mirror-ranker.toml (optional)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → validation.rs (semantic checks)
//!     → RankerConfig (validated, immutable)
//!     → shared by reference with every pipeline stage
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the duration of a run
//! - All fields have defaults to allow minimal configs
//! - Dialect recipes are data, so adding a dialect check touches only config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    ConsistencyConfig, Dialect, DialectsConfig, FallbackConfig, FilesConfig, FollowUp, MediaPick, ObservabilityConfig,
    ProbeConfig, ProbeStep, PublishConfig, RankerConfig, UrlRewrite, Validator,
};
