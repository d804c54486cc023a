//! Candidate sources.
//!
//! # Data Flow
//! ```text
//! unified_instances.txt (blank-line separated records)
//!     → source.rs (parse records → Candidate with per-dialect base URLs)
//!
//! unified_instances.json (primary URL → secondary URL)
//!     → association.rs (AssociationTable, gaps filled from unified records)
//! ```
//!
//! # Design Decisions
//! - Candidates are immutable for the duration of a run
//! - Base URLs are normalized (no trailing slash) so they can be used as identifiers
//! - Unparseable and duplicate records are kept unprobed so the ordering file
//!   is rewritten without losing any of them

pub mod association;
pub mod source;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::Dialect;

pub use association::{load_association, AssociationTable};
pub use source::{parse_candidates, read_candidates};

/// Errors reading candidate inputs.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid association table {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A mirror operator and the base URLs of the dialects it hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Operator name, first field of the source record.
    pub name: String,
    /// Source record text, written back verbatim when the ordering is persisted.
    pub record: String,
    urls: BTreeMap<Dialect, String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record: record.into(),
            urls: BTreeMap::new(),
        }
    }

    /// A record kept verbatim but never probed.
    pub fn passthrough(record: &str) -> Self {
        let name = record.split(',').next().unwrap_or_default().trim();
        Self::new(name, record)
    }

    /// Attach a base URL for a dialect.
    pub fn with_url(mut self, dialect: Dialect, url: &str) -> Self {
        self.urls.insert(dialect, normalize_base(url));
        self
    }

    /// Whether any dialect will be probed for this candidate.
    pub fn is_probed(&self) -> bool {
        !self.urls.is_empty()
    }

    /// Base URL for a dialect, if this candidate hosts it.
    pub fn base_url(&self, dialect: Dialect) -> Option<&str> {
        self.urls.get(&dialect).map(String::as_str)
    }
}

/// Normalize a base URL into its identifier form.
pub fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
