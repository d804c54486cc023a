//! Static primary → secondary association table.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::candidates::{normalize_base, Candidate, SourceError};
use crate::config::Dialect;

/// Read-only mapping from a primary-dialect identifier to its secondary-dialect peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationTable {
    pairs: HashMap<String, String>,
}

impl AssociationTable {
    /// Build a table from `(primary, secondary)` pairs.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(a, b)| (normalize_base(a.as_ref()), normalize_base(b.as_ref())))
                .collect(),
        }
    }

    /// Parse a JSON object document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, String> = serde_json::from_str(text)?;
        Ok(Self::from_pairs(raw))
    }

    /// Add each candidate's own primary/secondary pairing where the table has no entry.
    pub fn fill_from_candidates(mut self, candidates: &[Candidate]) -> Self {
        for candidate in candidates {
            if let (Some(a), Some(b)) = (
                candidate.base_url(Dialect::Primary),
                candidate.base_url(Dialect::Secondary),
            ) {
                self.pairs.entry(a.to_string()).or_insert_with(|| b.to_string());
            }
        }
        self
    }

    pub fn get(&self, primary: &str) -> Option<&str> {
        self.pairs.get(primary).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Load the association file, completing it from the unified candidate records.
///
/// A missing file is not an error; malformed JSON is.
pub fn load_association(path: &Path, candidates: &[Candidate]) -> Result<AssociationTable, SourceError> {
    let table = match fs::read_to_string(path) {
        Ok(text) => AssociationTable::from_json(&text).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Association file missing, using unified records only");
            AssociationTable::default()
        }
        Err(source) => {
            return Err(SourceError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let table = table.fill_from_candidates(candidates);
    tracing::info!(entries = table.len(), "Association table ready");
    Ok(table)
}
