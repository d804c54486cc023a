//! Local result files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::candidates::Candidate;
use crate::reconcile::DynamicInstanceSet;

/// Errors writing result files.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize instance set: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON with 4-space indentation.
pub fn render_instance_set(set: &DynamicInstanceSet) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    set.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Candidate records in order, separated by blank lines.
pub fn render_ordering(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| c.record.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn write_instance_set(path: &Path, set: &DynamicInstanceSet) -> Result<(), PersistError> {
    let json = render_instance_set(set)?;
    write(path, &json)?;
    tracing::info!(path = %path.display(), status = set.status, "Wrote instance set");
    Ok(())
}

pub fn write_ordering(path: &Path, candidates: &[Candidate]) -> Result<(), PersistError> {
    write(path, &render_ordering(candidates))?;
    tracing::info!(path = %path.display(), count = candidates.len(), "Wrote candidate ordering");
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<(), PersistError> {
    fs::write(path, contents).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}
