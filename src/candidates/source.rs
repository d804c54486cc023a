//! Flat-text candidate records.
//!
//! Records are separated by a blank line and have the layout
//! `name, label, primary, secondary, tertiary`. A dialect field is either a
//! subdomain of `name`, a full URL, or empty / `-` when the operator does not
//! host that dialect.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use url::Url;

use crate::candidates::{Candidate, SourceError};
use crate::config::Dialect;

/// Field index of each dialect inside a record.
const DIALECT_FIELDS: [(Dialect, usize); 3] = [
    (Dialect::Primary, 2),
    (Dialect::Secondary, 3),
    (Dialect::Tertiary, 4),
];

/// Read and parse the candidate file.
pub fn read_candidates(path: &Path) -> Result<Vec<Candidate>, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let candidates = parse_candidates(&text);
    tracing::info!(path = %path.display(), count = candidates.len(), "Loaded candidates");
    Ok(candidates)
}

/// Parse blank-line separated candidate records, preserving file order.
///
/// Every record comes back. Malformed records and repeated names carry no
/// base URLs, so they are never probed and end up in the zero-score tail.
pub fn parse_candidates(text: &str) -> Vec<Candidate> {
    let normalized = text.replace("\r\n", "\n");
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for record in normalized.split("\n\n").map(str::trim).filter(|r| !r.is_empty()) {
        let Some(candidate) = parse_record(record) else {
            tracing::warn!(record = %record, "Malformed candidate record, keeping it unprobed");
            candidates.push(Candidate::passthrough(record));
            continue;
        };
        if !seen.insert(candidate.name.clone()) {
            tracing::warn!(name = %candidate.name, "Duplicate candidate, keeping it unprobed");
            candidates.push(Candidate::passthrough(record));
            continue;
        }
        candidates.push(candidate);
    }
    candidates
}

fn parse_record(record: &str) -> Option<Candidate> {
    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    if fields.len() < 2 || fields[0].is_empty() {
        return None;
    }
    let name = fields[0];

    let mut candidate = Candidate::new(name, record);
    for (dialect, index) in DIALECT_FIELDS {
        let Some(field) = fields.get(index) else {
            continue;
        };
        if let Some(url) = dialect_url(name, field) {
            candidate = candidate.with_url(dialect, &url);
        }
    }
    Some(candidate)
}

fn dialect_url(name: &str, field: &str) -> Option<String> {
    if field.is_empty() || field == "-" {
        return None;
    }
    let raw = if field.contains("://") {
        field.to_string()
    } else {
        format!("https://{}.{}", field, name)
    };
    match Url::parse(&raw) {
        Ok(_) => Some(raw),
        Err(e) => {
            tracing::warn!(url = %raw, error = %e, "Ignoring invalid mirror URL");
            None
        }
    }
}
