//! Candidate ranking.

use std::collections::BTreeMap;

use crate::config::Dialect;
use crate::scoring::CandidateScore;

/// Identifiers ordered best first. Never contains a non-positive score.
pub type RankedList = Vec<String>;

/// Stable-sort descending by score and drop entries with `score <= 0`.
pub fn rank(scores: &[CandidateScore]) -> RankedList {
    let mut positive: Vec<&CandidateScore> = scores.iter().filter(|s| s.score > 0.0).collect();
    positive.sort_by(|a, b| b.score.total_cmp(&a.score));
    positive.into_iter().map(|s| s.identifier.clone()).collect()
}

/// Rank every dialect's scores.
pub fn rank_all(scores: &BTreeMap<Dialect, Vec<CandidateScore>>) -> BTreeMap<Dialect, RankedList> {
    scores
        .iter()
        .map(|(dialect, scores)| (*dialect, rank(scores)))
        .collect()
}
