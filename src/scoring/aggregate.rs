//! Score aggregation.

use crate::probe::ProbeOutcome;

/// Scalar score for one candidate in one dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub identifier: String,
    pub score: f64,
}

impl CandidateScore {
    pub fn new(identifier: impl Into<String>, score: f64) -> Self {
        Self {
            identifier: identifier.into(),
            score,
        }
    }

    /// Sum a candidate's sub-check outcomes.
    pub fn from_outcomes(identifier: impl Into<String>, outcomes: &[ProbeOutcome]) -> Self {
        Self::new(identifier, aggregate(outcomes))
    }
}

/// Sum of sub-check scores; failures contribute zero.
pub fn aggregate(outcomes: &[ProbeOutcome]) -> f64 {
    outcomes.iter().map(ProbeOutcome::score).sum()
}
