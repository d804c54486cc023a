//! Discrete probe outcomes.

use std::time::Duration;

/// Why a sub-check contributed nothing.
///
/// Every kind collapses to a zero score; the distinction only surfaces in
/// logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection refused, DNS failure, or timeout.
    NetworkFailure,
    /// Non-success status or a response missing the expected shape.
    ProtocolMismatch,
    /// Payload failed its content-type or consistency check.
    ContentValidationFailure,
    /// Nothing to probe: no association entry, canary, or usable URL.
    ConfigurationGap,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NetworkFailure => "network_failure",
            FailureKind::ProtocolMismatch => "protocol_mismatch",
            FailureKind::ContentValidationFailure => "content_validation_failure",
            FailureKind::ConfigurationGap => "configuration_gap",
        }
    }
}

/// Result of one sub-check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    Success { score: f64 },
    Failure { kind: FailureKind },
}

impl ProbeOutcome {
    /// Successful outcome scored by latency.
    pub fn from_latency(elapsed: Duration, score_constant: f64, weight: f64) -> Self {
        ProbeOutcome::Success {
            score: latency_score(elapsed, score_constant, weight),
        }
    }

    pub fn failure(kind: FailureKind) -> Self {
        ProbeOutcome::Failure { kind }
    }

    pub fn score(&self) -> f64 {
        match self {
            ProbeOutcome::Success { score } => *score,
            ProbeOutcome::Failure { .. } => 0.0,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Success { .. } => "success",
            ProbeOutcome::Failure { kind } => kind.as_str(),
        }
    }
}

/// Result of a consistency probe between a primary mirror and its secondary peer.
///
/// The `*_down` flags record which side's own fetch hit a network failure, so
/// only the unreachable mirror is treated as hard-failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairOutcome {
    pub outcome: ProbeOutcome,
    pub primary_down: bool,
    pub secondary_down: bool,
}

impl PairOutcome {
    pub fn new(outcome: ProbeOutcome) -> Self {
        Self {
            outcome,
            primary_down: false,
            secondary_down: false,
        }
    }

    pub fn with_primary_down(mut self) -> Self {
        self.primary_down = true;
        self
    }

    pub fn with_secondary_down(mut self) -> Self {
        self.secondary_down = true;
        self
    }

    pub fn succeeded(&self) -> bool {
        self.outcome.succeeded()
    }
}

/// `weight * k / elapsed_ms`, with elapsed clamped to at least one millisecond.
pub fn latency_score(elapsed: Duration, score_constant: f64, weight: f64) -> f64 {
    let elapsed_ms = (elapsed.as_nanos() as f64 / 1_000_000.0).max(1.0);
    weight * score_constant / elapsed_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_score() {
        assert_eq!(latency_score(Duration::from_millis(200), 100_000.0, 1.0), 500.0);
        assert_eq!(latency_score(Duration::from_millis(200), 100_000.0, 2.0), 1000.0);
        // Sub-millisecond responses do not blow up the score.
        assert_eq!(latency_score(Duration::ZERO, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_lower_latency_scores_higher() {
        let fast = ProbeOutcome::from_latency(Duration::from_millis(50), 1.0, 1.0);
        let slow = ProbeOutcome::from_latency(Duration::from_millis(900), 1.0, 1.0);
        assert!(fast.score() > slow.score());
    }

    #[test]
    fn test_pair_outcome_sides() {
        let pair = PairOutcome::new(ProbeOutcome::failure(FailureKind::NetworkFailure)).with_secondary_down();
        assert!(!pair.succeeded());
        assert!(!pair.primary_down);
        assert!(pair.secondary_down);
    }

    #[test]
    fn test_failure_scores_zero() {
        let outcome = ProbeOutcome::failure(FailureKind::NetworkFailure);
        assert_eq!(outcome.score(), 0.0);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.label(), "network_failure");
    }
}
