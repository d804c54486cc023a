//! One probe/score/reconcile/rank run.
//!
//! # Data Flow
//! ```text
//! candidates × dialects
//!     → Prober::probe (all launched at once, single join barrier)
//!     → CandidateScore per (candidate, dialect)
//!     → RankedList per dialect
//!     → reconcile(primary, secondary, association table)
//!     → InstanceSetBuilder (categories, fallback, tertiary, status)
//!     → RunReport { instances, ordering, diff }
//! ```
//!
//! # Design Decisions
//! - No shared mutable state between probes; results are merged after the barrier
//! - The candidate ordering is by total score across dialects and keeps
//!   zero-score candidates (in input order) so none drop out of the source file
//! - The input order of `candidates` is the previous run's ordering

use std::collections::BTreeMap;

use futures_util::future::join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::candidates::{AssociationTable, Candidate};
use crate::config::{Dialect, FallbackConfig};
use crate::observability::metrics;
use crate::probe::Prober;
use crate::reconcile::{
    reconcile, resolve_category, DynamicInstanceSet, InstanceSetBuilder, ReconciliationResult,
};
use crate::report::diff_message;
use crate::scoring::{rank_all, CandidateScore, RankedList};

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub instances: DynamicInstanceSet,
    /// Candidates in new rank order.
    pub ordering: Vec<Candidate>,
    pub scores: BTreeMap<Dialect, Vec<CandidateScore>>,
    pub ranked: BTreeMap<Dialect, RankedList>,
    pub reconciliation: ReconciliationResult,
    /// Movement summary against the input order.
    pub diff: String,
}

impl RunReport {
    /// Score of one identifier in one dialect, if it was probed.
    pub fn score(&self, dialect: Dialect, identifier: &str) -> Option<f64> {
        self.scores
            .get(&dialect)?
            .iter()
            .find(|s| s.identifier == identifier)
            .map(|s| s.score)
    }
}

/// Execute a full run against `candidates`.
pub async fn run<P: Prober>(
    prober: &P,
    policy: &FallbackConfig,
    candidates: &[Candidate],
    table: &AssociationTable,
) -> RunReport {
    execute(Uuid::new_v4(), prober, policy, candidates, table).await
}

#[instrument(name = "run", skip_all, fields(run_id = %run_id))]
async fn execute<P: Prober>(
    run_id: Uuid,
    prober: &P,
    policy: &FallbackConfig,
    candidates: &[Candidate],
    table: &AssociationTable,
) -> RunReport {
    let jobs: Vec<(usize, Dialect, &str)> = candidates
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            Dialect::ALL
                .into_iter()
                .filter_map(move |d| c.base_url(d).map(|url| (i, d, url)))
        })
        .collect();

    tracing::info!(candidates = candidates.len(), probes = jobs.len(), "Launching probes");
    let results = join_all(jobs.iter().map(|&(_, dialect, url)| prober.probe(url, dialect))).await;

    let mut scores: BTreeMap<Dialect, Vec<CandidateScore>> =
        Dialect::ALL.into_iter().map(|d| (d, Vec::new())).collect();
    let mut totals = vec![0.0_f64; candidates.len()];
    for (&(i, dialect, url), outcomes) in jobs.iter().zip(&results) {
        let score = CandidateScore::from_outcomes(url, outcomes);
        totals[i] += score.score;
        scores.entry(dialect).or_default().push(score);
    }

    let ranked = rank_all(&scores);
    for (dialect, list) in &ranked {
        tracing::info!(%dialect, ranked = list.len(), "Ranked mirrors");
        metrics::record_ranked(*dialect, list.len());
    }

    let empty = RankedList::new();
    let ranked_primary = ranked.get(&Dialect::Primary).unwrap_or(&empty);
    let ranked_secondary = ranked.get(&Dialect::Secondary).unwrap_or(&empty);
    let tertiary = ranked
        .get(&Dialect::Tertiary)
        .and_then(|list| list.first())
        .cloned();

    let reconciliation = reconcile(prober, ranked_primary, ranked_secondary, table).await;

    let instances = InstanceSetBuilder::new(policy.status_baseline)
        .primary(resolve_category(
            reconciliation.confirmed_primary(),
            &reconciliation.fallback,
            policy.primary_limit,
        ))
        .secondary(resolve_category(
            reconciliation.secondary_published(ranked_secondary),
            &reconciliation.secondary_fallback(ranked_secondary),
            policy.secondary_limit,
        ))
        .fallback(reconciliation.usable_fallback())
        .tertiary(tertiary)
        .build();
    metrics::record_run_status(instances.status);

    // Stable: equal totals, including all zero scores, keep input order.
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));
    let ordering: Vec<Candidate> = order.iter().map(|&i| candidates[i].clone()).collect();

    let previous: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
    let current: Vec<String> = ordering.iter().map(|c| c.name.clone()).collect();
    let diff = diff_message(&previous, &current);

    tracing::info!(
        status = instances.status,
        primary = instances.primary.len(),
        secondary = instances.secondary.len(),
        diff = %diff,
        "Run complete"
    );

    RunReport {
        run_id,
        instances,
        ordering,
        scores,
        ranked,
        reconciliation,
        diff,
    }
}
