//! Confirmed/fallback split of the primary ranking.

use std::collections::HashSet;

use futures_util::future::join_all;

use crate::candidates::AssociationTable;
use crate::probe::{FailureKind, Prober};

/// A primary-dialect identifier that was not confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEntry {
    pub identifier: String,
    /// Secondary peer the consistency probe ran against, if any.
    pub peer: Option<String>,
    /// The consistency probe could not reach this mirror at all.
    pub hard_failed: bool,
    /// The consistency probe could not reach the peer.
    pub peer_down: bool,
}

impl FallbackEntry {
    fn unpaired(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            peer: None,
            hard_failed: false,
            peer_down: false,
        }
    }
}

/// Outcome of reconciling two ranked lists, both buckets in primary rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub confirmed: Vec<(String, String)>,
    pub fallback: Vec<FallbackEntry>,
}

impl ReconciliationResult {
    /// Confirmed primary identifiers.
    pub fn confirmed_primary(&self) -> Vec<String> {
        self.confirmed.iter().map(|(a, _)| a.clone()).collect()
    }

    /// Confirmed secondary identifiers, first occurrence only.
    pub fn confirmed_secondary(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.confirmed
            .iter()
            .filter(|(_, b)| seen.insert(b.as_str()))
            .map(|(_, b)| b.clone())
            .collect()
    }

    /// Primary fallback identifiers that are still usable.
    pub fn usable_fallback(&self) -> Vec<String> {
        self.fallback
            .iter()
            .filter(|e| !e.hard_failed)
            .map(|e| e.identifier.clone())
            .collect()
    }

    /// Published secondary set: confirmed peers first, then every other ranked
    /// secondary mirror that no consistency probe found unreachable.
    pub fn secondary_published(&self, ranked_secondary: &[String]) -> Vec<String> {
        let mut published = self.confirmed_secondary();
        published.extend(
            self.secondary_fallback(ranked_secondary)
                .into_iter()
                .filter(|e| !e.hard_failed)
                .map(|e| e.identifier),
        );
        published
    }

    /// Ranked secondary mirrors that were not confirmed.
    ///
    /// A mirror is hard-failed when its own side of a consistency probe hit a
    /// network failure.
    pub fn secondary_fallback(&self, ranked_secondary: &[String]) -> Vec<FallbackEntry> {
        let confirmed: HashSet<&str> = self.confirmed.iter().map(|(_, b)| b.as_str()).collect();
        let unreachable: HashSet<&str> = self
            .fallback
            .iter()
            .filter(|e| e.peer_down)
            .filter_map(|e| e.peer.as_deref())
            .collect();

        ranked_secondary
            .iter()
            .filter(|b| !confirmed.contains(b.as_str()))
            .map(|b| FallbackEntry {
                identifier: b.clone(),
                peer: None,
                hard_failed: unreachable.contains(b.as_str()),
                peer_down: false,
            })
            .collect()
    }
}

/// Split the primary ranking into confirmed pairs and fallback entries.
///
/// Consistency probes for all eligible pairs run concurrently; the result is
/// assembled in primary rank order.
pub async fn reconcile<P: Prober>(
    prober: &P,
    ranked_primary: &[String],
    ranked_secondary: &[String],
    table: &AssociationTable,
) -> ReconciliationResult {
    let secondary: HashSet<&str> = ranked_secondary.iter().map(String::as_str).collect();

    let peers: Vec<Option<&str>> = ranked_primary
        .iter()
        .map(|a| match table.get(a) {
            Some(b) if secondary.contains(b) => Some(b),
            Some(b) => {
                tracing::info!(instance = %a, peer = %b, "Peer not ranked, using fallback");
                None
            }
            None => {
                tracing::info!(
                    instance = %a,
                    kind = FailureKind::ConfigurationGap.as_str(),
                    "No association entry, using fallback"
                );
                None
            }
        })
        .collect();

    let checks = join_all(ranked_primary.iter().zip(&peers).map(|(a, peer)| async move {
        match peer {
            Some(b) => Some(prober.cross_check(a, b).await),
            None => None,
        }
    }))
    .await;

    let mut result = ReconciliationResult::default();
    for ((a, peer), check) in ranked_primary.iter().zip(peers).zip(checks) {
        match (peer, check) {
            (Some(b), Some(pair)) if pair.succeeded() => {
                result.confirmed.push((a.clone(), b.to_string()));
            }
            (Some(b), Some(pair)) => result.fallback.push(FallbackEntry {
                identifier: a.clone(),
                peer: Some(b.to_string()),
                hard_failed: pair.primary_down,
                peer_down: pair.secondary_down,
            }),
            _ => result.fallback.push(FallbackEntry::unpaired(a)),
        }
    }

    tracing::info!(
        confirmed = result.confirmed.len(),
        fallback = result.fallback.len(),
        "Reconciliation complete"
    );
    result
}
