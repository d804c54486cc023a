//! Degraded-status fallback for a category.

use crate::reconcile::FallbackEntry;

/// Published identifiers for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResolution {
    pub published: Vec<String>,
    /// The confirmed set was empty and fallback entries were substituted.
    pub degraded: bool,
}

/// Publish the confirmed set, or the top non-hard-failed fallback entries when it is empty.
///
/// The downgrade is applied once; an empty fallback bucket yields an empty,
/// degraded category.
pub fn resolve_category(
    confirmed: Vec<String>,
    fallback: &[FallbackEntry],
    limit: Option<usize>,
) -> CategoryResolution {
    if !confirmed.is_empty() {
        return CategoryResolution {
            published: confirmed,
            degraded: false,
        };
    }

    let published = fallback
        .iter()
        .filter(|e| !e.hard_failed)
        .map(|e| e.identifier.clone())
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    CategoryResolution {
        published,
        degraded: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, hard_failed: bool) -> FallbackEntry {
        FallbackEntry {
            identifier: id.to_string(),
            peer: None,
            hard_failed,
            peer_down: false,
        }
    }

    #[test]
    fn test_confirmed_published_as_is() {
        let resolution = resolve_category(vec!["a".into()], &[entry("f", false)], None);
        assert_eq!(resolution.published, ["a"]);
        assert!(!resolution.degraded);
    }

    #[test]
    fn test_substitutes_non_hard_failed() {
        let fallback = [entry("f1", true), entry("f2", false), entry("f3", false), entry("f4", false)];

        let all = resolve_category(Vec::new(), &fallback, None);
        assert_eq!(all.published, ["f2", "f3", "f4"]);
        assert!(all.degraded);

        let top = resolve_category(Vec::new(), &fallback, Some(1));
        assert_eq!(top.published, ["f2"]);
    }

    #[test]
    fn test_empty_fallback_still_degrades() {
        let resolution = resolve_category(Vec::new(), &[entry("dead", true)], None);
        assert!(resolution.published.is_empty());
        assert!(resolution.degraded);
    }
}
