//! Published dynamic instance set.

use serde::{Deserialize, Serialize};

use crate::reconcile::CategoryResolution;

/// Final artifact read by downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicInstanceSet {
    pub primary: Vec<String>,
    pub fallback: Vec<String>,
    pub secondary: Vec<String>,
    pub tertiary: String,
    pub status: i32,
}

/// Assembles a [`DynamicInstanceSet`] one stage at a time.
///
/// Every method consumes the builder and returns the next state.
#[derive(Debug, Clone)]
pub struct InstanceSetBuilder {
    set: DynamicInstanceSet,
}

impl InstanceSetBuilder {
    pub fn new(status_baseline: i32) -> Self {
        Self {
            set: DynamicInstanceSet {
                status: status_baseline,
                ..DynamicInstanceSet::default()
            },
        }
    }

    pub fn primary(mut self, resolution: CategoryResolution) -> Self {
        self.set.primary = self.apply("primary", resolution);
        self
    }

    pub fn secondary(mut self, resolution: CategoryResolution) -> Self {
        self.set.secondary = self.apply("secondary", resolution);
        self
    }

    pub fn fallback(mut self, identifiers: Vec<String>) -> Self {
        self.set.fallback = identifiers;
        self
    }

    pub fn tertiary(mut self, identifier: Option<String>) -> Self {
        if identifier.is_none() {
            tracing::warn!("No tertiary mirror passed its checks");
        }
        self.set.tertiary = identifier.unwrap_or_default();
        self
    }

    pub fn build(self) -> DynamicInstanceSet {
        self.set
    }

    fn apply(&mut self, category: &str, resolution: CategoryResolution) -> Vec<String> {
        if resolution.degraded {
            self.set.status -= 1;
            tracing::warn!(
                category,
                substitutes = resolution.published.len(),
                status = self.set.status,
                "No confirmed mirrors, publishing fallback"
            );
        }
        resolution.published
    }
}
