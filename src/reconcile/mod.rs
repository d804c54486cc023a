//! Cross-dialect reconciliation.
//!
//! # Data Flow
//! ```text
//! RankedList(primary) + RankedList(secondary) + AssociationTable
//!     → reconciler.rs (lookup peer → consistency probe → confirmed | fallback)
//!     → fallback.rs (empty confirmed set → substitute top non-hard-failed fallback)
//!     → instance_set.rs (builder threads categories + status → DynamicInstanceSet)
//! ```
//!
//! # Design Decisions
//! - The consistency probe runs even though both sides passed their own recipes;
//!   it can reject pairs that serve different data
//! - Degradation is a single, non-recursive step per category
//! - Each degraded category lowers the published status by exactly one

pub mod fallback;
pub mod instance_set;
pub mod reconciler;

pub use fallback::{resolve_category, CategoryResolution};
pub use instance_set::{DynamicInstanceSet, InstanceSetBuilder};
pub use reconciler::{reconcile, FallbackEntry, ReconciliationResult};
