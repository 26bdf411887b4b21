//! Reference-graph hydration for catalog records.
//!
//! Two operations turn cheap references into displayable summaries:
//!
//! - [`hydrate_relationships`]: replaces array-of-ID relationship fields
//!   (`includes`, `replaces`, ...) with arrays of [`SummaryRef`], batched
//!   into a single fetch.
//! - [`hydrate_hierarchy`]: resolves a record's family/parent/variant (and
//!   optionally brand) ancestors by attribute key or SKU pattern, batched
//!   into a single fetch by SKU.
//!
//! Both operations are infallible from the caller's perspective: repository
//! failures are logged and degrade to unhydrated or null results, never
//! errors. Partial results beat aborting.
//!
//! [`SummaryRef`]: domain::SummaryRef

mod hierarchy;
mod pattern;
mod relationships;

pub use crate::hierarchy::{
    hydrate_hierarchy, HierarchyConfig, HierarchyLevel, HierarchyRefs, LevelRule,
    DEFAULT_LEVEL_ATTRIBUTE,
};
pub use crate::pattern::compiled_or_default;
pub use crate::relationships::{hydrate_relationships, DEFAULT_RELATIONSHIP_FIELDS};
