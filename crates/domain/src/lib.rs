//! Shared data model for the catalog resolver.
//!
//! This crate defines the types every other layer speaks:
//!
//! - [`Record`]: an open map of field name → value, the shape the remote
//!   catalog returns. Conventional top-level keys are `id`, `sku`, `label`,
//!   and `gtin`; everything else lives under a nested `attributes` object
//!   addressable by dotted path.
//! - [`SummaryRef`]: the lightweight product reference produced by
//!   relationship and hierarchy hydration.
//! - [`ProductRepository`]: the async seam to the remote catalog. The
//!   repository owns authentication, retries, and timeouts; callers here see
//!   only success, "not found", or an opaque [`RepositoryError`].
//!
//! ## Invariants worth knowing
//!
//! - Batch operations (`get_by_ids`, `get_by_skus`) take pre-deduplicated
//!   key lists; a repository is never asked for the same key twice in one
//!   resolution.
//! - Dotted-path access never traverses arrays implicitly and never panics
//!   on missing intermediate keys; it resolves to `None`.

mod error;
mod record;
mod repository;
mod summary;

pub use crate::error::{ConfigError, RepositoryError};
pub use crate::record::Record;
pub use crate::repository::{
    Filter, FilterGroup, FilterOp, Pagination, ProductRepository, SearchCriteria,
};
pub use crate::summary::{SummaryAliases, SummaryRef};
