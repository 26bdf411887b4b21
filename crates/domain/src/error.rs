//! Error surface shared across the resolver crates.
//!
//! Two distinct failure families live here:
//!
//! - [`RepositoryError`]: anything the remote catalog collaborator can throw.
//!   The lookup and hydration layers treat these as stage failures — caught,
//!   logged, recorded in the lookup `plan`, never propagated out of an
//!   otherwise-successful call.
//! - [`ConfigError`]: configuration-time validation failures, surfaced at
//!   startup rather than at request time.

use thiserror::Error;

/// Failures originating in the remote product repository.
///
/// These are opaque to the resolver core: any variant is handled identically
/// (the stage is skipped and the pipeline continues). The variants exist so
/// the collaborator can log and surface precise causes at its own boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RepositoryError {
    /// Network-level failure reaching the catalog, including timeouts.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend rejected the query as malformed.
    #[error("backend rejected query: {0}")]
    InvalidQuery(String),

    /// The backend throttled the caller.
    #[error("rate limited by backend: {0}")]
    RateLimited(String),

    /// Any other backend-side failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Configuration validation failures.
///
/// These indicate misconfiguration that should be fixed before handling live
/// traffic; they are returned by the `validate()` methods on the config
/// structs and by engine construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("search_fields must not be empty")]
    EmptySearchFields,

    #[error("default_page_size must be greater than zero")]
    ZeroPageSize,

    #[error("max_returned_attributes must be greater than zero")]
    ZeroReturnedAttributes,

    #[error("cache_capacity must be greater than zero when the cache is enabled")]
    ZeroCacheCapacity,

    #[error("cache_ttl_secs must be greater than zero when the cache is enabled")]
    ZeroCacheTtl,

    #[error("attribute key for {0} must not be empty")]
    EmptyAttributeKey(&'static str),
}
