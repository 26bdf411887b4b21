//! Staged identifier lookup against a remote product catalog.
//!
//! The entry point is [`LookupEngine::find_by_identifier`]: give it a raw,
//! possibly ambiguous identifier and it runs an ordered sequence of search
//! strategies — direct id fetch, per-field exact matches, a full-text pass,
//! and a broad LIKE fallback — scoring every candidate record and selecting
//! a best match only when the confidence separation is unambiguous.
//!
//! ## Invariants worth knowing
//!
//! - Stages run sequentially, each awaited to completion, so a high-confidence
//!   hit can stop the pipeline before speculative requests hit a rate-limited
//!   backend.
//! - A stage failure is caught, logged, recorded in the result's `plan`, and
//!   never aborts the lookup. No error escapes an otherwise-successful call.
//! - `matches` is always sorted by confidence, descending, and every
//!   confidence is clamped to [0, 1].
//! - The cache is an optimization only: disabling it must not change any
//!   lookup result, only the number of repository calls made.

mod cache;
mod config;
mod engine;
mod metrics;
mod score;
mod types;

pub use crate::cache::{
    CacheClock, CacheKey, ManualClock, MemoryResultCache, ResultCache, SystemClock,
};
pub use crate::config::LookupConfig;
pub use crate::engine::{LookupEngine, SELECTION_MARGIN, SHORT_CIRCUIT_CONFIDENCE};
pub use crate::metrics::{set_lookup_metrics, LookupMetrics};
pub use crate::score::score_match;
pub use crate::types::{LookupResult, Match, MatchReason};
