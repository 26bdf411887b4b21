// Metrics hooks for the lookup crate.
//
// Callers install a global `LookupMetrics` implementation via
// [`set_lookup_metrics`]; the engine then reports per-request latency, match
// counts, and cache hits for each call to `find_by_identifier`. This keeps
// instrumentation decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use ident::IdentifierType;

/// Metrics observer for lookup operations.
pub trait LookupMetrics: Send + Sync {
    /// Record the outcome of one lookup.
    ///
    /// `identifier_type` is the resolved (explicit or detected) type,
    /// `latency` the wall-clock duration of the call, `match_count` the
    /// number of candidates returned, and `cache_hit` whether the result
    /// came from the cache without touching the repository.
    fn record_lookup(
        &self,
        identifier_type: IdentifierType,
        latency: Duration,
        match_count: usize,
        cache_hit: bool,
    );
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn LookupMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn LookupMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn LookupMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global lookup metrics recorder.
///
/// Typically called once during service startup so every engine instance
/// shares the same backend.
pub fn set_lookup_metrics(recorder: Option<Arc<dyn LookupMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("lookup metrics lock poisoned");
    *guard = recorder;
}
