//! Bounded TTL memo of lookup results.
//!
//! The cache is a swappable seam so tests can substitute a no-op or a
//! deterministic-clock implementation. It is the only state shared across
//! invocations; the in-memory implementation guards its map with a mutex so
//! a multi-threaded embedding observes whole entries only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use ident::IdentifierType;

use crate::types::LookupResult;

/// Cache key: the raw identifier, the caller's explicit type (or `"auto"`
/// when detection decides), and the effective result limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub identifier: String,
    pub explicit_type: String,
    pub limit: usize,
}

impl CacheKey {
    pub fn new(identifier: &str, explicit_type: Option<IdentifierType>, limit: usize) -> Self {
        Self {
            identifier: identifier.to_string(),
            explicit_type: explicit_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "auto".to_string()),
            limit,
        }
    }
}

/// Swappable cache seam for lookup results.
pub trait ResultCache: Send + Sync {
    /// Fetch a live entry. Expired entries count as misses and are dropped
    /// on touch.
    fn get(&self, key: &CacheKey) -> Option<LookupResult>;

    /// Insert or replace. Entries are never mutated after insertion.
    fn put(&self, key: CacheKey, result: LookupResult);

    /// Drop every expired entry.
    fn sweep(&self);
}

/// Time source for cache expiry; swappable for deterministic tests.
pub trait CacheClock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl CacheClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|p| p.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheClock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap_or_else(|p| p.into_inner())
    }
}

struct CacheEntry {
    result: LookupResult,
    created_at: Instant,
}

/// In-memory [`ResultCache`] with lazy expiry.
///
/// Reads drop an expired entry on touch; a write that pushes the map past
/// `capacity` triggers one sweep removing all expired entries. Eviction is
/// purely time-based — there is no LRU.
pub struct MemoryResultCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn CacheClock>,
}

impl MemoryResultCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn CacheClock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryResultCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL, Self::DEFAULT_CAPACITY)
    }
}

impl ResultCache for MemoryResultCache {
    fn get(&self, key: &CacheKey) -> Option<LookupResult> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        match entries.get(key) {
            Some(entry) if now.duration_since(entry.created_at) < self.ttl => {
                Some(entry.result.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: CacheKey, result: LookupResult) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.insert(
            key,
            CacheEntry {
                result,
                created_at: now,
            },
        );
        if entries.len() > self.capacity {
            let before = entries.len();
            entries.retain(|_, entry| now.duration_since(entry.created_at) < self.ttl);
            tracing::debug!(
                removed = before - entries.len(),
                remaining = entries.len(),
                "swept expired lookup cache entries"
            );
        }
    }

    fn sweep(&self) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.retain(|_, entry| now.duration_since(entry.created_at) < self.ttl);
    }
}
