//! Configuration for the lookup engine.
//!
//! Constructed once at startup by an external collaborator and passed in;
//! the engine never reads ambient environment state. Validate at startup,
//! not at request time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use domain::ConfigError;

/// Runtime configuration for [`LookupEngine`](crate::LookupEngine).
///
/// Cheap to clone and serde-friendly so it can be embedded in a higher-level
/// configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Standard searchable fields, in priority order. The broad LIKE
    /// fallback only consults the first few of these.
    pub search_fields: Vec<String>,

    /// Dotted attribute paths where this catalog stores manufacturer part
    /// numbers. Customer-defined; empty means no MPN exact stage.
    pub mpn_attribute_keys: Vec<String>,

    /// Dotted attribute paths for manufacturer model numbers.
    pub mno_attribute_keys: Vec<String>,

    /// Page size used for repository searches when the caller passes no
    /// explicit limit.
    pub default_page_size: usize,

    /// Upper bound on `attributes_to_return` per search, matching the
    /// backend's own attribute-count limit.
    pub max_returned_attributes: usize,

    /// Whether lookup results are memoized at all.
    pub cache_enabled: bool,

    /// Lifetime of a cached lookup result, in seconds.
    pub cache_ttl_secs: u64,

    /// Entry count past which a write triggers an expiry sweep. Purely
    /// time-based eviction; there is no LRU.
    pub cache_capacity: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            search_fields: vec!["sku".into(), "gtin".into(), "label".into()],
            mpn_attribute_keys: vec!["attributes.mpn".into()],
            mno_attribute_keys: vec!["attributes.mno".into()],
            default_page_size: 20,
            max_returned_attributes: 50,
            cache_enabled: true,
            cache_ttl_secs: 60,
            cache_capacity: 100,
        }
    }
}

impl LookupConfig {
    /// Cache entry lifetime as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Validate internal consistency. Inexpensive; call at process start-up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_fields.is_empty() {
            return Err(ConfigError::EmptySearchFields);
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.max_returned_attributes == 0 {
            return Err(ConfigError::ZeroReturnedAttributes);
        }
        if self.cache_enabled {
            if self.cache_ttl_secs == 0 {
                return Err(ConfigError::ZeroCacheTtl);
            }
            if self.cache_capacity == 0 {
                return Err(ConfigError::ZeroCacheCapacity);
            }
        }
        Ok(())
    }

    /// Attribute projection list for repository searches: the standard
    /// fields plus every alias path, deduplicated and capped to the
    /// backend's attribute limit.
    pub(crate) fn return_attributes(&self) -> Vec<String> {
        let mut attrs: Vec<String> = vec!["id".into()];
        for field in self
            .search_fields
            .iter()
            .chain(self.mpn_attribute_keys.iter())
            .chain(self.mno_attribute_keys.iter())
        {
            if !attrs.contains(field) {
                attrs.push(field.clone());
            }
        }
        attrs.truncate(self.max_returned_attributes);
        attrs
    }
}
