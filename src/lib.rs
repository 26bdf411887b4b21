//! Workspace umbrella crate for the catalog resolver.
//!
//! This crate stitches identifier classification, staged lookup, and
//! reference-graph hydration together so callers can resolve raw product
//! identifiers against a remote catalog through a single entry point.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use catalog_resolver::{CatalogResolver, ProductRepository, ResolverConfig};
//! # async fn example(repository: Arc<dyn ProductRepository>) {
//! let config = ResolverConfig::from_file("resolver.yaml").expect("config");
//! let resolver = CatalogResolver::new(repository, config).expect("valid config");
//! let result = resolver.find_by_identifier("LMI-PD041828SI", None, None).await;
//! if let Some(found) = result.selected {
//!     println!("{} -> {}", found.matched_field, found.id);
//! }
//! # }
//! ```

mod config;

pub use crate::config::{ConfigLoadError, ResolverConfig};
pub use domain::{
    ConfigError, Filter, FilterGroup, FilterOp, Pagination, ProductRepository, Record,
    RepositoryError, SearchCriteria, SummaryAliases, SummaryRef,
};
pub use hydrate::{
    compiled_or_default, hydrate_hierarchy, hydrate_relationships, HierarchyConfig,
    HierarchyLevel, HierarchyRefs, LevelRule, DEFAULT_LEVEL_ATTRIBUTE,
    DEFAULT_RELATIONSHIP_FIELDS,
};
pub use ident::{detect_identifier_type, normalize, similarity, Detection, IdentifierType};
pub use lookup::{
    set_lookup_metrics, CacheClock, CacheKey, LookupConfig, LookupEngine, LookupMetrics,
    LookupResult, ManualClock, Match, MatchReason, MemoryResultCache, ResultCache, SystemClock,
    SELECTION_MARGIN, SHORT_CIRCUIT_CONFIDENCE,
};

use std::sync::Arc;

use tracing::debug;

/// One repository, one validated configuration, every resolver operation.
///
/// The resolver is cheap to share behind an `Arc` and safe to call
/// concurrently; the lookup cache is its only cross-call state.
pub struct CatalogResolver {
    repository: Arc<dyn ProductRepository>,
    engine: LookupEngine,
    config: ResolverConfig,
}

impl CatalogResolver {
    /// Build a resolver from a repository and a validated configuration.
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        config: ResolverConfig,
    ) -> Result<Self, ConfigError> {
        config.hierarchy.validate()?;
        let engine = LookupEngine::new(repository.clone(), config.lookup.clone())?;
        debug!(name = config.name.as_deref().unwrap_or("unnamed"), "catalog resolver ready");
        Ok(Self {
            repository,
            engine,
            config,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn engine(&self) -> &LookupEngine {
        &self.engine
    }

    /// Resolve a raw identifier; see [`LookupEngine::find_by_identifier`].
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
        explicit_type: Option<IdentifierType>,
        limit: Option<usize>,
    ) -> LookupResult {
        self.engine
            .find_by_identifier(identifier, explicit_type, limit)
            .await
    }

    /// Hydrate relationship ID arrays into summary references. A `None`
    /// field filter falls back to the configured default, then to the
    /// built-in relationship field list.
    pub async fn hydrate_relationships(
        &self,
        record: Record,
        fields: Option<&[String]>,
    ) -> Record {
        let fields = fields.or(self.config.relationship_fields.as_deref());
        hydrate::hydrate_relationships(
            record,
            fields,
            &self.config.summary_aliases,
            self.repository.as_ref(),
        )
        .await
    }

    /// Resolve a record's hierarchy ancestors; see [`hydrate_hierarchy`].
    pub async fn hydrate_hierarchy(
        &self,
        record: &Record,
        filter: Option<&[HierarchyLevel]>,
    ) -> HierarchyRefs {
        hydrate::hydrate_hierarchy(
            record,
            filter,
            &self.config.hierarchy,
            &self.config.summary_aliases,
            self.repository.as_ref(),
        )
        .await
    }
}
