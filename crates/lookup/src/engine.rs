//! The staged search planner/executor.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use domain::{
    ConfigError, Filter, FilterGroup, Pagination, ProductRepository, SearchCriteria,
};
use ident::{detect_identifier_type, Detection, IdentifierType};

use crate::cache::{CacheKey, MemoryResultCache, ResultCache};
use crate::config::LookupConfig;
use crate::metrics::metrics_recorder;
use crate::score::score_match;
use crate::types::{LookupResult, Match, MatchReason};


/// Margin by which the top match must beat the runner-up to be selected.
/// A fixed design constant, not derived.
pub const SELECTION_MARGIN: f64 = 0.15;

/// A hit at or above this confidence stops further exact-match stages.
pub const SHORT_CIRCUIT_CONFIDENCE: f64 = 0.99;

// The broad LIKE fallback only consults this many leading search fields.
const FALLBACK_FIELD_COUNT: usize = 3;

/// One planned repository query within the staged pipeline.
struct SearchStage {
    name: String,
    criteria: SearchCriteria,
    /// Record path whose value corroborates the match; `None` for
    /// cross-field stages.
    score_field: Option<String>,
}

/// Resolves raw product identifiers against the catalog via an ordered
/// sequence of progressively broader search strategies.
///
/// Stages execute sequentially, each awaited to completion, both to allow
/// early exit on a high-confidence hit and to avoid speculative requests
/// against a rate-limited backend. A stage failure never aborts the lookup.
pub struct LookupEngine {
    repository: Arc<dyn ProductRepository>,
    config: LookupConfig,
    cache: Option<Arc<dyn ResultCache>>,
}

impl LookupEngine {
    /// Construct an engine, validating the configuration. When caching is
    /// enabled an in-memory TTL cache is installed; swap it via
    /// [`LookupEngine::with_cache`].
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        config: LookupConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = config.cache_enabled.then(|| {
            Arc::new(MemoryResultCache::new(
                config.cache_ttl(),
                config.cache_capacity,
            )) as Arc<dyn ResultCache>
        });
        Ok(Self {
            repository,
            config,
            cache,
        })
    }

    /// Replace the cache seam, e.g. with a no-op or deterministic-clock
    /// cache. `None` disables memoization entirely.
    pub fn with_cache(mut self, cache: Option<Arc<dyn ResultCache>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Resolve `identifier` to catalog records.
    ///
    /// `explicit_type` skips shape detection; `limit` falls back to the
    /// configured default page size. Never fails: repository errors are
    /// absorbed into the result's `plan`.
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
        explicit_type: Option<IdentifierType>,
        limit: Option<usize>,
    ) -> LookupResult {
        let started = Instant::now();
        let limit = limit.unwrap_or(self.config.default_page_size).max(1);

        if identifier.trim().is_empty() {
            return LookupResult {
                plan: vec!["empty_identifier".to_string()],
                ..LookupResult::default()
            };
        }

        let detection = explicit_type
            .map(|t| Detection::new(t, 1.0))
            .unwrap_or_else(|| detect_identifier_type(identifier));

        let key = CacheKey::new(identifier, explicit_type, limit);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                debug!(identifier, "lookup cache hit");
                if let Some(recorder) = metrics_recorder() {
                    recorder.record_lookup(
                        detection.identifier_type,
                        started.elapsed(),
                        hit.matches.len(),
                        true,
                    );
                }
                return hit;
            }
        }

        let result = self.run_stages(identifier, &detection, limit).await;

        if let Some(cache) = &self.cache {
            cache.put(key, result.clone());
        }
        if let Some(recorder) = metrics_recorder() {
            recorder.record_lookup(
                detection.identifier_type,
                started.elapsed(),
                result.matches.len(),
                false,
            );
        }
        result
    }

    async fn run_stages(
        &self,
        identifier: &str,
        detection: &Detection,
        limit: usize,
    ) -> LookupResult {
        let mut plan = vec![format!("detected_{}", detection.identifier_type.as_str())];
        let mut matches: Vec<Match> = Vec::new();

        // Stage 1: direct fetch for internal ids. A hit bypasses scoring and
        // ranking entirely.
        if detection.identifier_type == IdentifierType::InternalId {
            plan.push("direct_lookup".to_string());
            match self.repository.get_by_id(identifier).await {
                Ok(Some(record)) => {
                    let matched =
                        Match::from_record(record, "id", 1.0, MatchReason::NormalizedExactMatch);
                    return LookupResult {
                        selected: Some(matched.clone()),
                        matches: vec![matched],
                        plan,
                    };
                }
                // Not found is a normal empty result; broader stages may
                // still recognize the identifier under another field.
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "direct id lookup failed");
                    plan.push("direct_lookup_failed".to_string());
                }
            }
        }

        // Stage 2: per-field exact matches, narrowest first.
        for stage in self.exact_stages(detection.identifier_type, identifier, limit) {
            let short_circuit = self
                .run_search(&stage, identifier, &mut plan, &mut matches)
                .await;
            if short_circuit {
                break;
            }
        }

        // Stage 3: one multi-field text search, only when every exact stage
        // came back empty.
        if matches.is_empty() {
            let stage = self.text_search_stage(identifier, limit);
            self.run_search(&stage, identifier, &mut plan, &mut matches)
                .await;
        }

        // Stage 4: broad LIKE on the identifier's first token.
        if matches.is_empty() {
            if let Some(stage) = self.fallback_stage(identifier, limit) {
                self.run_search(&stage, identifier, &mut plan, &mut matches)
                    .await;
            }
        }

        finalize(matches, plan, limit)
    }

    /// Execute one stage, scoring every returned record into `matches`.
    /// Returns true when the stage produced a hit strong enough to stop
    /// further exact stages. Failures are absorbed into `plan`.
    async fn run_search(
        &self,
        stage: &SearchStage,
        identifier: &str,
        plan: &mut Vec<String>,
        matches: &mut Vec<Match>,
    ) -> bool {
        plan.push(stage.name.clone());
        match self.repository.search_by_criteria(&stage.criteria).await {
            Ok(records) => {
                let mut short_circuit = false;
                for record in records {
                    let (confidence, reason) = score_match(
                        identifier,
                        &record,
                        stage.score_field.as_deref(),
                        &self.config,
                    );
                    if confidence >= SHORT_CIRCUIT_CONFIDENCE {
                        short_circuit = true;
                    }
                    let matched_field = stage.score_field.as_deref().unwrap_or(&stage.name);
                    matches.push(Match::from_record(record, matched_field, confidence, reason));
                }
                short_circuit
            }
            Err(err) => {
                warn!(stage = %stage.name, error = %err, "lookup stage failed");
                plan.push(format!("{}_failed", stage.name));
                false
            }
        }
    }

    fn criteria(&self, groups: Vec<FilterGroup>, limit: usize) -> SearchCriteria {
        SearchCriteria {
            filter_groups: groups,
            attributes_to_return: self.config.return_attributes(),
            pagination: Pagination::first_page(limit),
        }
    }

    /// The exact-match stages compatible with the resolved identifier type.
    fn exact_stages(
        &self,
        identifier_type: IdentifierType,
        identifier: &str,
        limit: usize,
    ) -> Vec<SearchStage> {
        let standard: &[&str] = match identifier_type {
            IdentifierType::Sku => &["sku"],
            IdentifierType::Gtin => &["gtin"],
            IdentifierType::Label => &["label"],
            IdentifierType::Mpn | IdentifierType::Mno => &[],
            IdentifierType::InternalId | IdentifierType::Unknown => &["sku", "gtin", "label"],
        };

        let mut stages = Vec::new();
        for field in standard {
            if !self.config.search_fields.iter().any(|f| f == field) {
                continue;
            }
            let group = if *field == "label" {
                // Tokenized AND-of-LIKE: every token must appear somewhere
                // in the label.
                FilterGroup::of(
                    identifier
                        .split_whitespace()
                        .map(|token| Filter::like("label", format!("%{token}%")))
                        .collect(),
                )
            } else {
                FilterGroup::single(Filter::eq(*field, identifier))
            };
            stages.push(SearchStage {
                name: format!("exact:{field}"),
                criteria: self.criteria(vec![group], limit),
                score_field: Some((*field).to_string()),
            });
        }

        let alias_keys: Vec<&String> = match identifier_type {
            IdentifierType::Mpn => self.config.mpn_attribute_keys.iter().collect(),
            IdentifierType::Mno => self.config.mno_attribute_keys.iter().collect(),
            IdentifierType::Unknown | IdentifierType::InternalId => self
                .config
                .mpn_attribute_keys
                .iter()
                .chain(self.config.mno_attribute_keys.iter())
                .collect(),
            _ => Vec::new(),
        };
        for key in alias_keys {
            stages.push(SearchStage {
                name: format!("exact:{key}"),
                criteria: self.criteria(
                    vec![FilterGroup::single(Filter::eq(key.clone(), identifier))],
                    limit,
                ),
                score_field: Some(key.clone()),
            });
        }
        stages
    }

    fn text_search_stage(&self, identifier: &str, limit: usize) -> SearchStage {
        let fields: Vec<&String> = self
            .config
            .search_fields
            .iter()
            .chain(self.config.mpn_attribute_keys.iter())
            .chain(self.config.mno_attribute_keys.iter())
            .collect();
        SearchStage {
            name: "text_search".to_string(),
            criteria: self.criteria(
                vec![FilterGroup::single(Filter::fulltext(&fields, identifier))],
                limit,
            ),
            score_field: None,
        }
    }

    /// LIKE on the first alphanumeric token, against the first few
    /// configured fields. `None` when the identifier has no token at all.
    fn fallback_stage(&self, identifier: &str, limit: usize) -> Option<SearchStage> {
        let token = identifier
            .split(|c: char| !c.is_alphanumeric())
            .find(|t| !t.is_empty())?;
        let groups = self
            .config
            .search_fields
            .iter()
            .take(FALLBACK_FIELD_COUNT)
            .map(|field| FilterGroup::single(Filter::like(field.clone(), format!("%{token}%"))))
            .collect();
        Some(SearchStage {
            name: "like_fallback".to_string(),
            criteria: self.criteria(groups, limit),
            score_field: None,
        })
    }
}

/// Rank, deduplicate, and apply the ambiguity rule.
fn finalize(mut matches: Vec<Match>, plan: Vec<String>, limit: usize) -> LookupResult {
    matches.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    // The same record can surface from several stages; keep its best score
    // so the ambiguity margin compares distinct records.
    let mut seen = HashSet::new();
    matches.retain(|m| seen.insert(m.id.clone()));

    let selected = match matches.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        [top, second, ..] => {
            (top.confidence - second.confidence >= SELECTION_MARGIN).then(|| top.clone())
        }
    };
    matches.truncate(limit);
    LookupResult {
        selected,
        matches,
        plan,
    }
}
