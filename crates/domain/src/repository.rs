//! The product repository seam.
//!
//! Everything the resolver knows about the remote catalog goes through
//! [`ProductRepository`]. Authentication, token refresh, HTTP retries, and
//! pagination mechanics are the repository's problem; the resolver sees only
//! records, "not found", or a [`RepositoryError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;
use crate::record::Record;

/// How a single filter compares its field against its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Field equals the value exactly.
    Eq,
    /// SQL-style LIKE. `%` wildcards are the caller's responsibility.
    Like,
    /// Backend full-text search. The filter's `field` carries a comma-joined
    /// list of the fields to search across.
    Fulltext,
}

/// One `{field, operator, value}` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn like(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Like,
            value: value.into(),
        }
    }

    /// A full-text filter across several fields at once.
    pub fn fulltext<S: AsRef<str>>(fields: &[S], value: impl Into<String>) -> Self {
        let joined = fields
            .iter()
            .map(|f| f.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            field: joined,
            op: FilterOp::Fulltext,
            value: value.into(),
        }
    }
}

/// A conjunction of filters. A record satisfies the group when it satisfies
/// every filter in it. Groups combine disjunctively in [`SearchCriteria`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub filters: Vec<Filter>,
}

impl FilterGroup {
    pub fn of(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn single(filter: Filter) -> Self {
        Self {
            filters: vec![filter],
        }
    }
}

/// Page window for a structured search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_size: usize,
    /// 1-based page index.
    pub current_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: 20,
            current_page: 1,
        }
    }
}

impl Pagination {
    pub fn first_page(page_size: usize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }
}

/// A structured search: a disjunction of conjunctions.
///
/// A record matches when every filter of at least one group matches.
/// `attributes_to_return` asks the repository to project only the named
/// attributes into returned records; callers cap its length to the backend's
/// own attribute-count limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub filter_groups: Vec<FilterGroup>,
    pub attributes_to_return: Vec<String>,
    pub pagination: Pagination,
}

/// Async seam to the remote product catalog.
///
/// Implementations must be safe to share across invocations (`Send + Sync`).
/// "Not found" is a normal empty result, never an error. Whether a batch call
/// fans out in parallel underneath is the implementation's own business.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Run a structured search; see [`SearchCriteria`] for the group
    /// semantics.
    async fn search_by_criteria(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Record>, RepositoryError>;

    /// Fetch a single record by primary id.
    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, RepositoryError>;

    /// Batch fetch by id. Callers pass a pre-deduplicated list; unresolvable
    /// ids are silently omitted from the result.
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Record>, RepositoryError>;

    /// Fetch a single record by SKU.
    async fn get_by_sku(&self, sku: &str) -> Result<Option<Record>, RepositoryError>;

    /// Batch fetch by SKU; same contract as [`ProductRepository::get_by_ids`].
    async fn get_by_skus(&self, skus: &[String]) -> Result<Vec<Record>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fulltext_filter_joins_fields() {
        let filter = Filter::fulltext(&["sku", "gtin", "label"], "widget");
        assert_eq!(filter.field, "sku,gtin,label");
        assert_eq!(filter.op, FilterOp::Fulltext);
        assert_eq!(filter.value, "widget");
    }

    #[test]
    fn criteria_round_trips_through_serde() {
        let criteria = SearchCriteria {
            filter_groups: vec![FilterGroup::of(vec![
                Filter::like("label", "%red%"),
                Filter::like("label", "%widget%"),
            ])],
            attributes_to_return: vec!["id".into(), "sku".into()],
            pagination: Pagination::first_page(10),
        };
        let json = serde_json::to_string(&criteria).expect("serialize");
        let back: SearchCriteria = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, criteria);
    }
}
