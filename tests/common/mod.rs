//! Shared in-memory repository fixture for the integration tests.
//!
//! The fixture actually evaluates the search criteria the resolver builds
//! (equality, LIKE with `%` wildcards, and comma-joined full-text), so the
//! tests exercise real query construction rather than canned responses.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_resolver::{
    Filter, FilterOp, ProductRepository, Record, RepositoryError, SearchCriteria,
};

#[derive(Default)]
pub struct InMemoryRepository {
    records: Vec<Record>,
    /// Searches touching any of these fields fail with a transport error.
    fail_fields: HashSet<String>,
    /// Every call fails, simulating a catalog outage.
    pub fail_everything: bool,
    calls: Mutex<Vec<String>>,
}

impl InMemoryRepository {
    pub fn with_records(values: Vec<serde_json::Value>) -> Self {
        Self {
            records: values
                .into_iter()
                .map(|v| Record::from_value(v).expect("object literal"))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing_field(mut self, field: &str) -> Self {
        self.fail_fields.insert(field.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn outage(&self) -> Result<(), RepositoryError> {
        if self.fail_everything {
            Err(RepositoryError::Transport("catalog unreachable".into()))
        } else {
            Ok(())
        }
    }
}

fn filter_matches(record: &Record, filter: &Filter) -> bool {
    match filter.op {
        FilterOp::Eq => record.str_at(&filter.field) == Some(filter.value.as_str()),
        FilterOp::Like => {
            let needle = filter.value.trim_matches('%').to_lowercase();
            record
                .str_at(&filter.field)
                .map(|v| v.to_lowercase().contains(&needle))
                .unwrap_or(false)
        }
        FilterOp::Fulltext => {
            let needle = filter.value.to_lowercase();
            filter.field.split(',').any(|field| {
                record
                    .str_at(field)
                    .map(|v| v.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository {
    async fn search_by_criteria(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Record>, RepositoryError> {
        let fields: Vec<&str> = criteria
            .filter_groups
            .iter()
            .flat_map(|g| g.filters.iter())
            .map(|f| f.field.as_str())
            .collect();
        self.log(format!("search:{}", fields.join("+")));
        self.outage()?;
        if fields
            .iter()
            .any(|f| f.split(',').any(|part| self.fail_fields.contains(part)))
        {
            return Err(RepositoryError::Backend("search backend error".into()));
        }
        Ok(self
            .records
            .iter()
            .filter(|record| {
                criteria.filter_groups.iter().any(|group| {
                    !group.filters.is_empty()
                        && group.filters.iter().all(|f| filter_matches(record, f))
                })
            })
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, RepositoryError> {
        self.log(format!("get_by_id:{id}"));
        self.outage()?;
        Ok(self.records.iter().find(|r| r.id() == Some(id)).cloned())
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Record>, RepositoryError> {
        self.log(format!("get_by_ids:{}", ids.join(",")));
        self.outage()?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.id().map(|id| ids.iter().any(|q| q == id)).unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Record>, RepositoryError> {
        self.log(format!("get_by_sku:{sku}"));
        self.outage()?;
        Ok(self
            .records
            .iter()
            .find(|r| r.str_field("sku") == Some(sku))
            .cloned())
    }

    async fn get_by_skus(&self, skus: &[String]) -> Result<Vec<Record>, RepositoryError> {
        self.log(format!("get_by_skus:{}", skus.join(",")));
        self.outage()?;
        Ok(self
            .records
            .iter()
            .filter(|r| {
                r.str_field("sku")
                    .map(|s| skus.iter().any(|q| q == s))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}
