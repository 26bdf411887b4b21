//! Replacing array-of-ID relationship fields with summary references.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::warn;

use domain::{ProductRepository, Record, SummaryAliases, SummaryRef};

/// Relationship fields hydration knows about. A caller-supplied field filter
/// is intersected with this list; anything outside it is never rewritten.
pub const DEFAULT_RELATIONSHIP_FIELDS: &[&str] = &[
    "includes",
    "replaces",
    "replaced_by",
    "accessories",
    "spare_parts",
    "related",
];

/// Replace each target field's array of record IDs with an array of
/// [`SummaryRef`]s, issuing at most one batch fetch for the union of all
/// referenced IDs.
///
/// Array length is preserved: an ID the repository cannot resolve maps to a
/// null-filled summary, never a dropped slot. Non-array fields, non-string
/// array entries, and fields outside the target set are left untouched. A
/// repository failure returns the record unchanged.
pub async fn hydrate_relationships(
    mut record: Record,
    fields: Option<&[String]>,
    aliases: &SummaryAliases,
    repository: &dyn ProductRepository,
) -> Record {
    let targets: Vec<&str> = match fields {
        Some(filter) => DEFAULT_RELATIONSHIP_FIELDS
            .iter()
            .copied()
            .filter(|field| filter.iter().any(|f| f == field))
            .collect(),
        None => DEFAULT_RELATIONSHIP_FIELDS.to_vec(),
    };

    // Union of referenced IDs across every target field, deduplicated in
    // first-seen order.
    let mut ids: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for field in &targets {
        if let Some(Value::Array(values)) = record.get(field) {
            for value in values {
                if let Some(id) = value.as_str() {
                    if seen.insert(id) {
                        ids.push(id.to_string());
                    }
                }
            }
        }
    }
    if ids.is_empty() {
        return record;
    }

    let fetched = match repository.get_by_ids(&ids).await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "relationship batch fetch failed, leaving record unhydrated");
            return record;
        }
    };
    let by_id: HashMap<String, Record> = fetched
        .into_iter()
        .filter_map(|rec| {
            let id = rec.id()?.to_string();
            Some((id, rec))
        })
        .collect();

    for field in targets {
        let Some(Value::Array(values)) = record.get(field) else {
            continue;
        };
        let hydrated: Vec<Value> = values
            .iter()
            .map(|value| match value.as_str() {
                Some(id) => {
                    let summary = by_id
                        .get(id)
                        .map(|rec| SummaryRef::from_record(rec, aliases))
                        .unwrap_or_else(|| SummaryRef::unresolved(id));
                    serde_json::to_value(summary).unwrap_or(Value::Null)
                }
                None => value.clone(),
            })
            .collect();
        record.insert(field, Value::Array(hydrated));
    }
    record
}
