//! Lightweight product references produced by hydration.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// The summary shape both hydrators map fetched records into.
///
/// Missing sub-fields are explicit `None` and serialize as `null`, never
/// omitted: callers rely on the difference between an unresolved reference
/// (all nulls) and a dropped array slot (which must not happen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRef {
    pub id: String,
    pub sku: Option<String>,
    pub mpn: Option<String>,
    pub label: Option<String>,
    pub list_price: Option<f64>,
}

impl SummaryRef {
    /// Placeholder for an id the repository could not resolve. The slot is
    /// kept, every sub-field is null.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sku: None,
            mpn: None,
            label: None,
            list_price: None,
        }
    }

    /// Map a fetched record through the configured attribute-key aliases.
    /// Each alias list is tried in order; the first hit wins.
    pub fn from_record(record: &Record, aliases: &SummaryAliases) -> Self {
        let first_str = |keys: &[String]| {
            keys.iter()
                .find_map(|key| record.str_at(key))
                .map(str::to_string)
        };
        Self {
            id: record.id().unwrap_or_default().to_string(),
            sku: first_str(&aliases.sku_keys),
            mpn: first_str(&aliases.mpn_keys),
            label: first_str(&aliases.label_keys),
            list_price: aliases
                .list_price_keys
                .iter()
                .find_map(|key| record.number_at(key)),
        }
    }
}

/// Attribute-key alias lists for building a [`SummaryRef`].
///
/// Keys are dotted paths resolved against the record; MPN and list price are
/// customer-defined attributes, so their conventional locations differ per
/// catalog and are configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryAliases {
    pub sku_keys: Vec<String>,
    pub mpn_keys: Vec<String>,
    pub label_keys: Vec<String>,
    pub list_price_keys: Vec<String>,
}

impl Default for SummaryAliases {
    fn default() -> Self {
        Self {
            sku_keys: vec!["sku".into()],
            mpn_keys: vec![
                "attributes.mpn".into(),
                "attributes.manufacturer_part_number".into(),
            ],
            label_keys: vec!["label".into()],
            list_price_keys: vec!["attributes.list_price".into(), "attributes.price".into()],
        }
    }
}
