//! Resolving a record's ancestors in the family/parent/variant tree.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use domain::{ConfigError, ProductRepository, Record, SummaryAliases, SummaryRef};

use crate::pattern::compiled_or_default;

/// Dotted path where the hierarchy level conventionally lives.
pub const DEFAULT_LEVEL_ATTRIBUTE: &str = "attributes.hierarchy_level";

// Built-in SKU patterns per level, used when a configured pattern is absent
// or invalid. Family keeps the first two dash segments, parent and variant
// strip the last segment, brand keeps the first.
static FAMILY_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-]+-[^-]+)").expect("built-in family pattern"));
static PARENT_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)-[^-]+$").expect("built-in parent pattern"));
static BRAND_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-]+)").expect("built-in brand pattern"));

/// A resolvable position in the product tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    Family,
    Parent,
    Variant,
    Brand,
}

impl HierarchyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Family => "family",
            Self::Parent => "parent",
            Self::Variant => "variant",
            Self::Brand => "brand",
        }
    }
}

/// How one hierarchy level derives its target SKU: a direct attribute key
/// tried first, then the first capture group of `sku_pattern` applied to the
/// record's own SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRule {
    pub attribute_key: Option<String>,
    pub sku_pattern: Option<String>,
}

/// Configuration for [`hydrate_hierarchy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Dotted path of the numeric hierarchy level (0 = none, 4 = deepest).
    pub level_attribute_key: String,
    pub family: LevelRule,
    pub parent: LevelRule,
    pub variant: LevelRule,
    /// Brand resolution never happens implicitly; it is opt-in here and
    /// independent of the caller's level filter.
    pub include_brand: bool,
    pub brand: LevelRule,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            level_attribute_key: DEFAULT_LEVEL_ATTRIBUTE.to_string(),
            family: LevelRule::default(),
            parent: LevelRule::default(),
            variant: LevelRule::default(),
            include_brand: false,
            brand: LevelRule::default(),
        }
    }
}

impl HierarchyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level_attribute_key.is_empty() {
            return Err(ConfigError::EmptyAttributeKey("hierarchy level"));
        }
        Ok(())
    }

    fn rule(&self, level: HierarchyLevel) -> &LevelRule {
        match level {
            HierarchyLevel::Family => &self.family,
            HierarchyLevel::Parent => &self.parent,
            HierarchyLevel::Variant => &self.variant,
            HierarchyLevel::Brand => &self.brand,
        }
    }
}

/// Resolved ancestors for one record.
///
/// Each slot is doubly optional: the outer `None` means the level was not
/// requested (absent from serialized output), `Some(None)` means it was
/// requested but no ancestor could be derived or found (serialized `null`).
/// Callers depend on that distinction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyRefs {
    /// The record's own level as read from the configured attribute.
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<Option<SummaryRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Option<SummaryRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Option<SummaryRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<SummaryRef>>,
}

impl HierarchyRefs {
    fn set(&mut self, level: HierarchyLevel, value: Option<SummaryRef>) {
        match level {
            HierarchyLevel::Family => self.family = Some(value),
            HierarchyLevel::Parent => self.parent = Some(value),
            HierarchyLevel::Variant => self.variant = Some(value),
            HierarchyLevel::Brand => self.brand = Some(value),
        }
    }
}

/// Resolve the requested ancestor levels of `record`.
///
/// `filter` restricts which of family/parent/variant are resolved (`None`
/// means all three); brand joins only via `config.include_brand`. Levels the
/// record does not qualify for resolve to `null`. All derived target SKUs go
/// out in one deduplicated batch fetch; a repository failure degrades every
/// requested level to `null` rather than erroring.
pub async fn hydrate_hierarchy(
    record: &Record,
    filter: Option<&[HierarchyLevel]>,
    config: &HierarchyConfig,
    aliases: &SummaryAliases,
    repository: &dyn ProductRepository,
) -> HierarchyRefs {
    let level = read_level(record, &config.level_attribute_key);
    let mut refs = HierarchyRefs {
        level,
        ..HierarchyRefs::default()
    };

    let mut targets: Vec<(HierarchyLevel, Option<String>)> = Vec::new();
    for target in [
        HierarchyLevel::Family,
        HierarchyLevel::Parent,
        HierarchyLevel::Variant,
        HierarchyLevel::Brand,
    ] {
        let requested = match target {
            HierarchyLevel::Brand => config.include_brand,
            other => filter.map(|f| f.contains(&other)).unwrap_or(true),
        };
        if !requested {
            continue;
        }
        let derived = if qualifies(target, level) {
            derive_target_sku(record, config.rule(target), default_pattern(target))
        } else {
            None
        };
        targets.push((target, derived));
    }
    if targets.is_empty() {
        return refs;
    }

    let mut skus: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (_, derived) in &targets {
        if let Some(sku) = derived {
            if seen.insert(sku) {
                skus.push(sku.clone());
            }
        }
    }

    let by_sku: HashMap<String, Record> = if skus.is_empty() {
        HashMap::new()
    } else {
        match repository.get_by_skus(&skus).await {
            Ok(records) => records
                .into_iter()
                .filter_map(|rec| {
                    let sku = rec.str_field("sku")?.to_string();
                    Some((sku, rec))
                })
                .collect(),
            Err(err) => {
                warn!(error = %err, "hierarchy batch fetch failed");
                for (target, _) in targets {
                    refs.set(target, None);
                }
                return refs;
            }
        }
    };

    for (target, derived) in targets {
        let summary = derived
            .and_then(|sku| by_sku.get(&sku))
            .map(|rec| SummaryRef::from_record(rec, aliases));
        refs.set(target, summary);
    }
    refs
}

/// Whether a record at `level` can have an ancestor at `target`.
fn qualifies(target: HierarchyLevel, level: Option<u8>) -> bool {
    match (target, level) {
        (HierarchyLevel::Family, Some(1..=4)) => true,
        (HierarchyLevel::Parent, Some(3..=4)) => true,
        (HierarchyLevel::Variant, Some(4)) => true,
        // Brand is gated by opt-in alone, not by level.
        (HierarchyLevel::Brand, _) => true,
        _ => false,
    }
}

fn default_pattern(target: HierarchyLevel) -> &'static Regex {
    match target {
        HierarchyLevel::Family => &FAMILY_DEFAULT,
        HierarchyLevel::Parent | HierarchyLevel::Variant => &PARENT_DEFAULT,
        HierarchyLevel::Brand => &BRAND_DEFAULT,
    }
}

/// Target SKU for one level: the configured attribute key's string value
/// when present, else the first capture group of the level's pattern over
/// the record's own SKU.
fn derive_target_sku(record: &Record, rule: &LevelRule, default: &Regex) -> Option<String> {
    if let Some(key) = &rule.attribute_key {
        if let Some(value) = record.str_at(key) {
            return Some(value.to_string());
        }
    }
    let own_sku = record.str_field("sku")?;
    let regex = compiled_or_default(rule.sku_pattern.as_deref(), default);
    regex
        .captures(own_sku)?
        .get(1)
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// Hierarchy levels arrive as numbers or numeric strings; anything outside
/// 0..=4 is treated as absent.
fn read_level(record: &Record, key: &str) -> Option<u8> {
    if let Some(n) = record.number_at(key) {
        return (n >= 0.0 && n <= 4.0 && n.fract() == 0.0).then_some(n as u8);
    }
    record
        .str_at(key)?
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|n| *n <= 4)
}
