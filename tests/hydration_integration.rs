//! Relationship and hierarchy hydration through the `CatalogResolver` facade.

mod common;

use std::sync::Arc;

use serde_json::{json, Value};

use catalog_resolver::{
    CatalogResolver, HierarchyLevel, LevelRule, Record, ResolverConfig,
};
use common::InMemoryRepository;

fn catalog() -> Vec<serde_json::Value> {
    vec![
        json!({
            "id": "kit",
            "sku": "KIT-1",
            "label": "Starter Kit",
            "includes": ["bolt", "nut", "ghost"],
            "replaces": ["bolt"],
            "attributes": { "hierarchy_level": 2 }
        }),
        json!({
            "id": "bolt",
            "sku": "BOLT-9",
            "label": "Hex Bolt",
            "attributes": { "mpn": "B-9", "list_price": 0.5 }
        }),
        json!({
            "id": "nut",
            "sku": "NUT-4",
            "label": "Hex Nut"
        }),
        json!({
            "id": "fam",
            "sku": "ACME-100",
            "label": "Acme Widget Family"
        }),
        json!({
            "id": "par",
            "sku": "ACME-100-RED",
            "label": "Acme Widget Red"
        }),
        json!({
            "id": "var",
            "sku": "ACME-100-RED-XL",
            "label": "Acme Widget Red XL",
            "attributes": { "hierarchy_level": 4 }
        }),
    ]
}

fn resolver_with(repo: Arc<InMemoryRepository>, config: ResolverConfig) -> CatalogResolver {
    CatalogResolver::new(repo, config).expect("valid config")
}

fn record(value: serde_json::Value) -> Record {
    Record::from_value(value).expect("object literal")
}

#[tokio::test]
async fn relationships_batch_once_with_deduplicated_ids() {
    let repo = Arc::new(InMemoryRepository::with_records(catalog()));
    let resolver = resolver_with(repo.clone(), ResolverConfig::default());

    let kit = record(json!({
        "id": "kit",
        "includes": ["bolt", "nut"],
        "replaces": ["bolt"]
    }));
    let hydrated = resolver.hydrate_relationships(kit, None).await;

    // "bolt" referenced twice, fetched once.
    assert_eq!(repo.calls(), vec!["get_by_ids:bolt,nut"]);
    let includes = hydrated.get("includes").and_then(Value::as_array).unwrap();
    assert_eq!(includes[0]["sku"], json!("BOLT-9"));
    assert_eq!(includes[0]["mpn"], json!("B-9"));
    assert_eq!(includes[0]["list_price"], json!(0.5));
    let replaces = hydrated.get("replaces").and_then(Value::as_array).unwrap();
    assert_eq!(replaces[0]["sku"], json!("BOLT-9"));
}

#[tokio::test]
async fn unresolved_reference_is_null_filled_not_dropped() {
    let repo = Arc::new(InMemoryRepository::with_records(catalog()));
    let resolver = resolver_with(repo, ResolverConfig::default());

    let kit = record(json!({
        "id": "kit",
        "includes": ["bolt", "ghost"]
    }));
    let hydrated = resolver.hydrate_relationships(kit, None).await;

    let includes = hydrated.get("includes").and_then(Value::as_array).unwrap();
    assert_eq!(includes.len(), 2);
    assert_eq!(
        includes[1],
        json!({"id": "ghost", "sku": null, "mpn": null, "label": null, "list_price": null})
    );
}

#[tokio::test]
async fn configured_field_list_narrows_default_hydration() {
    let repo = Arc::new(InMemoryRepository::with_records(catalog()));
    let config = ResolverConfig {
        relationship_fields: Some(vec!["includes".to_string()]),
        ..ResolverConfig::default()
    };
    let resolver = resolver_with(repo.clone(), config);

    let kit = record(json!({
        "id": "kit",
        "includes": ["bolt"],
        "replaces": ["nut"]
    }));
    let hydrated = resolver.hydrate_relationships(kit, None).await;

    assert_eq!(repo.calls(), vec!["get_by_ids:bolt"]);
    // `replaces` stays a raw ID array.
    assert_eq!(hydrated.get("replaces"), Some(&json!(["nut"])));

    // An explicit per-call filter still wins over the configured default.
    let kit = record(json!({"id": "kit", "replaces": ["nut"]}));
    let fields = vec!["replaces".to_string()];
    let hydrated = resolver.hydrate_relationships(kit, Some(&fields)).await;
    let replaces = hydrated.get("replaces").and_then(Value::as_array).unwrap();
    assert_eq!(replaces[0]["sku"], json!("NUT-4"));
}

#[tokio::test]
async fn hierarchy_resolves_ancestors_from_sku_patterns() {
    let repo = Arc::new(InMemoryRepository::with_records(catalog()));
    let resolver = resolver_with(repo.clone(), ResolverConfig::default());

    let variant = record(json!({
        "id": "var",
        "sku": "ACME-100-RED-XL",
        "attributes": { "hierarchy_level": 4 }
    }));
    let refs = resolver.hydrate_hierarchy(&variant, None).await;

    assert_eq!(refs.level, Some(4));
    let family = refs.family.expect("requested").expect("resolved");
    assert_eq!(family.sku.as_deref(), Some("ACME-100"));
    let parent = refs.parent.expect("requested").expect("resolved");
    assert_eq!(parent.sku.as_deref(), Some("ACME-100-RED"));
    // One batch carrying both derived SKUs, deduplicated.
    assert_eq!(repo.calls(), vec!["get_by_skus:ACME-100,ACME-100-RED"]);
}

#[tokio::test]
async fn filtered_out_level_is_absent_while_unresolved_is_null() {
    let repo = Arc::new(InMemoryRepository::default());
    let resolver = resolver_with(repo, ResolverConfig::default());

    // Level 2 qualifies for family, but the derived family SKU finds nothing
    // in an empty catalog.
    let product = record(json!({
        "id": "x",
        "sku": "ACME-100",
        "attributes": { "hierarchy_level": 2 }
    }));
    let refs = resolver
        .hydrate_hierarchy(&product, Some(&[HierarchyLevel::Family]))
        .await;

    let json = serde_json::to_value(&refs).expect("serialize");
    assert_eq!(json["family"], Value::Null);
    assert!(json.get("parent").is_none());
    assert!(json.get("variant").is_none());
}

#[tokio::test]
async fn brand_resolution_is_config_opt_in() {
    let repo = Arc::new(InMemoryRepository::with_records(vec![json!({
        "id": "brand", "sku": "ACME", "label": "Acme Corp"
    })]));
    let config = ResolverConfig::default();
    let resolver = resolver_with(repo.clone(), config);

    let product = record(json!({
        "id": "x",
        "sku": "ACME-100",
        "attributes": { "hierarchy_level": 1 }
    }));
    let refs = resolver.hydrate_hierarchy(&product, Some(&[])).await;
    assert!(refs.brand.is_none());

    let mut config = ResolverConfig::default();
    config.hierarchy.include_brand = true;
    let resolver = resolver_with(repo, config);
    let refs = resolver.hydrate_hierarchy(&product, Some(&[])).await;
    let brand = refs.brand.expect("opted in").expect("resolved");
    assert_eq!(brand.label.as_deref(), Some("Acme Corp"));
}

#[tokio::test]
async fn attribute_key_overrides_pattern_derivation() {
    let repo = Arc::new(InMemoryRepository::with_records(vec![json!({
        "id": "fam", "sku": "FAM-OVERRIDE", "label": "Family"
    })]));
    let mut config = ResolverConfig::default();
    config.hierarchy.family = LevelRule {
        attribute_key: Some("attributes.family_sku".to_string()),
        sku_pattern: None,
    };
    let resolver = resolver_with(repo, config);

    let product = record(json!({
        "id": "x",
        "sku": "ACME-100-RED",
        "attributes": { "hierarchy_level": 3, "family_sku": "FAM-OVERRIDE" }
    }));
    let refs = resolver
        .hydrate_hierarchy(&product, Some(&[HierarchyLevel::Family]))
        .await;

    let family = refs.family.expect("requested").expect("resolved");
    assert_eq!(family.sku.as_deref(), Some("FAM-OVERRIDE"));
}

#[tokio::test]
async fn lookup_then_hydrate_round_trip() {
    let repo = Arc::new(InMemoryRepository::with_records(catalog()));
    let resolver = resolver_with(repo, ResolverConfig::default());

    let found = resolver
        .find_by_identifier("KIT-1", None, None)
        .await
        .selected
        .expect("kit resolves");

    let hydrated = resolver.hydrate_relationships(found.record, None).await;
    let includes = hydrated.get("includes").and_then(Value::as_array).unwrap();
    assert_eq!(includes.len(), 3);
    assert_eq!(includes[0]["label"], json!("Hex Bolt"));
    // The unknown "ghost" reference survives as a null-filled slot.
    assert_eq!(includes[2]["sku"], Value::Null);

    let refs = resolver.hydrate_hierarchy(&hydrated, None).await;
    assert_eq!(refs.level, Some(2));
    // At level 2 only family qualifies; parent and variant come back null.
    assert!(refs.family.expect("requested").is_some());
    assert_eq!(refs.parent, Some(None));
    assert_eq!(refs.variant, Some(None));
}
