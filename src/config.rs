//! YAML configuration file support for the resolver.
//!
//! A single file carries the lookup, hierarchy, and summary-alias sections so
//! a deployment configures the whole resolver in one place and constructs it
//! once at startup. The resolver itself never reads environment state.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! name: "acme-catalog"
//!
//! lookup:
//!   search_fields: ["sku", "gtin", "label"]
//!   mpn_attribute_keys: ["attributes.mpn"]
//!   mno_attribute_keys: ["attributes.mno"]
//!   default_page_size: 20
//!   cache_enabled: true
//!   cache_ttl_secs: 60
//!   cache_capacity: 100
//!
//! hierarchy:
//!   level_attribute_key: "attributes.hierarchy_level"
//!   family:
//!     attribute_key: "attributes.family_sku"
//!   parent:
//!     sku_pattern: "^(.*?)-[^-]+$"
//!   include_brand: false
//!
//! summary_aliases:
//!   mpn_keys: ["attributes.mpn", "attributes.manufacturer_part_number"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain::{ConfigError, SummaryAliases};
use hydrate::HierarchyConfig;
use lookup::LookupConfig;

/// Failures while loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Top-level configuration for a [`CatalogResolver`](crate::CatalogResolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional deployment name, for logs only.
    pub name: Option<String>,

    pub lookup: LookupConfig,

    pub hierarchy: HierarchyConfig,

    pub summary_aliases: SummaryAliases,

    /// Relationship fields to hydrate by default. `None` means the built-in
    /// field list; a caller-supplied filter still wins per call.
    pub relationship_fields: Option<Vec<String>>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            lookup: LookupConfig::default(),
            hierarchy: HierarchyConfig::default(),
            summary_aliases: SummaryAliases::default(),
            relationship_fields: None,
        }
    }
}

impl ResolverConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ResolverConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the whole configuration tree.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1" | "1.0" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }
        self.lookup.validate()?;
        self.hierarchy.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ResolverConfig::default().validate().is_ok());
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let config = ResolverConfig::from_yaml("version: \"1.0\"\n").expect("valid yaml");
        assert_eq!(config.lookup, LookupConfig::default());
        assert_eq!(config.hierarchy, HierarchyConfig::default());
        assert!(config.relationship_fields.is_none());
    }

    #[test]
    fn full_yaml_round_trip() {
        let yaml = r#"
version: "1.0"
name: "acme-catalog"

lookup:
  search_fields: ["sku", "label"]
  mpn_attribute_keys: ["attributes.part_no"]
  default_page_size: 10
  cache_enabled: false

hierarchy:
  level_attribute_key: "attributes.level"
  family:
    attribute_key: "attributes.family_sku"
  include_brand: true

summary_aliases:
  mpn_keys: ["attributes.part_no"]

relationship_fields: ["includes"]
"#;
        let config = ResolverConfig::from_yaml(yaml).expect("valid yaml");
        assert_eq!(config.name.as_deref(), Some("acme-catalog"));
        assert_eq!(config.lookup.search_fields, vec!["sku", "label"]);
        assert_eq!(config.lookup.default_page_size, 10);
        assert!(!config.lookup.cache_enabled);
        assert_eq!(config.hierarchy.level_attribute_key, "attributes.level");
        assert!(config.hierarchy.include_brand);
        assert_eq!(
            config.relationship_fields,
            Some(vec!["includes".to_string()])
        );
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let result = ResolverConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn invalid_section_is_rejected() {
        let yaml = r#"
version: "1.0"
lookup:
  search_fields: []
"#;
        let result = ResolverConfig::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(ConfigError::EmptySearchFields))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "version: \"1.0\"\nname: \"from-disk\"\n").expect("write");

        let config = ResolverConfig::from_file(file.path()).expect("valid file");
        assert_eq!(config.name.as_deref(), Some("from-disk"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = ResolverConfig::from_yaml("version: [unclosed");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }
}
