//! Identifier shape classification.
//!
//! A priority-ordered rule list, first match wins, each rule carrying a fixed
//! confidence. The order is normative: a pure-alphanumeric string satisfies
//! the SKU shape before the MNO rule is ever consulted, so MNO is only
//! assigned when a caller passes it explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Closed set of identifier shapes the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    /// 24-character hexadecimal internal id.
    InternalId,
    /// Stock keeping unit, the primary catalog identifier.
    Sku,
    /// Manufacturer part number (customer-defined attribute alias).
    Mpn,
    /// Manufacturer model number (customer-defined attribute alias).
    Mno,
    /// Global trade item number (UPC/EAN family).
    Gtin,
    /// Free-text label.
    Label,
    #[default]
    Unknown,
}

impl IdentifierType {
    /// Stable lowercase name, used in cache keys and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierType::InternalId => "internal_id",
            IdentifierType::Sku => "sku",
            IdentifierType::Mpn => "mpn",
            IdentifierType::Mno => "mno",
            IdentifierType::Gtin => "gtin",
            IdentifierType::Label => "label",
            IdentifierType::Unknown => "unknown",
        }
    }
}

/// Outcome of classifying one raw identifier. Immutable; produced once per
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub identifier_type: IdentifierType,
    /// Fixed per-rule confidence in [0, 1]; not a calibrated probability.
    pub confidence: f64,
}

impl Detection {
    pub fn new(identifier_type: IdentifierType, confidence: f64) -> Self {
        Self {
            identifier_type,
            confidence,
        }
    }

    pub fn unknown() -> Self {
        Self::new(IdentifierType::Unknown, 0.0)
    }
}

static INTERNAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("internal id pattern must compile"));

static GTIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{8}|\d{12}|\d{13}|\d{14})$").expect("gtin pattern must compile")
});

static MPN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9]+(?:-[A-Z0-9]+)+$").expect("mpn pattern must compile")
});

// A 3+ letter prefix followed by a dash reads as a vendor code, which makes
// the whole string a SKU rather than a bare part number.
static VENDOR_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z]{3,}-").expect("vendor prefix pattern must compile"));

static SKU_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9][A-Z0-9._-]*$").expect("sku pattern must compile")
});

static MNO_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9]+$").expect("mno pattern must compile"));

/// Classify a raw identifier against the priority-ordered shape rules.
///
/// Empty or whitespace-only input yields `unknown`/0.0 before any rule is
/// tried. Otherwise, in order: 24-hex → internal id (1.0); exactly 8, 12, 13,
/// or 14 digits → GTIN (0.95); contains whitespace → label (0.9); dashed
/// alphanumeric without a vendor prefix → MPN (0.8); SKU charset → SKU (0.7);
/// pure alphanumeric → MNO (0.6); anything else → unknown (0.0).
pub fn detect_identifier_type(input: &str) -> Detection {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Detection::unknown();
    }
    if INTERNAL_ID.is_match(trimmed) {
        return Detection::new(IdentifierType::InternalId, 1.0);
    }
    if GTIN.is_match(trimmed) {
        return Detection::new(IdentifierType::Gtin, 0.95);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Detection::new(IdentifierType::Label, 0.9);
    }
    if MPN_SHAPE.is_match(trimmed) && !VENDOR_PREFIX.is_match(trimmed) {
        return Detection::new(IdentifierType::Mpn, 0.8);
    }
    if SKU_SHAPE.is_match(trimmed) {
        return Detection::new(IdentifierType::Sku, 0.7);
    }
    if MNO_SHAPE.is_match(trimmed) {
        return Detection::new(IdentifierType::Mno, 0.6);
    }
    Detection::unknown()
}
