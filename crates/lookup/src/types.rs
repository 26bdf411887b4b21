//! Result types for a single lookup invocation.

use serde::{Deserialize, Serialize};

use domain::Record;

/// Which scoring rule produced a match's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    /// Candidate value equals the identifier after normalization.
    NormalizedExactMatch,
    /// One normalized value is a prefix of the other.
    PrefixMatch,
    /// One normalized value contains the other.
    SubstringMatch,
    /// Containment similarity above the threshold; confidence carries the
    /// similarity value itself.
    SimilarityMatch,
    /// No scoring rule fired; the record still came back from a search, so
    /// it keeps a fixed floor confidence rather than being dropped.
    WeakMatch,
}

/// A candidate record scored against the query identifier. Ephemeral; exists
/// only within one lookup invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub sku: Option<String>,
    pub label: Option<String>,
    pub gtin: Option<String>,
    /// The stage or field that produced this candidate.
    pub matched_field: String,
    /// Heuristic score in [0, 1]; not a calibrated probability.
    pub confidence: f64,
    pub reason: MatchReason,
    /// The full record as returned by the repository.
    pub record: Record,
}

impl Match {
    pub(crate) fn from_record(
        record: Record,
        matched_field: &str,
        confidence: f64,
        reason: MatchReason,
    ) -> Self {
        Self {
            id: record.id().unwrap_or_default().to_string(),
            sku: record.str_field("sku").map(str::to_string),
            label: record.str_field("label").map(str::to_string),
            gtin: record.str_field("gtin").map(str::to_string),
            matched_field: matched_field.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            reason,
            record,
        }
    }
}

/// Outcome of one lookup.
///
/// `selected` is present only when the ranking is unambiguous; otherwise
/// callers must present `matches` for disambiguation. `plan` is an audit
/// trail of every stage attempted or failed — diagnostic only, never used
/// for control flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub selected: Option<Match>,
    /// All scored candidates, sorted by confidence descending.
    pub matches: Vec<Match>,
    pub plan: Vec<String>,
}
