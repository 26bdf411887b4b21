//! Confidence scoring for candidate records.

use domain::Record;
use ident::{normalize, similarity};

use crate::config::LookupConfig;
use crate::types::MatchReason;

pub(crate) const PREFIX_CONFIDENCE: f64 = 0.9;
pub(crate) const SUBSTRING_CONFIDENCE: f64 = 0.75;
pub(crate) const SIMILARITY_THRESHOLD: f64 = 0.6;
/// Floor for records a search returned but no rule could corroborate. The
/// same 0.1 can also come from a genuinely weak similarity; the two are
/// indistinguishable, which mirrors the source behavior of this scoring
/// scheme.
pub(crate) const FLOOR_CONFIDENCE: f64 = 0.1;

/// Score one candidate record against the query identifier.
///
/// Candidate values are gathered from the configured standard fields, the
/// field that produced the match (when it is a record path), and every
/// string-valued custom attribute. The single best-scoring candidate value
/// decides the outcome: normalized equality returns 1.0 immediately;
/// otherwise the best of prefix (0.9), substring (0.75), or containment
/// similarity above 0.6 wins, with a fixed 0.1 floor when nothing fires.
pub fn score_match(
    identifier: &str,
    record: &Record,
    matched_field: Option<&str>,
    config: &LookupConfig,
) -> (f64, MatchReason) {
    let needle = normalize(identifier);
    if needle.is_empty() {
        return (FLOOR_CONFIDENCE, MatchReason::WeakMatch);
    }

    let mut candidates: Vec<&str> = Vec::new();
    for field in &config.search_fields {
        if let Some(value) = record.str_at(field) {
            candidates.push(value);
        }
    }
    if let Some(field) = matched_field {
        if let Some(value) = record.str_at(field) {
            candidates.push(value);
        }
    }
    for (_, value) in record.string_attributes() {
        candidates.push(value);
    }

    let mut best = (FLOOR_CONFIDENCE, MatchReason::WeakMatch);
    for value in candidates {
        let hay = normalize(value);
        if hay.is_empty() {
            continue;
        }
        if hay == needle {
            return (1.0, MatchReason::NormalizedExactMatch);
        }
        let scored = if hay.starts_with(&needle) || needle.starts_with(&hay) {
            Some((PREFIX_CONFIDENCE, MatchReason::PrefixMatch))
        } else if hay.contains(&needle) || needle.contains(&hay) {
            Some((SUBSTRING_CONFIDENCE, MatchReason::SubstringMatch))
        } else {
            let sim = similarity(identifier, value);
            (sim > SIMILARITY_THRESHOLD).then_some((sim, MatchReason::SimilarityMatch))
        };
        if let Some((confidence, reason)) = scored {
            if confidence > best.0 {
                best = (confidence, reason);
            }
        }
    }
    (best.0.clamp(0.0, 1.0), best.1)
}
