//! Identifier layer: normalization, similarity, and shape classification.
//!
//! Raw product identifiers arrive in every imaginable form — internal ids,
//! SKUs, manufacturer part numbers, GTINs, free-text labels. This crate turns
//! them into something comparable:
//!
//! - [`normalize`] canonicalizes a string for comparison (strip everything
//!   that is not a letter or digit, uppercase the rest). Idempotent.
//! - [`similarity`] is a cheap, deterministic containment score in [0, 1].
//!   It is not edit distance and does not try to be.
//! - [`detect_identifier_type`] pattern-matches a raw string against a
//!   priority-ordered set of identifier shapes and returns a type plus a
//!   fixed confidence.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same input, same output,
//! any machine.

mod detect;
mod normalize;

pub use crate::detect::{detect_identifier_type, Detection, IdentifierType};
pub use crate::normalize::{normalize, similarity};
