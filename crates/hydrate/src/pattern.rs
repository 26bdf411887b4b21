//! Compile-or-default handling for user-supplied SKU patterns.

use regex::Regex;
use tracing::warn;

/// Compile a configured pattern, falling back to a known-good default when
/// the pattern is absent or does not parse. The fallback policy lives here
/// so it can be tested in isolation; an invalid pattern never fails a
/// hydration.
pub fn compiled_or_default(pattern: Option<&str>, default: &Regex) -> Regex {
    let Some(pattern) = pattern else {
        return default.clone();
    };
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => {
            warn!(pattern, error = %err, "invalid sku pattern, using built-in default");
            default.clone()
        }
    }
}
