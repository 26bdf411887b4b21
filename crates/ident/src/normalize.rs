//! String canonicalization and containment similarity.

/// Canonicalize a string for comparison: strip every character that is not a
/// letter or digit, uppercase the remainder.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Bounded containment similarity between two strings.
///
/// Both inputs are normalized first. Returns 0.0 if either normalized form is
/// empty, 1.0 if they are equal, `len(shorter) / len(longer)` if one is a
/// substring of the other, and 0.0 otherwise. Symmetric by construction; not
/// edit distance.
pub fn similarity(a: &str, b: &str) -> f64 {
    let na = normalize(a);
    let nb = normalize(b);
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }
    let (shorter, longer) = if na.chars().count() <= nb.chars().count() {
        (&na, &nb)
    } else {
        (&nb, &na)
    };
    if longer.contains(shorter.as_str()) {
        shorter.chars().count() as f64 / longer.chars().count() as f64
    } else {
        0.0
    }
}
