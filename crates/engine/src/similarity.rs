use rustc_hash::FxHashSet;

/// Bag-of-words overlap between a candidate's name and a declared relation
/// name, in [0, 1].
///
/// Asymmetric on purpose: tokens of `declared` longer than two characters
/// are looked up in the token set of `candidate`, and the hit count is
/// divided by the larger token count. This tolerates missing middle names
/// but can be fooled by shared surnames and short tokens; that trade-off is
/// accepted, not a bug.
pub fn name_similarity(candidate: &str, declared: &str) -> f64 {
    let a = candidate.trim().to_uppercase();
    let b = declared.trim().to_uppercase();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_tokens: Vec<&str> = a.split_whitespace().collect();
    let b_tokens: Vec<&str> = b.split_whitespace().collect();
    let a_set: FxHashSet<&str> = a_tokens.iter().copied().collect();

    let hits = b_tokens
        .iter()
        .filter(|t| t.len() > 2 && a_set.contains(*t))
        .count();

    hits as f64 / a_tokens.len().max(b_tokens.len()) as f64
}
