//! Query-to-listing matching.
//!
//! A deliberately cheap token-overlap heuristic standing in for semantic
//! matching. Callers needing higher precision can swap this module without
//! touching the aggregator.

use std::collections::HashSet;

/// Lowercases, strips everything that is neither alphanumeric nor
/// whitespace, and trims. Idempotent.
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// True iff the normalized query and title share at least one token and the
/// normalized query is non-empty. An empty query never matches anything,
/// otherwise every listing would match a blank search.
pub fn matches(query: &str, title: &str) -> bool {
    let normalized_query = normalize(query);
    let query_tokens: HashSet<&str> = normalized_query.split_whitespace().collect();
    if query_tokens.is_empty() {
        return false;
    }
    let normalized_title = normalize(title);
    let title_tokens: HashSet<&str> = normalized_title.split_whitespace().collect();
    query_tokens.intersection(&title_tokens).next().is_some()
}
