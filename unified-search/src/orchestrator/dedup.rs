//! Result de-duplication by id.
//!
//! Result ids are source-prefixed, so two sources can never collide. A
//! duplicate can only come from one upstream repeating a record; the first
//! occurrence wins so that dispatch order is preserved.

use std::collections::HashSet;

use crate::types::SearchResult;

/// Drop every result whose `id` was already seen, keeping input order.
pub fn deduplicate(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::with_capacity(results.len());
    let before = results.len();

    let unique: Vec<SearchResult> = results
        .into_iter()
        .filter(|result| seen.insert(result.id.clone()))
        .collect();

    if unique.len() < before {
        tracing::debug!(dropped = before - unique.len(), "duplicate result ids removed");
    }
    unique
}
