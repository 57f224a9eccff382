//! Concurrent fan-out to every enabled source with settle-all semantics.
//!
//! Each enabled source runs as its own tokio task. All tasks are awaited
//! with [`futures::future::join_all`], so a slow or failing source never
//! cuts another short. Results are concatenated in enabled-source order,
//! which the ranker's stable sort later uses as the tie-break.

use std::sync::Arc;

use crate::adapters::SourceRegistry;
use crate::types::{SearchResult, Source};

use super::dedup::deduplicate;

/// Query every source in `enabled` concurrently and merge the successes.
///
/// # Pipeline
///
/// 1. Compute each source's share of `limit` (rounded up)
/// 2. Spawn one task per source
/// 3. Await every task, successful or not
/// 4. Concatenate successful lists in `enabled` order
/// 5. Drop repeated ids
///
/// Adapter errors are absorbed inside the adapters. A task that panics or
/// is cancelled is logged here and contributes nothing; it never aborts the
/// other sources.
pub async fn dispatch(
    registry: &Arc<SourceRegistry>,
    query: &str,
    limit: usize,
    enabled: &[Source],
) -> Vec<SearchResult> {
    let (sources, handles): (Vec<Source>, Vec<_>) = enabled
        .iter()
        .map(|&source| {
            let registry = Arc::clone(registry);
            let query = query.to_owned();
            let share = source.limit_share(limit);
            let handle =
                tokio::spawn(async move { registry.search(source, &query, share).await });
            (source, handle)
        })
        .unzip();

    let outcomes = futures::future::join_all(handles).await;

    let mut merged: Vec<SearchResult> = Vec::new();
    for (source, outcome) in sources.into_iter().zip(outcomes) {
        match outcome {
            Ok(results) => {
                tracing::debug!(%source, count = results.len(), "source settled");
                merged.extend(results);
            }
            Err(err) => {
                tracing::warn!(%source, error = %err, "source task did not complete");
            }
        }
    }

    deduplicate(merged)
}
