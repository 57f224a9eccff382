//! # unified-search
//!
//! Fan-out search across a help-center API, a static documentation index,
//! and a support-biased view of the same help center, merged into one
//! ranked list.
//!
//! ## Design
//!
//! - One [`SourceAdapter`] per source, registered in a [`SourceRegistry`]
//! - All enabled sources are queried concurrently and joined with
//!   settle-all semantics
//! - Graceful degradation: a failing source is logged and contributes no
//!   results; the others are unaffected
//! - A single deterministic ranking formula re-scores the merged list
//!
//! Nothing is indexed or stored. Every result lives for one request.

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod orchestrator;
pub mod types;

use std::sync::Arc;

pub use adapter::SourceAdapter;
pub use adapters::SourceRegistry;
pub use config::{DocsConfig, SourcesConfig, ZendeskConfig};
pub use error::{Result, SearchError};
pub use normalize::normalize;
pub use types::{SearchResult, Source};

/// Ranked results for one query plus the size of the merged list before
/// truncation.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Ranked results, at most `limit` of them.
    pub results: Vec<SearchResult>,
    /// How many results the sources produced in total.
    pub total: usize,
}

/// Search every source in `sources` concurrently and return the top
/// `limit` results.
///
/// Runs the coordinator, then the ranker, then truncates. Sources that fail
/// simply contribute nothing, so this never errors.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> unified_search::Result<()> {
/// use std::sync::Arc;
/// use unified_search::{Source, SourceRegistry, SourcesConfig};
///
/// let registry = Arc::new(SourceRegistry::from_config(&SourcesConfig::default())?);
/// let outcome = unified_search::search(&registry, "password reset", 10, Source::all()).await;
/// for result in &outcome.results {
///     println!("{} ({}): {}", result.title, result.source, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    registry: &Arc<SourceRegistry>,
    query: &str,
    limit: usize,
    sources: &[Source],
) -> SearchOutcome {
    let merged = orchestrator::dispatch::dispatch(registry, query, limit, sources).await;
    let total = merged.len();

    let mut results = orchestrator::ranking::rank(merged, query);
    results.truncate(limit);

    tracing::debug!(total, returned = results.len(), "search complete");
    SearchOutcome { results, total }
}
