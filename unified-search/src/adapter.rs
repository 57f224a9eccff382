//! Trait definition for pluggable knowledge-source adapters.
//!
//! Each source (help-center search, documentation index, keyword-biased
//! help-center search) implements [`SourceAdapter`] to translate a generic
//! query into its own request and map the response into [`SearchResult`].

use crate::error::SearchError;
use crate::types::{SearchResult, Source};

/// A knowledge-source backend.
///
/// Implementors provide [`fetch`](SourceAdapter::fetch), the fallible
/// request-and-map step. Callers use [`search`](SourceAdapter::search),
/// which absorbs every failure at the adapter boundary: an error is logged
/// and the source contributes no results. A failure in one adapter can
/// therefore never reach another adapter or the coordinator.
///
/// All implementations must be `Send + Sync` so they can be queried from
/// concurrently spawned tasks.
pub trait SourceAdapter: Send + Sync {
    /// Query the source and map its response into unified results.
    ///
    /// `limit` is this source's share of the overall request limit.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the source is not configured, the request
    /// fails or times out, the status is not a success, or the body does not
    /// have the expected shape.
    fn fetch(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Which [`Source`] this adapter represents.
    fn source(&self) -> Source;

    /// Query the source, logging and absorbing any failure.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Vec<SearchResult>> + Send {
        async move {
            let source = self.source();
            match self.fetch(query, limit).await {
                Ok(results) => {
                    tracing::debug!(%source, count = results.len(), "source returned results");
                    results
                }
                Err(err) => {
                    tracing::warn!(%source, error = %err, "source query failed");
                    Vec::new()
                }
            }
        }
    }
}
