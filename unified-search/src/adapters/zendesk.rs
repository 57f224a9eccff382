//! Direct help-center article search.
//!
//! Sends the trimmed query as-is and keeps the help center's own relevance
//! score. Results are tagged `zendesk` and carry the highest source priority.

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SearchError;
use crate::types::{SearchResult, Source};

use super::help_center::{map_article, HelpCenterClient, ResultShape};

const SHAPE: ResultShape = ResultShape {
    id_prefix: "zendesk",
    source: Source::Zendesk,
    score_factor: 1.0,
    fixed_category: None,
};

/// Help-center article search adapter.
#[derive(Debug, Clone)]
pub struct ZendeskAdapter {
    client: HelpCenterClient,
}

impl ZendeskAdapter {
    /// Build the adapter from the shared source configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: HelpCenterClient::new(config)?,
        })
    }
}

impl SourceAdapter for ZendeskAdapter {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let articles = self.client.search_articles(query.trim(), limit).await?;
        Ok(articles
            .into_iter()
            .filter_map(|article| map_article(article, SHAPE))
            .collect())
    }

    fn source(&self) -> Source {
        Source::Zendesk
    }
}
