//! Keyword-biased help-center search.
//!
//! Queries the same endpoint as [`super::ZendeskAdapter`] but appends a
//! disjunctive keyword clause so that FAQ and troubleshooting style articles
//! surface. Scores are discounted because these matches are indirect.

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SearchError;
use crate::types::{SearchResult, Source};

use super::help_center::{map_article, HelpCenterClient, ResultShape};

/// Clause appended to every query.
pub const SUPPORT_KEYWORDS: &str =
    "(FAQ OR troubleshooting OR \"how to\" OR problem OR issue OR error)";

/// Category label on every knowledge-base result.
pub const CATEGORY: &str = "Knowledge Base";

const SHAPE: ResultShape = ResultShape {
    id_prefix: "kb",
    source: Source::KnowledgeBase,
    score_factor: 0.8,
    fixed_category: Some(CATEGORY),
};

/// Support-biased help-center search adapter.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseAdapter {
    client: HelpCenterClient,
}

impl KnowledgeBaseAdapter {
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

/// The query actually sent upstream.
pub fn biased_query(query: &str) -> String {
    format!("{} {SUPPORT_KEYWORDS}", query.trim())
}

impl SourceAdapter for KnowledgeBaseAdapter {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let articles = self
            .client
            .search_articles(&biased_query(query), limit)
            .await?;
        Ok(articles
            .into_iter()
            .filter_map(|article| map_article(article, SHAPE))
            .collect())
    }

    fn source(&self) -> Source {
        Source::KnowledgeBase
    }
}
