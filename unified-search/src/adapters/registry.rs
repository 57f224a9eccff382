//! Static adapter table keyed by [`Source`].

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SearchError;
use crate::types::{SearchResult, Source};

use super::{DocsAdapter, KnowledgeBaseAdapter, ZendeskAdapter};

/// One adapter per known source, built once from configuration and shared
/// read-only between requests.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    zendesk: ZendeskAdapter,
    docs: DocsAdapter,
    knowledge_base: KnowledgeBaseAdapter,
    config: SourcesConfig,
}

impl SourceRegistry {
    /// Build every adapter from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid, or
    /// [`SearchError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &SourcesConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            zendesk: ZendeskAdapter::new(config)?,
            docs: DocsAdapter::new(config)?,
            knowledge_base: KnowledgeBaseAdapter::new(config)?,
            config: config.clone(),
        })
    }

    /// Query one source, absorbing its failures.
    pub async fn search(&self, source: Source, query: &str, limit: usize) -> Vec<SearchResult> {
        match source {
            Source::Zendesk => self.zendesk.search(query, limit).await,
            Source::Docs => self.docs.search(query, limit).await,
            Source::KnowledgeBase => self.knowledge_base.search(query, limit).await,
        }
    }

    /// Whether `source` has the configuration it needs to answer queries.
    pub fn is_configured(&self, source: Source) -> bool {
        match source {
            Source::Zendesk | Source::KnowledgeBase => self.config.zendesk.is_configured(),
            Source::Docs => self.config.docs.is_configured(),
        }
    }
}
