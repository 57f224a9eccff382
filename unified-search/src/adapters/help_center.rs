//! Shared help-center article search client.
//!
//! Both the direct help-center adapter and the keyword-biased knowledge-base
//! adapter call the same endpoint with the same credentials; they differ in
//! the query they send and in how articles are mapped into results.

use crate::config::{SourcesConfig, ZendeskConfig};
use crate::error::SearchError;
use crate::http;
use crate::normalize::{normalize, SNIPPET_LENGTH};
use crate::types::{SearchResult, Source};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// Locale requested from the help center.
pub const LOCALE: &str = "en-us";

/// Path of the article search endpoint below the API base.
const SEARCH_PATH: &str = "help_center/articles/search.json";

/// Body of the article search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ArticleSearchResponse {
    pub results: Vec<Article>,
}

/// One article as returned by the help center.
#[derive(Debug, Deserialize)]
pub(crate) struct Article {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub section_id: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// How a flavour of help-center search maps articles into results.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResultShape {
    /// Prefix of the result id, joined to the article id with `_`.
    pub id_prefix: &'static str,
    /// Source tag written on each result.
    pub source: Source,
    /// Multiplier applied to the upstream score.
    pub score_factor: f64,
    /// Fixed category label. When `None`, the category is derived from the
    /// article's section.
    pub fixed_category: Option<&'static str>,
}

/// HTTP client plus credentials for the article search endpoint.
#[derive(Debug, Clone)]
pub(crate) struct HelpCenterClient {
    client: reqwest::Client,
    config: ZendeskConfig,
}

impl HelpCenterClient {
    pub(crate) fn new(config: &SourcesConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            config: config.zendesk.clone(),
        })
    }

    /// Search articles, asking for at most `per_page` results.
    pub(crate) async fn search_articles(
        &self,
        query: &str,
        per_page: usize,
    ) -> Result<Vec<Article>, SearchError> {
        let base = self
            .config
            .api_base()
            .ok_or_else(|| SearchError::Config("help-center base URL not configured".into()))?;
        let (user, token) = self
            .config
            .basic_auth()
            .ok_or_else(|| SearchError::Config("help-center credentials not configured".into()))?;

        let endpoint = Url::parse(&format!("{base}/{SEARCH_PATH}"))
            .map_err(|e| SearchError::Config(format!("invalid help-center URL: {e}")))?;

        tracing::trace!(query, per_page, "help-center article search");
        let per_page = per_page.to_string();

        let response = self
            .client
            .get(endpoint)
            .basic_auth(user, Some(token))
            .query(&[
                ("query", query),
                ("locale", LOCALE),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("help-center request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("help-center HTTP error: {e}")))?;

        let body: ArticleSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::from_reqwest("help-center response unreadable", e))?;

        Ok(body.results)
    }
}

/// Map one article into a unified result. Articles without an id or title
/// are dropped.
pub(crate) fn map_article(article: Article, shape: ResultShape) -> Option<SearchResult> {
    let native_id = render_id(&article.id)?;
    let title = article
        .title
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())?;

    let body = article.body.unwrap_or_default();
    let original_score = article.score.unwrap_or(0.0);
    let section_id = article.section_id.as_ref().and_then(render_id);

    let category = match shape.fixed_category {
        Some(label) => Some(label.to_owned()),
        None => section_id.as_ref().map(|id| format!("Section {id}")),
    };

    let last_updated = article
        .updated_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let mut metadata = Map::new();
    metadata.insert(
        "section_id".into(),
        section_id.map_or(Value::Null, Value::String),
    );
    metadata.insert(
        "locale".into(),
        article.locale.map_or(Value::Null, Value::String),
    );
    metadata.insert(
        "created_at".into(),
        article.created_at.map_or(Value::Null, Value::String),
    );
    metadata.insert("original_score".into(), Value::from(original_score));

    Some(SearchResult {
        id: format!("{}_{native_id}", shape.id_prefix),
        title,
        url: article.html_url.unwrap_or_default(),
        snippet: normalize(&body, SNIPPET_LENGTH),
        content: body,
        score: (original_score * shape.score_factor).max(0.0),
        source: shape.source,
        category,
        section: None,
        last_updated,
        metadata,
    })
}

/// Render a JSON id (number or string) as text.
fn render_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}
