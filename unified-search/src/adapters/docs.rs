//! Static documentation index search.
//!
//! The documentation site publishes a prebuilt `search-index.json`: an array
//! whose first element holds a `documents` list of compact records
//! (`t` title, `u` URL path, `b` breadcrumb segments, `i` internal id). The
//! adapter downloads the index, scores each record lexically against the
//! query, and returns the best matches.

use crate::adapter::SourceAdapter;
use crate::config::{DocsConfig, SourcesConfig};
use crate::error::SearchError;
use crate::http;
use crate::normalize::{normalize, SNIPPET_LENGTH};
use crate::types::{SearchResult, Source};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// File name of the index below the docs base URL.
pub const INDEX_FILE: &str = "search-index.json";

/// Category used when a document has no breadcrumbs.
pub const DEFAULT_CATEGORY: &str = "Documentation";

/// Documentation matches are weighted slightly below direct help-center
/// results.
pub const DOCS_SCORE_FACTOR: f64 = 0.9;

const TITLE_PHRASE_SCORE: f64 = 100.0;
const BREADCRUMB_PHRASE_SCORE: f64 = 50.0;
const TITLE_WORD_SCORE: f64 = 20.0;
const BREADCRUMB_WORD_SCORE: f64 = 10.0;

/// Query words of this many characters or fewer are ignored.
const MIN_WORD_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
struct SearchIndex {
    documents: Vec<IndexDocument>,
}

#[derive(Debug, Deserialize)]
struct IndexDocument {
    #[serde(default)]
    t: Option<String>,
    #[serde(default)]
    u: Option<String>,
    #[serde(default)]
    b: Option<Vec<String>>,
    #[serde(default)]
    i: Option<Value>,
}

/// Documentation index search adapter.
#[derive(Debug, Clone)]
pub struct DocsAdapter {
    client: reqwest::Client,
    config: DocsConfig,
}

impl DocsAdapter {
    /// Build the adapter from the shared source configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            config: config.docs.clone(),
        })
    }

    async fn fetch_index(&self, base: &str) -> Result<Vec<IndexDocument>, SearchError> {
        let endpoint = Url::parse(&format!("{base}/{INDEX_FILE}"))
            .map_err(|e| SearchError::Config(format!("invalid docs URL: {e}")))?;

        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("docs index request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("docs index HTTP error: {e}")))?;

        let body: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SearchError::from_reqwest("docs index unreadable", e))?;

        let first = body
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::Parse("docs index is empty".into()))?;
        let index: SearchIndex = serde_json::from_value(first)
            .map_err(|e| SearchError::Parse(format!("docs index has no documents: {e}")))?;

        tracing::trace!(documents = index.documents.len(), "docs index received");
        Ok(index.documents)
    }
}

impl SourceAdapter for DocsAdapter {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let base = self
            .config
            .base()
            .ok_or_else(|| SearchError::Config("docs base URL not configured".into()))?;
        let documents = self.fetch_index(&base).await?;
        Ok(rank_documents(documents, query, &base, limit))
    }

    fn source(&self) -> Source {
        Source::Docs
    }
}

/// Score, filter, locally sort and truncate index documents.
fn rank_documents(
    documents: Vec<IndexDocument>,
    query: &str,
    base: &str,
    limit: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = documents
        .into_iter()
        .filter_map(|doc| {
            let title = doc.t.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
            let path = doc.u.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
            let breadcrumbs = doc.b.clone().unwrap_or_default();

            let score = lexical_score(title, &breadcrumbs, query);
            if score <= 0.0 {
                return None;
            }

            Some(to_result(&doc, title, path, breadcrumbs, score * DOCS_SCORE_FACTOR, base))
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    results
}

/// Lexical relevance of a document before the docs weighting is applied.
///
/// ```text
/// +100  title contains the whole query
/// +50   breadcrumb text contains the whole query
/// +20   per query word (> 2 chars) found in the title
/// +10   per query word (> 2 chars) found in the breadcrumb text
/// ```
pub fn lexical_score(title: &str, breadcrumbs: &[String], query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0.0;
    }
    let title = title.to_lowercase();
    let trail = breadcrumbs.join(" ").to_lowercase();

    let mut score = 0.0;
    if title.contains(&query) {
        score += TITLE_PHRASE_SCORE;
    }
    if trail.contains(&query) {
        score += BREADCRUMB_PHRASE_SCORE;
    }

    for word in query
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_WORD_CHARS)
    {
        if title.contains(word) {
            score += TITLE_WORD_SCORE;
        }
        if trail.contains(word) {
            score += BREADCRUMB_WORD_SCORE;
        }
    }

    score
}

fn to_result(
    doc: &IndexDocument,
    title: &str,
    path: &str,
    breadcrumbs: Vec<String>,
    score: f64,
    base: &str,
) -> SearchResult {
    let native_id = match doc.i {
        Some(Value::Number(ref n)) => n.to_string(),
        Some(Value::String(ref s)) if !s.trim().is_empty() => s.trim().to_owned(),
        _ => path.to_owned(),
    };

    let trail = breadcrumbs.join(" > ");
    let snippet = if trail.is_empty() {
        normalize(title, SNIPPET_LENGTH)
    } else {
        normalize(&trail, SNIPPET_LENGTH)
    };
    let content = if trail.is_empty() {
        title.to_owned()
    } else {
        format!("{title}\n{trail}")
    };

    let category = breadcrumbs
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());
    let section = breadcrumbs.get(1).cloned();

    let mut metadata = Map::new();
    metadata.insert(
        "breadcrumbs".into(),
        Value::Array(breadcrumbs.into_iter().map(Value::String).collect()),
    );
    metadata.insert("path".into(), Value::String(path.to_owned()));

    SearchResult {
        id: format!("docs_{native_id}"),
        title: title.to_owned(),
        url: document_url(base, path),
        snippet,
        content,
        score,
        source: Source::Docs,
        category: Some(category),
        section,
        last_updated: None,
        metadata,
    }
}

/// Absolute link for an index path. Paths that are already absolute URLs
/// are kept.
fn document_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
