//! Core types: the unified result schema and source identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single result in the unified schema every adapter produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Source-prefixed identifier, e.g. `zendesk_123` or `docs_42`.
    pub id: String,
    /// Result title. Never empty.
    pub title: String,
    /// Link to the original content.
    pub url: String,
    /// Plain-text preview, HTML-stripped and length-bounded.
    pub snippet: String,
    /// Fuller text as received from the source; may still contain markup.
    pub content: String,
    /// Relevance score. Source-local on entry to the ranker, final after it.
    /// Never negative.
    pub score: f64,
    /// Which source produced this result.
    pub source: Source,
    /// Coarse grouping label.
    pub category: Option<String>,
    /// Fine-grained grouping label.
    pub section: Option<String>,
    /// When the upstream content last changed, if known.
    pub last_updated: Option<DateTime<Utc>>,
    /// Source-specific extra fields. Opaque to the ranker.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Knowledge sources the gateway can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Help-center article search.
    Zendesk,
    /// Static documentation search index.
    Docs,
    /// Help-center search biased toward support-style content.
    KnowledgeBase,
}

impl Source {
    /// Wire tag used in requests, responses and result ids.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Zendesk => "zendesk",
            Self::Docs => "docs",
            Self::KnowledgeBase => "knowledge_base",
        }
    }

    /// Parse a wire tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "zendesk" => Some(Self::Zendesk),
            "docs" => Some(Self::Docs),
            "knowledge_base" => Some(Self::KnowledgeBase),
            _ => None,
        }
    }

    /// Percentage of the overall request limit this source is asked for.
    pub fn limit_share_percent(&self) -> usize {
        match self {
            Self::Zendesk => 40,
            Self::Docs => 30,
            Self::KnowledgeBase => 30,
        }
    }

    /// This source's share of `limit`, rounded up.
    pub fn limit_share(&self, limit: usize) -> usize {
        (limit * self.limit_share_percent()).div_ceil(100)
    }

    /// All sources, in default dispatch order.
    pub fn all() -> &'static [Source] {
        &[Self::Zendesk, Self::Docs, Self::KnowledgeBase]
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
