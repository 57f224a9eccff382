//! Final multi-factor scoring for merged results.
//!
//! Starting from the score each adapter assigned, every result gains:
//! - Title term boost: +20 per query token (> 2 chars) found in the title
//! - Phrase boost: +30 when the title contains the whole query
//! - Source priority: zendesk +10, knowledge_base +8, docs +6, other +0
//! - Recency: +5 if updated within 30 days, a further +10 within 7 days
//!
//! The list is then sorted by score, descending. The sort is stable, so
//! equal scores keep their merge order.

use chrono::{DateTime, Duration, Utc};

use crate::types::SearchResult;

/// Added once per query token found in the title.
pub const TITLE_TERM_BOOST: f64 = 20.0;
/// Added when the title contains the entire query.
pub const TITLE_PHRASE_BOOST: f64 = 30.0;
/// Added for content updated within [`RECENT_DAYS`].
pub const RECENT_BOOST: f64 = 5.0;
/// Added on top of [`RECENT_BOOST`] for content updated within [`FRESH_DAYS`].
pub const FRESH_BOOST: f64 = 10.0;

/// Window for [`RECENT_BOOST`].
pub const RECENT_DAYS: i64 = 30;
/// Window for [`FRESH_BOOST`].
pub const FRESH_DAYS: i64 = 7;

/// Query tokens of this many characters or fewer are ignored.
const MIN_TOKEN_CHARS: usize = 2;

/// Re-score and sort `results` for `query` against the current time.
pub fn rank(results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
    rank_at(results, query, Utc::now())
}

/// Re-score and sort `results` for `query` as of `now`.
pub fn rank_at(
    mut results: Vec<SearchResult>,
    query: &str,
    now: DateTime<Utc>,
) -> Vec<SearchResult> {
    let terms = QueryTerms::new(query);

    for result in &mut results {
        result.score = calculate_score(result, &terms, now);
    }

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

/// Lowercased query phrase plus the tokens that count for term boosts.
#[derive(Debug, Clone)]
pub struct QueryTerms {
    phrase: String,
    tokens: Vec<String>,
}

impl QueryTerms {
    /// Tokenize `query` on whitespace, keeping tokens longer than two
    /// characters.
    pub fn new(query: &str) -> Self {
        let phrase = query.trim().to_lowercase();
        let tokens = phrase
            .split_whitespace()
            .filter(|t| t.chars().count() > MIN_TOKEN_CHARS)
            .map(str::to_owned)
            .collect();
        Self { phrase, tokens }
    }
}

/// Final score for one result.
pub fn calculate_score(result: &SearchResult, terms: &QueryTerms, now: DateTime<Utc>) -> f64 {
    let title = result.title.to_lowercase();
    let mut score = result.score;

    for token in &terms.tokens {
        if title.contains(token.as_str()) {
            score += TITLE_TERM_BOOST;
        }
    }

    if !terms.phrase.is_empty() && title.contains(&terms.phrase) {
        score += TITLE_PHRASE_BOOST;
    }

    score += source_priority(result.source.tag());
    score += recency_boost(result.last_updated, now);
    score
}

/// Priority bonus for a source tag. Unknown tags get nothing.
pub fn source_priority(tag: &str) -> f64 {
    match tag {
        "zendesk" => 10.0,
        "knowledge_base" => 8.0,
        "docs" => 6.0,
        _ => 0.0,
    }
}

/// Bonus for recently updated content. Timestamps in the future count as
/// brand new.
pub fn recency_boost(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(updated) = last_updated else {
        return 0.0;
    };
    let age = now.signed_duration_since(updated);

    let mut boost = 0.0;
    if age < Duration::days(RECENT_DAYS) {
        boost += RECENT_BOOST;
    }
    if age < Duration::days(FRESH_DAYS) {
        boost += FRESH_BOOST;
    }
    boost
}
