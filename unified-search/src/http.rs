//! Shared HTTP client construction for upstream source requests.

use crate::config::SourcesConfig;
use crate::error::SearchError;
use std::time::Duration;

/// User-Agent sent to every upstream source.
pub const USER_AGENT: &str = concat!("unified-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for one adapter.
///
/// Each adapter owns its own client so that the per-call timeout applies to
/// that source alone.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SourcesConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_default_config() {
        let client = build_client(&SourcesConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn user_agent_carries_crate_version() {
        assert!(USER_AGENT.starts_with("unified-search/"));
        assert!(USER_AGENT.len() > "unified-search/".len());
    }
}
