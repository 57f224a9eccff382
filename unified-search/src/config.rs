//! Source configuration with sensible defaults.
//!
//! [`SourcesConfig`] carries the credentials and base URLs for every
//! knowledge source plus the per-call timeout. It is built once at startup
//! and handed to each adapter at construction; nothing mutates it afterwards.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default per-call timeout for upstream requests.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

/// Configuration for all knowledge sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Help-center API settings, shared by the zendesk and knowledge-base
    /// adapters.
    pub zendesk: ZendeskConfig,
    /// Documentation index settings.
    pub docs: DocsConfig,
    /// Per-call HTTP timeout in seconds, applied independently per adapter.
    pub timeout_seconds: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            zendesk: ZendeskConfig::default(),
            docs: DocsConfig::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl SourcesConfig {
    /// Validates this configuration.
    ///
    /// Missing credentials are not an error here: an unconfigured source
    /// simply contributes nothing at query time.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if let Some(ref base) = self.zendesk.base_url {
            url::Url::parse(base)
                .map_err(|e| SearchError::Config(format!("invalid zendesk base_url: {e}")))?;
        }
        if let Some(ref base) = self.docs.base_url {
            url::Url::parse(base)
                .map_err(|e| SearchError::Config(format!("invalid docs base_url: {e}")))?;
        }
        Ok(())
    }
}

/// Help-center API connection settings.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZendeskConfig {
    /// Account subdomain; the API base becomes
    /// `https://{subdomain}.zendesk.com/api/v2`.
    pub subdomain: Option<String>,
    /// Explicit API base URL. Takes precedence over `subdomain`.
    pub base_url: Option<String>,
    /// Agent email used for token authentication.
    pub email: Option<String>,
    /// API token paired with `email`.
    pub api_token: Option<String>,
}

impl ZendeskConfig {
    /// The API base URL without a trailing slash, if one can be derived.
    pub fn api_base(&self) -> Option<String> {
        if let Some(base) = non_empty(&self.base_url) {
            return Some(base.trim_end_matches('/').to_owned());
        }
        non_empty(&self.subdomain).map(|sub| format!("https://{sub}.zendesk.com/api/v2"))
    }

    /// Basic-auth credentials in token form: `("{email}/token", api_token)`.
    pub fn basic_auth(&self) -> Option<(String, String)> {
        let email = non_empty(&self.email)?;
        let token = non_empty(&self.api_token)?;
        Some((format!("{email}/token"), token.to_owned()))
    }

    /// Whether both an API base and credentials are available.
    pub fn is_configured(&self) -> bool {
        self.api_base().is_some() && self.basic_auth().is_some()
    }
}

impl fmt::Debug for ZendeskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZendeskConfig")
            .field("subdomain", &self.subdomain)
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Documentation index location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Host serving `search-index.json`, e.g. `https://docs.example.com`.
    pub base_url: Option<String>,
}

impl DocsConfig {
    /// The docs base URL without a trailing slash, if configured.
    pub fn base(&self) -> Option<String> {
        non_empty(&self.base_url).map(|b| b.trim_end_matches('/').to_owned())
    }

    /// Whether a base URL is available.
    pub fn is_configured(&self) -> bool {
        self.base().is_some()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_zendesk() -> ZendeskConfig {
        ZendeskConfig {
            subdomain: Some("acme".into()),
            base_url: None,
            email: Some("agent@acme.test".into()),
            api_token: Some("secret-token".into()),
        }
    }

    #[test]
    fn default_config_has_sensible_values() {
        let config = SourcesConfig::default();
        assert_eq!(config.timeout_seconds, 5);
        assert!(!config.zendesk.is_configured());
        assert!(!config.docs.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SourcesConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn invalid_base_urls_rejected() {
        let mut config = SourcesConfig::default();
        config.docs.base_url = Some("not a url".into());
        assert!(config.validate().unwrap_err().to_string().contains("docs"));

        let mut config = SourcesConfig::default();
        config.zendesk.base_url = Some("::".into());
        assert!(config.validate().unwrap_err().to_string().contains("zendesk"));
    }

    #[test]
    fn api_base_derived_from_subdomain() {
        let zendesk = configured_zendesk();
        assert_eq!(
            zendesk.api_base().as_deref(),
            Some("https://acme.zendesk.com/api/v2")
        );
        assert!(zendesk.is_configured());
    }

    #[test]
    fn explicit_base_url_wins_and_is_trimmed() {
        let zendesk = ZendeskConfig {
            base_url: Some("http://127.0.0.1:9000/api/v2/".into()),
            ..configured_zendesk()
        };
        assert_eq!(
            zendesk.api_base().as_deref(),
            Some("http://127.0.0.1:9000/api/v2")
        );
    }

    #[test]
    fn basic_auth_uses_token_form() {
        let (user, pass) = configured_zendesk().basic_auth().expect("credentials");
        assert_eq!(user, "agent@acme.test/token");
        assert_eq!(pass, "secret-token");
    }

    #[test]
    fn blank_credentials_are_not_configured() {
        let zendesk = ZendeskConfig {
            api_token: Some("   ".into()),
            ..configured_zendesk()
        };
        assert!(zendesk.basic_auth().is_none());
        assert!(!zendesk.is_configured());
    }

    #[test]
    fn debug_redacts_api_token() {
        let rendered = format!("{:?}", configured_zendesk());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn docs_base_trims_trailing_slash() {
        let docs = DocsConfig {
            base_url: Some("https://docs.example.com/".into()),
        };
        assert_eq!(docs.base().as_deref(), Some("https://docs.example.com"));
    }
}
