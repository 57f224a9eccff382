//! Configuration types for the gateway.
//!
//! Loaded once at startup from an optional TOML file, then overlaid with
//! environment variables. The resulting [`GatewayConfig`] is read-only for
//! the life of the process.

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use unified_search::SourcesConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "KNOWLEDGE_GATEWAY_CONFIG";

/// Top-level gateway configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener settings.
    pub server: ServerConfig,
    /// Deployment mode. Controls whether internal error detail is exposed.
    pub environment: Environment,
    /// Service name reported by the health endpoint.
    pub service_name: String,
    /// Upstream knowledge sources.
    pub sources: SourcesConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            environment: Environment::default(),
            service_name: "Unified Knowledge Search".to_owned(),
            sources: SourcesConfig::default(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local or staging use. Internal error detail is returned to callers.
    #[default]
    Development,
    /// Production. Internal error detail is withheld.
    Production,
}

impl Environment {
    /// Whether this is [`Environment::Production`].
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GatewayError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/knowledge-gateway/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("knowledge-gateway")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("knowledge-gateway")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/knowledge-gateway/config.toml")
        }
    }

    /// Resolve configuration for the running process.
    ///
    /// Reads the file named by [`CONFIG_PATH_ENV`] (which must exist), or
    /// the default path if present, otherwise starts from defaults. Process
    /// environment overrides are applied last, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, an environment
    /// value is malformed, or validation fails.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` or `GATEWAY_ENV` cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, which maps a variable name to its value.
    ///
    /// Recognised keys: `ZENDESK_SUBDOMAIN`, `ZENDESK_BASE_URL`,
    /// `ZENDESK_EMAIL`, `ZENDESK_API_TOKEN`, `DOCS_BASE_URL`, `GATEWAY_HOST`,
    /// `PORT`, `GATEWAY_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` or `GATEWAY_ENV` cannot be parsed.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ZENDESK_SUBDOMAIN") {
            self.sources.zendesk.subdomain = Some(v);
        }
        if let Some(v) = get("ZENDESK_BASE_URL") {
            self.sources.zendesk.base_url = Some(v);
        }
        if let Some(v) = get("ZENDESK_EMAIL") {
            self.sources.zendesk.email = Some(v);
        }
        if let Some(v) = get("ZENDESK_API_TOKEN") {
            self.sources.zendesk.api_token = Some(v);
        }
        if let Some(v) = get("DOCS_BASE_URL") {
            self.sources.docs.base_url = Some(v);
        }
        if let Some(v) = get("GATEWAY_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = v
                .trim()
                .parse()
                .map_err(|e| GatewayError::Config(format!("PORT must be a port number: {e}")))?;
        }
        if let Some(v) = get("GATEWAY_ENV") {
            self.environment = Environment::parse(&v).ok_or_else(|| {
                GatewayError::Config(format!(
                    "GATEWAY_ENV must be `development` or `production`, got `{v}`"
                ))
            })?;
        }
        Ok(())
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the service name is blank or the source
    /// configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(GatewayError::Config("service_name must not be empty".into()));
        }
        if self.server.host.trim().is_empty() {
            return Err(GatewayError::Config("server.host must not be empty".into()));
        }
        self.sources.validate()?;
        Ok(())
    }
}
