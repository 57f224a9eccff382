//! HTTP surface of the gateway.
//!
//! ## Endpoints
//!
//! - `POST /api/search/unified`: fan a query out to the enabled sources and
//!   return one ranked list
//! - `GET /health`: liveness plus which sources are configured

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;
use unified_search::{SearchResult, Source, SourceRegistry};

use crate::config::{Environment, GatewayConfig};
use crate::error::{GatewayError, Result};

/// Version tag reported in every successful search response.
pub const API_VERSION: &str = "unified_v1";

/// Result count used when the request does not name one.
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound on the requested result count.
pub const MAX_LIMIT: usize = 100;

/// Shortest accepted query, in characters, after trimming.
pub const MIN_QUERY_CHARS: usize = 2;

const QUERY_TOO_SHORT: &str = "Query must be at least 2 characters long";
const INVALID_BODY: &str = "Invalid request body";
const SEARCH_FAILED: &str = "Search service error";
const REDACTED_DETAILS: &str = "Internal server error";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/search/unified`.
///
/// Fields are kept loosely typed so that a wrong-typed field degrades to its
/// default instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnifiedSearchRequest {
    /// Search text. Must be a string of at least two non-blank characters.
    #[serde(default)]
    pub query: Value,
    /// Requested number of results.
    #[serde(default)]
    pub limit: Value,
    /// Caller filters. Accepted and echoed nowhere; not sent upstream.
    #[serde(default)]
    pub filters: Value,
    /// Source tags to query. Missing means all of them.
    #[serde(default)]
    pub sources: Value,
    /// Accepted for compatibility. Snippets are always included.
    #[serde(default)]
    pub include_snippets: Value,
    /// Accepted for compatibility. Results are always ordered by score.
    #[serde(default)]
    pub sort_by: Value,
}

/// Successful search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedSearchResponse {
    /// Always `true`.
    pub success: bool,
    /// Ranked results, at most `returned` of them.
    pub results: Vec<SearchResult>,
    /// Results produced by all sources before truncation.
    pub total: usize,
    /// Length of `results`.
    pub returned: usize,
    /// The trimmed query.
    pub query: String,
    /// Sources that were queried, in request order.
    pub sources: Vec<Source>,
    /// RFC 3339 response time.
    pub timestamp: String,
    /// Always [`API_VERSION`].
    pub api_version: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"OK"`.
    pub status: String,
    /// Configured service name.
    pub service: String,
    /// Crate version.
    pub version: String,
    /// RFC 3339 response time.
    pub timestamp: String,
    /// Which sources have the configuration they need.
    pub sources: SourceStatus,
}

/// Per-source configured flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    /// Help-center credentials and base are present.
    pub zendesk: bool,
    /// Documentation base URL is present.
    pub docs: bool,
    /// Same requirement as `zendesk`.
    pub knowledge_base: bool,
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers. Read-only after construction.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Adapter table shared by every request.
    pub registry: Arc<SourceRegistry>,
    /// Controls how much internal detail a 500 exposes.
    pub environment: Environment,
    /// Reported by the health endpoint.
    pub service_name: String,
}

impl AppState {
    /// Build state from gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the source configuration is invalid or an HTTP
    /// client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        Ok(Self {
            registry: Arc::new(SourceRegistry::from_config(&config.sources)?),
            environment: config.environment,
            service_name: config.service_name.clone(),
        })
    }
}

/// Build the gateway router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/search/unified", post(handle_unified_search))
        .route("/health", get(handle_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GatewayServer
// ---------------------------------------------------------------------------

/// The gateway HTTP server, serving in a background task.
pub struct GatewayServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl GatewayServer {
    /// Start the gateway.
    ///
    /// Binds to `{config.server.host}:{config.server.port}` (use port `0`
    /// for auto-assign) and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the source configuration is invalid or the TCP
    /// listener cannot bind.
    pub async fn start(config: &GatewayConfig) -> Result<Self> {
        let app = build_router(AppState::new(config)?);

        let bind_addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| GatewayError::Server(format!("bind to {bind_addr} failed: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Server(format!("failed to get local addr: {e}")))?;

        info!(
            %addr,
            environment = ?config.environment,
            zendesk = config.sources.zendesk.is_configured(),
            docs = config.sources.docs.is_configured(),
            "gateway listening"
        );

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("gateway server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for GatewayServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Request interpretation
// ---------------------------------------------------------------------------

/// Returns the trimmed query, or the raw text to echo back on rejection.
fn validate_query(query: &Value) -> std::result::Result<String, String> {
    let Some(raw) = query.as_str() else {
        return Err(String::new());
    };
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return Err(raw.to_owned());
    }
    Ok(trimmed.to_owned())
}

/// Resolve the requested limit, clamped into `1..=MAX_LIMIT`.
fn effective_limit(limit: &Value) -> usize {
    let requested = match limit {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    };
    match requested {
        None => DEFAULT_LIMIT,
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).map_or(MAX_LIMIT, |n| n.min(MAX_LIMIT)),
    }
}

/// Resolve the enabled sources: all when absent, otherwise the recognised
/// tags in request order with repeats dropped.
fn enabled_sources(sources: &Value) -> Vec<Source> {
    let Value::Array(tags) = sources else {
        return Source::all().to_vec();
    };
    let mut enabled: Vec<Source> = Vec::with_capacity(tags.len());
    for source in tags.iter().filter_map(Value::as_str).filter_map(Source::from_tag) {
        if !enabled.contains(&source) {
            enabled.push(source);
        }
    }
    enabled
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

fn query_rejected(raw: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": QUERY_TOO_SHORT, "query": raw })),
    )
        .into_response()
}

fn invalid_body() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": INVALID_BODY })),
    )
        .into_response()
}

/// Build the 500 body. Internal detail is withheld in production.
fn server_error(environment: Environment, details: &str) -> Response {
    let details = if environment.is_production() {
        REDACTED_DETAILS
    } else {
        details
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": SEARCH_FAILED,
            "details": details,
            "timestamp": timestamp(),
        })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `POST /api/search/unified`
async fn handle_unified_search(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        // A body without a JSON content type reads as an empty request.
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Map::new()),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            return invalid_body();
        }
    };
    let request: UnifiedSearchRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "request body is not an object");
            return invalid_body();
        }
    };

    let query = match validate_query(&request.query) {
        Ok(query) => query,
        Err(raw) => return query_rejected(raw),
    };
    let limit = effective_limit(&request.limit);
    let sources = enabled_sources(&request.sources);

    info!(limit, sources = ?sources, "unified search");
    tracing::trace!(%query, "unified search query");

    let registry = Arc::clone(&state.registry);
    let task_query = query.clone();
    let task_sources = sources.clone();
    let pipeline = tokio::spawn(async move {
        unified_search::search(&registry, &task_query, limit, &task_sources).await
    });

    match pipeline.await {
        Ok(outcome) => {
            info!(
                total = outcome.total,
                returned = outcome.results.len(),
                "unified search complete"
            );
            Json(UnifiedSearchResponse {
                success: true,
                returned: outcome.results.len(),
                total: outcome.total,
                results: outcome.results,
                query,
                sources,
                timestamp: timestamp(),
                api_version: API_VERSION.to_owned(),
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "search pipeline failed");
            server_error(state.environment, &e.to_string())
        }
    }
}

/// `GET /health`
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health(&state))
}

fn health(state: &AppState) -> HealthResponse {
    HealthResponse {
        status: "OK".to_owned(),
        service: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        timestamp: timestamp(),
        sources: SourceStatus {
            zendesk: state.registry.is_configured(Source::Zendesk),
            docs: state.registry.is_configured(Source::Docs),
            knowledge_base: state.registry.is_configured(Source::KnowledgeBase),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn query_is_trimmed() {
        assert_eq!(
            validate_query(&json!("  password reset ")).unwrap(),
            "password reset"
        );
    }

    #[test]
    fn short_query_echoes_raw_text() {
        assert_eq!(validate_query(&json!("x")).unwrap_err(), "x");
        assert_eq!(validate_query(&json!("  a  ")).unwrap_err(), "  a  ");
    }

    #[test]
    fn non_string_query_echoes_empty() {
        assert_eq!(validate_query(&Value::Null).unwrap_err(), "");
        assert_eq!(validate_query(&json!(42)).unwrap_err(), "");
        assert_eq!(validate_query(&json!(["ab"])).unwrap_err(), "");
    }

    #[test]
    fn query_length_counts_characters() {
        assert!(validate_query(&json!("éé")).is_ok());
        assert!(validate_query(&json!("é")).is_err());
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(effective_limit(&Value::Null), DEFAULT_LIMIT);
        assert_eq!(effective_limit(&json!("5")), DEFAULT_LIMIT);
        assert_eq!(effective_limit(&json!(5)), 5);
        assert_eq!(effective_limit(&json!(0)), 1);
        assert_eq!(effective_limit(&json!(-3)), 1);
        assert_eq!(effective_limit(&json!(500)), MAX_LIMIT);
        assert_eq!(effective_limit(&json!(u64::MAX)), MAX_LIMIT);
        assert_eq!(effective_limit(&json!(7.9)), 7);
    }

    #[test]
    fn sources_default_to_all() {
        assert_eq!(enabled_sources(&Value::Null), Source::all().to_vec());
        assert_eq!(enabled_sources(&json!("docs")), Source::all().to_vec());
    }

    #[test]
    fn unknown_and_repeated_sources_are_dropped() {
        let enabled = enabled_sources(&json!(["docs", "confluence", "zendesk", "docs", 7]));
        assert_eq!(enabled, vec![Source::Docs, Source::Zendesk]);
    }

    #[test]
    fn empty_source_list_enables_nothing() {
        assert!(enabled_sources(&json!([])).is_empty());
    }

    #[test]
    fn request_accepts_loose_fields() {
        let request: UnifiedSearchRequest = serde_json::from_value(json!({
            "query": "billing",
            "limit": "lots",
            "filters": { "locale": "en-us" },
            "include_snippets": "yes",
            "sort_by": 3
        }))
        .unwrap();
        assert_eq!(request.query, json!("billing"));
        assert_eq!(effective_limit(&request.limit), DEFAULT_LIMIT);
    }

    #[test]
    fn request_rejects_non_object_body() {
        assert!(serde_json::from_value::<UnifiedSearchRequest>(json!("billing")).is_err());
    }

    #[test]
    fn health_reports_configured_sources() {
        let mut config = GatewayConfig::default();
        config.service_name = "Support Search".into();
        config.sources.docs.base_url = Some("https://docs.example.com".into());
        let state = AppState::new(&config).unwrap();

        let health = health(&state);
        assert_eq!(health.status, "OK");
        assert_eq!(health.service, "Support Search");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            health.sources,
            SourceStatus {
                zendesk: false,
                docs: true,
                knowledge_base: false,
            }
        );
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn server_error_exposes_details_outside_production() {
        let response = server_error(Environment::Development, "task panicked");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], SEARCH_FAILED);
        assert_eq!(body["details"], "task panicked");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn server_error_redacts_details_in_production() {
        let body = body_json(server_error(Environment::Production, "task panicked")).await;
        assert_eq!(body["details"], REDACTED_DETAILS);
    }

    #[tokio::test]
    async fn start_binds_ephemeral_port() {
        let mut config = GatewayConfig::default();
        config.server.port = 0;
        let server = GatewayServer::start(&config).await.unwrap();
        assert_ne!(server.port(), 0);
        assert!(server.addr().ip().is_loopback());
        server.shutdown();
    }

    #[tokio::test]
    async fn start_rejects_invalid_sources() {
        let mut config = GatewayConfig::default();
        config.server.port = 0;
        config.sources.timeout_seconds = 0;
        assert!(GatewayServer::start(&config).await.is_err());
    }
}
