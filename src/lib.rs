//! # knowledge-gateway
//!
//! HTTP front end for [`unified_search`]. Accepts one query, fans it out to
//! the configured knowledge sources and answers with a single ranked list.

pub mod config;
pub mod error;
pub mod server;

pub use config::{Environment, GatewayConfig, ServerConfig};
pub use error::{GatewayError, Result};
pub use server::{AppState, GatewayServer, build_router};
