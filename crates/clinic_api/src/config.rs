//! Runtime settings for the HTTP server.

use crate::gate::{GateError, Hs256Gate, IdentityGate};
use axum::http::{header, HeaderValue, Method};
use log::warn;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const DEFAULT_DB_PATH: &str = "clinic.sqlite3";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Server configuration, usually assembled by the CLI from flags and
/// environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub db_path: PathBuf,
    pub bind: SocketAddr,
    /// HS256 signing secret. `None` keeps the server up but answers every
    /// resource request with a configuration error.
    pub jwt_secret: Option<String>,
    /// Single origin allowed by CORS.
    pub allowed_origin: String,
    pub max_connections: usize,
    pub token_ttl_secs: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            jwt_secret: None,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl ApiConfig {
    /// Builds the token gate, or `None` when no secret is configured.
    ///
    /// A blank secret counts as absent.
    pub fn identity_gate(&self) -> Result<Option<Arc<dyn IdentityGate>>, GateError> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => {
                let gate = Hs256Gate::new(secret, self.token_ttl_secs)?;
                Ok(Some(Arc::new(gate)))
            }
            _ => Ok(None),
        }
    }

    /// CORS policy admitting only `allowed_origin`.
    pub fn cors_layer(&self) -> CorsLayer {
        let base = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

        match HeaderValue::from_str(self.allowed_origin.trim()) {
            Ok(origin) => base.allow_origin(origin),
            Err(err) => {
                warn!(
                    "event=cors_config module=api status=error origin={} error={err}",
                    self.allowed_origin
                );
                base
            }
        }
    }
}
