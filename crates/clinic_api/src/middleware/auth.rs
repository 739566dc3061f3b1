//! Bearer token authentication middleware.
//!
//! Runs before every resource handler. Checks that a token secret is
//! configured, extracts `Authorization: Bearer <token>`, verifies it through
//! the identity gate, and injects [`Claims`] into request extensions.

use crate::error::ApiError;
use crate::gate::{AuthError, Claims};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::warn;

const BEARER_PREFIX: &str = "Bearer ";

pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let gate = state.gate.as_ref().ok_or(ApiError::Configuration)?;
    let token = bearer_token(headers).ok_or(AuthError::Missing)?;
    gate.verify(token).map_err(|err| {
        warn!(
            "event=auth_verify module=api status=error error_type={}",
            err.error_type()
        );
        ApiError::from(err)
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
