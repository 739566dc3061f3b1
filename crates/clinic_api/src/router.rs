//! HTTP router.
//!
//! Resource routes live under `/api/` and share one authentication stage.
//! `/api/accounts` is read-only.
//! `/api/health` is unauthenticated.
//!
//! Layers, outermost first: CORS, access log, then (resource routes only)
//! bearer authentication. Unsupported methods on a resource answer 405 after
//! authentication, with an `Allow` header. Unknown paths answer an enveloped
//! 404 without authentication.
//!
//! `OPTIONS` is owned by the CORS layer: it is answered as a preflight before
//! routing and never reaches a handler.

use crate::config::ApiConfig;
use crate::endpoints::{self, reject_crud_method, reject_non_get, reject_non_put, unknown_route};
use crate::middleware::{access_log, auth};
use crate::state::AppState;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, put};
use axum::Router;

/// Builds the application router with CORS policy from `config`.
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    let resources = Router::new()
        .route(
            "/practitioners",
            get(endpoints::practitioners::read)
                .post(endpoints::practitioners::create)
                .put(endpoints::practitioners::replace)
                .delete(endpoints::practitioners::remove)
                .fallback(reject_crud_method),
        )
        .route(
            "/slots",
            get(endpoints::slots::read)
                .post(endpoints::slots::create)
                .put(endpoints::slots::replace)
                .delete(endpoints::slots::remove)
                .fallback(reject_crud_method),
        )
        .route(
            "/bookings",
            get(endpoints::bookings::read)
                .post(endpoints::bookings::create)
                .put(endpoints::bookings::replace)
                .delete(endpoints::bookings::remove)
                .fallback(reject_crud_method),
        )
        .route(
            "/bookings/status",
            put(endpoints::bookings::change_status).fallback(reject_non_put),
        )
        .route("/accounts", get(endpoints::accounts::read).fallback(reject_non_get))
        .layer(from_fn_with_state(state.clone(), auth::require_identity))
        .with_state(state);

    let public = Router::new().route("/health", get(endpoints::health::check));

    Router::new()
        .nest("/api", resources)
        .nest("/api", public)
        .fallback(unknown_route)
        .layer(from_fn(access_log::log_access))
        .layer(config.cors_layer())
}
