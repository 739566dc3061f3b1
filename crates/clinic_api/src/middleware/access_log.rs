//! Per-request access log line with a generated request id.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use log::info;
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn log_access(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started_at = Instant::now();

    let mut response = next.run(req).await;

    info!(
        "event=http_request module=api request_id={request_id} method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
