//! Uniform response envelope.
//!
//! Every response body, success or failure, has the shape
//! `{statusCode, message, result, time}` where `time` is RFC 3339 UTC with
//! millisecond precision.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub result: T,
    pub time: String,
}

impl<T> Envelope<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, result: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            result,
            time: timestamp_now(),
        }
    }
}

/// Successful handler output. `result` serializes as-is; `()` becomes `null`.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: String,
    result: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, result: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            result,
        }
    }

    pub fn created(message: impl Into<String>, result: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            result,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(message, ())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope::new(self.status, self.message, self.result);
        (self.status, Json(body)).into_response()
    }
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn created_response_carries_envelope() {
        let response =
            ApiResponse::created("Created.", serde_json::json!({ "id": 4 })).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 201);
        assert_eq!(json["message"], "Created.");
        assert_eq!(json["result"]["id"], 4);
    }

    #[tokio::test]
    async fn unit_result_serializes_as_null() {
        let response = ApiResponse::message("Deleted.").into_response();
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["result"].is_null());
    }

    #[test]
    fn timestamp_is_utc_with_millis() {
        let time = timestamp_now();
        assert!(time.ends_with('Z'), "{time}");
        let fraction = time
            .rsplit('.')
            .next()
            .expect("timestamp has a fractional part");
        assert_eq!(fraction.len(), "123Z".len());
    }
}
