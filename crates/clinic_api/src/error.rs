//! API error taxonomy and its HTTP mapping.

use crate::envelope::Envelope;
use crate::gate::AuthError;
use crate::store::StoreError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_core::{ServiceError, ValidationError};
use log::error;
use serde_json::{json, Value};

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Token secret not configured; details stay in the server log.
    #[error("Server configuration error.")]
    Configuration,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(AuthError),
    #[error("Forbidden.")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Method {method} Not Allowed")]
    MethodNotAllowed {
        method: String,
        allowed: &'static str,
    },
    #[error("An error occurred while accessing storage.")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Configuration | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn result(&self) -> Value {
        match self {
            Self::Unauthorized(kind) => json!({ "errorType": kind.error_type() }),
            Self::Storage(details) => json!({ "errorDetails": details }),
            _ => Value::Null,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Configuration => {
                error!("event=config_check module=api status=error error_code=jwt_secret_missing");
            }
            Self::Storage(details) => {
                error!("event=storage_call module=api status=error error={details}");
            }
            _ => {}
        }

        let body = Envelope::new(status, self.to_string(), self.result());
        let mut response = (status, Json(body)).into_response();
        if let Self::MethodNotAllowed { allowed, .. } = &self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(*allowed));
        }
        response
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        Self::Unauthorized(value)
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => err.into(),
            ServiceError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} {id} not found."))
            }
            ServiceError::Conflict(message) => Self::Conflict(message),
            ServiceError::Repo(err) => Self::Storage(err.to_string()),
            ServiceError::InconsistentState(details) => Self::Storage(details.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::Validation(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn configuration_error_hides_details() {
        let response = ApiError::Configuration.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Server configuration error.");
        assert!(json["result"].is_null());
    }

    #[tokio::test]
    async fn unauthorized_carries_error_type() {
        let response = ApiError::Unauthorized(AuthError::Expired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["statusCode"], 401);
        assert_eq!(json["message"], "Access denied. Token has expired.");
        assert_eq!(json["result"]["errorType"], "expired");
    }

    #[tokio::test]
    async fn method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed {
            method: "PATCH".to_string(),
            allowed: "GET, POST, PUT, DELETE",
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(header::ALLOW).unwrap(),
            "GET, POST, PUT, DELETE"
        );
        let json = body_json(response).await;
        assert_eq!(json["message"], "Method PATCH Not Allowed");
    }

    #[tokio::test]
    async fn storage_error_exposes_details() {
        let response = ApiError::Storage("disk I/O error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["result"]["errorDetails"], "disk I/O error");
    }

    #[test]
    fn service_errors_map_to_statuses() {
        let missing: ApiError =
            ServiceError::Validation(ValidationError::MissingField("name")).into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.to_string(), "name is required.");

        let absent: ApiError = ServiceError::NotFound {
            entity: "practitioner",
            id: 9,
        }
        .into();
        assert_eq!(absent.status(), StatusCode::NOT_FOUND);

        let conflict: ApiError = ServiceError::Conflict("slot 3 in use".to_string()).into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }
}
