//! Resource handlers.
//!
//! Handlers parse the request, check the caller's role, run one storage
//! closure through the pool, and wrap the outcome in the envelope.

pub mod accounts;
pub mod bookings;
pub mod health;
pub mod practitioners;
pub mod slots;

use crate::error::ApiError;
use crate::gate::Claims;
use axum::http::{Method, Uri};
use serde::Deserialize;

pub const ALLOW_CRUD: &str = "GET, POST, PUT, DELETE";
pub const ALLOW_PUT: &str = "PUT";
pub const ALLOW_GET: &str = "GET";

/// `?id=` query shared by every resource.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// Absent or blank means "no id"; anything else must be a positive integer.
    pub fn optional(&self) -> Result<Option<i64>, ApiError> {
        parse_optional_id("id", self.id.as_deref())
    }

    pub fn required(&self) -> Result<i64, ApiError> {
        self.optional()?
            .ok_or_else(|| ApiError::Validation("id is required.".to_string()))
    }
}

pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(ApiError::Validation(format!(
            "{field} must be a positive integer, got `{raw}`."
        ))),
    }
}

pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub fn method_not_allowed(method: &Method, allowed: &'static str) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        allowed,
    }
}

pub async fn reject_crud_method(method: Method) -> ApiError {
    method_not_allowed(&method, ALLOW_CRUD)
}

pub async fn reject_non_put(method: Method) -> ApiError {
    method_not_allowed(&method, ALLOW_PUT)
}

pub async fn reject_non_get(method: Method) -> ApiError {
    method_not_allowed(&method, ALLOW_GET)
}

/// Router-wide fallback so unknown paths still answer with the envelope.
pub async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}.", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_id_treats_blank_as_absent() {
        assert_eq!(parse_optional_id("id", None).unwrap(), None);
        assert_eq!(parse_optional_id("id", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_id("id", Some("17")).unwrap(), Some(17));
    }

    #[test]
    fn optional_id_rejects_non_positive_and_text() {
        for raw in ["0", "-4", "abc", "1.5"] {
            let err = parse_optional_id("id", Some(raw)).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn required_id_reports_missing() {
        let err = IdQuery::default().required().unwrap_err();
        assert_eq!(err.to_string(), "id is required.");
    }
}
