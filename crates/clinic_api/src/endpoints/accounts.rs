//! `/api/accounts`: read-only account lookup.
//!
//! Admins may read any account and the full list; other callers may only
//! read their own account.

use crate::endpoints::{require_admin, IdQuery};
use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::gate::Claims;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use clinic_core::{AccountService, ServiceResult, SqliteAccountRepository};

/// `GET /api/accounts[?id=]`
pub async fn read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    match query.optional()? {
        Some(id) => {
            if !claims.is_admin() && id != claims.sub {
                return Err(ApiError::Forbidden);
            }
            let account = state
                .store
                .run(move |conn| -> ServiceResult<_> {
                    AccountService::new(SqliteAccountRepository::try_new(conn)?).get_account(id)
                })
                .await??;
            Ok(ApiResponse::ok("Account retrieved successfully.", account).into_response())
        }
        None => {
            require_admin(&claims)?;
            let accounts = state
                .store
                .run(|conn| -> ServiceResult<_> {
                    AccountService::new(SqliteAccountRepository::try_new(conn)?).list_accounts()
                })
                .await??;
            Ok(ApiResponse::ok("Accounts retrieved successfully.", accounts).into_response())
        }
    }
}
