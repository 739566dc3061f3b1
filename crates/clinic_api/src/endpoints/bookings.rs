//! `/api/bookings` and `/api/bookings/status`.
//!
//! Admins see and change every booking. Other callers are scoped to bookings
//! whose `accountId` equals their token subject: lists are filtered, foreign
//! single reads are reported as absent, and foreign writes are forbidden.

use crate::endpoints::{parse_optional_id, IdQuery};
use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::gate::Claims;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use clinic_core::{
    BookingFields, BookingId, BookingListQuery, BookingRecord, BookingService, PractitionerId,
    ServiceError, SqliteBookingRepository,
};
use clinic_core::validation::require_fields;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingsQuery {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub practitioner_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusQuery {
    pub id: Option<String>,
    pub status: Option<String>,
}

/// Request body for create and replace. A non-admin caller may omit
/// `accountId`; it defaults to the token subject.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingPayload {
    pub account_id: Option<i64>,
    pub practitioner_id: PractitionerId,
    pub date: String,
    pub time: String,
    pub method: String,
    pub status: String,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub booking_id: BookingId,
}

impl BookingPayload {
    fn into_fields(self, claims: &Claims) -> Result<BookingFields, ApiError> {
        let account_id = match (claims.is_admin(), self.account_id) {
            (true, account_id) => account_id.unwrap_or_default(),
            (false, None) => claims.sub,
            (false, Some(account_id)) if account_id == claims.sub => account_id,
            (false, Some(_)) => return Err(ApiError::Forbidden),
        };
        Ok(BookingFields {
            account_id,
            practitioner_id: self.practitioner_id,
            date: self.date,
            time: self.time,
            method: self.method,
            status: self.status,
            note: self.note,
        })
    }
}

fn booking_service(
    conn: &Connection,
) -> Result<BookingService<SqliteBookingRepository<'_>>, ApiError> {
    let repo = SqliteBookingRepository::try_new(conn).map_err(ServiceError::from)?;
    Ok(BookingService::new(repo))
}

/// Loads booking `id` as seen by `claims`; foreign bookings read as absent.
fn visible_booking(
    service: &BookingService<SqliteBookingRepository<'_>>,
    claims: &Claims,
    id: BookingId,
) -> Result<BookingRecord, ApiError> {
    let record = service.get_booking(id)?;
    if claims.is_admin() || record.account_id == claims.sub {
        Ok(record)
    } else {
        Err(ApiError::NotFound(format!("booking {id} not found.")))
    }
}

/// Fails with `Forbidden` when a non-admin targets someone else's booking.
fn ensure_owner(
    service: &BookingService<SqliteBookingRepository<'_>>,
    claims: &Claims,
    id: BookingId,
) -> Result<(), ApiError> {
    let record = service.get_booking(id)?;
    if claims.is_admin() || record.account_id == claims.sub {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// `GET /api/bookings[?id=|?accountId=&practitionerId=]`
pub async fn read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    if let Some(id) = parse_optional_id("id", query.id.as_deref())? {
        let record = state
            .store
            .run(move |conn| -> Result<_, ApiError> {
                visible_booking(&booking_service(conn)?, &claims, id)
            })
            .await??;
        return Ok(ApiResponse::ok("Booking retrieved successfully.", record).into_response());
    }

    let requested_account = parse_optional_id("accountId", query.account_id.as_deref())?;
    let list_query = BookingListQuery {
        account_id: if claims.is_admin() {
            requested_account
        } else {
            Some(claims.sub)
        },
        practitioner_id: parse_optional_id("practitionerId", query.practitioner_id.as_deref())?,
    };
    let records = state
        .store
        .run(move |conn| -> Result<_, ApiError> {
            Ok(booking_service(conn)?.list_bookings(&list_query)?)
        })
        .await??;
    Ok(ApiResponse::ok("Bookings retrieved successfully.", records).into_response())
}

/// `POST /api/bookings`
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<ApiResponse<BookingCreated>, ApiError> {
    let Json(payload) = payload?;
    let fields = payload.into_fields(&claims)?;

    let booking_id = state
        .store
        .run(move |conn| -> Result<_, ApiError> {
            Ok(booking_service(conn)?.create_booking(&fields)?)
        })
        .await??;
    Ok(ApiResponse::created(
        "Booking created successfully.",
        BookingCreated { booking_id },
    ))
}

/// `PUT /api/bookings?id=`
pub async fn replace(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<ApiResponse<BookingRecord>, ApiError> {
    let Query(query) = query?;
    let id = query.required()?;
    let Json(payload) = payload?;
    let fields = payload.into_fields(&claims)?;

    let record = state
        .store
        .run(move |conn| -> Result<_, ApiError> {
            let service = booking_service(conn)?;
            ensure_owner(&service, &claims, id)?;
            Ok(service.replace_booking(id, &fields)?)
        })
        .await??;
    Ok(ApiResponse::ok("Booking updated successfully.", record))
}

/// `DELETE /api/bookings?id=`
pub async fn remove(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Query(query) = query?;
    let id = query.required()?;

    state
        .store
        .run(move |conn| -> Result<_, ApiError> {
            let service = booking_service(conn)?;
            ensure_owner(&service, &claims, id)?;
            Ok(service.delete_booking(id)?)
        })
        .await??;
    Ok(ApiResponse::message("Booking deleted successfully."))
}

/// `PUT /api/bookings/status?id=&status=`
pub async fn change_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Query(query) = query?;
    let id = parse_optional_id("id", query.id.as_deref())?
        .ok_or_else(|| ApiError::Validation("id is required.".to_string()))?;
    let status = query.status.unwrap_or_default();
    require_fields([("status", status.as_str())])?;

    state
        .store
        .run(move |conn| -> Result<_, ApiError> {
            let service = booking_service(conn)?;
            ensure_owner(&service, &claims, id)?;
            Ok(service.update_status(id, &status)?)
        })
        .await??;
    Ok(ApiResponse::message("Booking status updated successfully."))
}
