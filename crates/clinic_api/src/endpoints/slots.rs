//! `/api/slots`: the shared weekly slot catalog.

use crate::endpoints::{require_admin, IdQuery};
use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::gate::Claims;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use clinic_core::{ServiceResult, SlotFields, SlotRecord, SlotService, SqliteSlotRepository};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SlotPayload {
    pub day: String,
    pub start: String,
    pub end: String,
}

impl From<SlotPayload> for SlotFields {
    fn from(value: SlotPayload) -> Self {
        Self {
            day: value.day,
            start: value.start,
            end: value.end,
        }
    }
}

/// `GET /api/slots[?id=]`
pub async fn read(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    match query.optional()? {
        Some(id) => {
            let slot = state
                .store
                .run(move |conn| -> ServiceResult<_> {
                    SlotService::new(SqliteSlotRepository::try_new(conn)?).get_slot(id)
                })
                .await??;
            Ok(ApiResponse::ok("Slot retrieved successfully.", slot).into_response())
        }
        None => {
            let slots = state
                .store
                .run(|conn| -> ServiceResult<_> {
                    SlotService::new(SqliteSlotRepository::try_new(conn)?).list_slots()
                })
                .await??;
            Ok(ApiResponse::ok("Slots retrieved successfully.", slots).into_response())
        }
    }
}

/// `POST /api/slots`
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<SlotPayload>, JsonRejection>,
) -> Result<ApiResponse<SlotRecord>, ApiError> {
    require_admin(&claims)?;
    let Json(payload) = payload?;
    let fields = SlotFields::from(payload);

    let slot = state
        .store
        .run(move |conn| -> ServiceResult<_> {
            SlotService::new(SqliteSlotRepository::try_new(conn)?).create_slot(&fields)
        })
        .await??;
    Ok(ApiResponse::created("Slot created successfully.", slot))
}

/// `PUT /api/slots?id=`
pub async fn replace(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<SlotPayload>, JsonRejection>,
) -> Result<ApiResponse<SlotRecord>, ApiError> {
    require_admin(&claims)?;
    let Query(query) = query?;
    let id = query.required()?;
    let Json(payload) = payload?;
    let fields = SlotFields::from(payload);

    let slot = state
        .store
        .run(move |conn| -> ServiceResult<_> {
            SlotService::new(SqliteSlotRepository::try_new(conn)?).replace_slot(id, &fields)
        })
        .await??;
    Ok(ApiResponse::ok("Slot updated successfully.", slot))
}

/// `DELETE /api/slots?id=`. A slot still assigned to a practitioner is a
/// conflict.
pub async fn remove(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    require_admin(&claims)?;
    let Query(query) = query?;
    let id = query.required()?;

    state
        .store
        .run(move |conn| -> ServiceResult<_> {
            SlotService::new(SqliteSlotRepository::try_new(conn)?).delete_slot(id)
        })
        .await??;
    Ok(ApiResponse::message("Slot deleted successfully."))
}
