//! `/api/practitioners`: practitioners with their weekly availability.
//!
//! Reads are open to any verified caller; writes need the admin role.

use crate::endpoints::{require_admin, IdQuery};
use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::gate::Claims;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use clinic_core::{
    PractitionerFields, PractitionerId, PractitionerService, ServiceResult, SlotId,
    SqlitePractitionerRepository, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Request body for create and replace. Absent keys deserialize as blank so
/// validation can name the missing field.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PractitionerPayload {
    pub name: String,
    pub specialty: String,
    pub gender: String,
    pub phone: String,
    pub biography: String,
    pub facility: String,
    pub slot_ids: Option<Vec<SlotId>>,
}

impl PractitionerPayload {
    fn into_parts(self) -> (PractitionerFields, Option<Vec<SlotId>>) {
        (
            PractitionerFields {
                name: self.name,
                specialty: self.specialty,
                gender: self.gender,
                phone: self.phone,
                biography: self.biography,
                facility: self.facility,
            },
            self.slot_ids,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerCreated {
    pub practitioner_id: PractitionerId,
}

/// `GET /api/practitioners[?id=]`
pub async fn read(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    match query.optional()? {
        Some(id) => {
            let record = state
                .store
                .run(move |conn| -> ServiceResult<_> {
                    PractitionerService::new(SqlitePractitionerRepository::try_new(conn)?)
                        .get_practitioner(id)
                })
                .await??;
            Ok(ApiResponse::ok("Practitioner retrieved successfully.", record).into_response())
        }
        None => {
            let records = state
                .store
                .run(|conn| -> ServiceResult<_> {
                    PractitionerService::new(SqlitePractitionerRepository::try_new(conn)?)
                        .list_practitioners()
                })
                .await??;
            Ok(ApiResponse::ok("Practitioners retrieved successfully.", records).into_response())
        }
    }
}

/// `POST /api/practitioners`
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<PractitionerPayload>, JsonRejection>,
) -> Result<ApiResponse<PractitionerCreated>, ApiError> {
    require_admin(&claims)?;
    let Json(payload) = payload?;
    let (fields, slot_ids) = payload.into_parts();
    let slot_ids = slot_ids.unwrap_or_default();

    let practitioner_id = state
        .store
        .run(move |conn| -> ServiceResult<_> {
            PractitionerService::new(SqlitePractitionerRepository::try_new(conn)?)
                .create_practitioner(&fields, &slot_ids)
        })
        .await??;

    Ok(ApiResponse::created(
        "Practitioner created successfully.",
        PractitionerCreated { practitioner_id },
    ))
}

/// `PUT /api/practitioners?id=`
///
/// `slotIds` is required here but may be empty, which clears availability.
pub async fn replace(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<PractitionerPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    require_admin(&claims)?;
    let Query(query) = query?;
    let id = query.required()?;
    let Json(payload) = payload?;

    let (fields, slot_ids) = payload.into_parts();
    fields.trimmed().validate()?;
    let slot_ids = slot_ids.ok_or(ValidationError::MissingField("slotIds"))?;

    let record = state
        .store
        .run(move |conn| -> ServiceResult<_> {
            PractitionerService::new(SqlitePractitionerRepository::try_new(conn)?)
                .replace_practitioner(id, &fields, &slot_ids)
        })
        .await??;
    Ok(ApiResponse::ok("Practitioner updated successfully.", record).into_response())
}

/// `DELETE /api/practitioners?id=`
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
            PractitionerService::new(SqlitePractitionerRepository::try_new(conn)?)
                .delete_practitioner(id)
        })
        .await??;
    Ok(ApiResponse::message("Practitioner deleted successfully."))
}
