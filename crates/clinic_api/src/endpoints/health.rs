//! Unauthenticated liveness probe.

use crate::envelope::ApiResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /api/health`
pub async fn check() -> ApiResponse<HealthStatus> {
    ApiResponse::ok(
        "Service is healthy.",
        HealthStatus {
            status: clinic_core::ping(),
            version: clinic_core::core_version(),
        },
    )
}
