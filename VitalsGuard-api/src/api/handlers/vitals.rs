use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use super::assessments::{service_error_response, PredictionServiceHandle};
use crate::entities::common::LimitQueryParams;

/// List the most recent stored readings, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vitals",
    params(LimitQueryParams),
    responses(
        (status = 200, description = "Recent readings", body = Vec<vitals_guard_domain::entities::vitals::RecordedVitals>),
        (status = 400, description = "Invalid limit", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::entities::common::ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn list_vitals(
    State(service): State<PredictionServiceHandle>,
    Query(params): Query<LimitQueryParams>,
) -> Result<impl IntoResponse, Response> {
    match service.recent_readings(params.limit).await {
        Ok(readings) => {
            info!("Returning {} readings", readings.len());
            Ok((StatusCode::OK, Json(readings)))
        }
        Err(e) => Err(service_error_response("Failed to list readings", &e)),
    }
}

/// Summary statistics over the most recent readings
#[utoipa::path(
    get,
    path = "/api/v1/vitals/trends",
    params(LimitQueryParams),
    responses(
        (status = 200, description = "Trends calculated", body = vitals_guard_domain::entities::trends::VitalsTrends),
        (status = 404, description = "No readings to analyze", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::entities::common::ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn get_vitals_trends(
    State(service): State<PredictionServiceHandle>,
    Query(params): Query<LimitQueryParams>,
) -> Result<impl IntoResponse, Response> {
    info!("Calculating vitals trends");

    match service.trends(params.limit).await {
        Ok(trends) => Ok((StatusCode::OK, Json(trends))),
        Err(e) => Err(service_error_response("Failed to calculate trends", &e)),
    }
}
