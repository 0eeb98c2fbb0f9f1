use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use vitals_guard_data::repository::VitalsRepository;
use vitals_guard_domain::config::PredictorConfig;
use vitals_guard_domain::services::{PredictionService, PredictionServiceError, PredictionServiceTrait};

use crate::entities::assessment::{AssessmentQueryParams, CreateAssessmentRequest};
use crate::entities::common::{ErrorResponse, LimitQueryParams};

/// Service type for dependency injection
pub type PredictionServiceHandle = Arc<dyn PredictionServiceTrait + Send + Sync>;

/// Create the prediction service the handlers use, over a shared repository
pub fn create_service(repository: VitalsRepository, config: PredictorConfig) -> PredictionServiceHandle {
    Arc::new(PredictionService::new(repository, config))
}

/// Log a service error at the right level and turn it into a response
pub(crate) fn service_error_response(context: &str, err: &PredictionServiceError) -> Response {
    match err {
        PredictionServiceError::ValidationError(_) | PredictionServiceError::Scoring(_) => {
            warn!("{}: {}", context, err)
        }
        PredictionServiceError::NotFound(_) | PredictionServiceError::InsufficientData(_) => {
            info!("{}: {}", context, err)
        }
        PredictionServiceError::RepositoryError(_) => error!("{}: {}", context, err),
    }
    ErrorResponse::from(err).into_response()
}

/// Score a reading and store it together with the resulting assessment
#[utoipa::path(
    post,
    path = "/api/v1/assessments",
    params(AssessmentQueryParams),
    request_body = CreateAssessmentRequest,
    responses(
        (status = 201, description = "Assessment created", body = vitals_guard_domain::entities::prediction::HealthPrediction),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "assessments"
)]
#[instrument(skip(service, request))]
pub async fn create_assessment(
    State(service): State<PredictionServiceHandle>,
    Query(params): Query<AssessmentQueryParams>,
    Json(request): Json<CreateAssessmentRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Creating new risk assessment");

    if let Err(errors) = request.validate() {
        warn!("Invalid assessment request: {}", errors);
        return Err(ErrorResponse::from_validation_errors(&errors).into_response());
    }

    let input = request.into_domain_input();

    match service.create_assessment(input, params.mode).await {
        Ok(prediction) => {
            info!(
                "Assessment {} created: {} ({})",
                prediction.id, prediction.risk_level, prediction.risk_score
            );
            Ok((StatusCode::CREATED, Json(prediction)))
        }
        Err(e) => Err(service_error_response("Failed to create assessment", &e)),
    }
}

/// List the most recent assessments, newest first
#[utoipa::path(
    get,
    path = "/api/v1/assessments",
    params(LimitQueryParams),
    responses(
        (status = 200, description = "Recent assessments", body = Vec<vitals_guard_domain::entities::prediction::HealthPrediction>),
        (status = 400, description = "Invalid limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "assessments"
)]
#[instrument(skip(service))]
pub async fn list_assessments(
    State(service): State<PredictionServiceHandle>,
    Query(params): Query<LimitQueryParams>,
) -> Result<impl IntoResponse, Response> {
    match service.recent_predictions(params.limit).await {
        Ok(predictions) => {
            info!("Returning {} assessments", predictions.len());
            Ok((StatusCode::OK, Json(predictions)))
        }
        Err(e) => Err(service_error_response("Failed to list assessments", &e)),
    }
}

/// Get a single assessment by ID
#[utoipa::path(
    get,
    path = "/api/v1/assessments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assessment ID")
    ),
    responses(
        (status = 200, description = "Assessment found", body = vitals_guard_domain::entities::prediction::HealthPrediction),
        (status = 404, description = "Assessment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "assessments"
)]
#[instrument(skip(service))]
pub async fn get_assessment(
    State(service): State<PredictionServiceHandle>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    info!("Fetching assessment with ID: {}", id);

    match service.get_prediction_by_id(&id.to_string()).await {
        Ok(prediction) => Ok((StatusCode::OK, Json(prediction))),
        Err(e) => Err(service_error_response("Failed to fetch assessment", &e)),
    }
}
