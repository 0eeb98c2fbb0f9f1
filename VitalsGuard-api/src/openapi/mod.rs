use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Assessment endpoints
        crate::api::handlers::assessments::create_assessment,
        crate::api::handlers::assessments::list_assessments,
        crate::api::handlers::assessments::get_assessment,

        // Vitals endpoints
        crate::api::handlers::vitals::list_vitals,
        crate::api::handlers::vitals::get_vitals_trends
    ),
    components(
        schemas(
            // Entities
            crate::entities::assessment::CreateAssessmentRequest,
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain types returned by the API
            vitals_guard_domain::entities::prediction::HealthPrediction,
            vitals_guard_domain::entities::prediction::PredictionMode,
            vitals_guard_domain::entities::prediction::RiskLevel,
            vitals_guard_domain::entities::prediction::Feature,
            vitals_guard_domain::entities::prediction::FeatureImportance,
            vitals_guard_domain::entities::prediction::Explainability,
            vitals_guard_domain::entities::prediction::ConfidenceIntervals,
            vitals_guard_domain::entities::prediction::ModelContribution,
            vitals_guard_domain::entities::prediction::ModelContributions,
            vitals_guard_domain::entities::vitals::Gender,
            vitals_guard_domain::entities::vitals::UserProfile,
            vitals_guard_domain::entities::vitals::VitalsReading,
            vitals_guard_domain::entities::vitals::RecordedVitals,
            vitals_guard_domain::entities::trends::VitalsTrends
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "assessments", description = "Vital-sign risk assessments"),
        (name = "vitals", description = "Stored readings and trends")
    ),
    info(
        title = "VitalsGuard API",
        version = "0.1.0",
        description = "API for scoring vital signs and explaining the resulting health risk",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
