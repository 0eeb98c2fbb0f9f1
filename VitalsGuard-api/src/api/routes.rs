use axum::{routing::get, Extension, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use vitals_guard_data::repository::VitalsRepository;
use vitals_guard_domain::config::PredictorConfig;

use crate::api::handlers::assessments::PredictionServiceHandle;
use crate::api::handlers::health::HealthServiceHandle;
use crate::api::handlers::{assessments, health, vitals};
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub async fn create_app() -> Router {
    debug!("Creating application router");

    let config = match PredictorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            warn!("Invalid predictor configuration, using defaults: {}", e);
            PredictorConfig::default()
        }
    };
    info!(
        "Predictor configured: mode={}, history_limit={}",
        config.mode, config.history_limit
    );

    // Readings and predictions are shared between the prediction and health services
    let repository = VitalsRepository::new();
    let prediction_service = assessments::create_service(repository.clone(), config);
    let health_service = health::create_health_service(repository);

    create_app_with(prediction_service, health_service)
}

/// Build the router around existing services
pub fn create_app_with(prediction_service: PredictionServiceHandle, health_service: HealthServiceHandle) -> Router {
    let api_routes = Router::new()
        // Define specific routes before parametrized routes to avoid conflicts
        .route(
            "/assessments",
            get(assessments::list_assessments).post(assessments::create_assessment),
        )
        .route("/assessments/:id", get(assessments::get_assessment))
        .route("/vitals/trends", get(vitals::get_vitals_trends))
        .route("/vitals", get(vitals::list_vitals));

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(prediction_service);

    let app = add_swagger_ui(app)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    debug!("Swagger UI merged");

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
