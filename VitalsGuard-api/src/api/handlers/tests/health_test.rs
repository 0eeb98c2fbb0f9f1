use axum::http::StatusCode;
use tower::ServiceExt;

use vitals_guard_domain::health::ComponentStatus;
use vitals_guard_domain::testing::{MockHealthService, MockPredictionService};

use super::{app_with, body_json, empty_request};

#[tokio::test]
async fn test_healthy_system_returns_ok() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());

    let response = app.oneshot(empty_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["storage"]["status"], "ok");
    assert_eq!(body["components"]["predictor"]["status"], "ok");
    assert!(body["components"].get("additional").is_none());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_degraded_storage_returns_service_unavailable() {
    let app = app_with(
        MockPredictionService::new(),
        MockHealthService::new().with_degraded_storage(),
    );

    let response = app.oneshot(empty_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["storage"]["status"], "degraded");
}

#[tokio::test]
async fn test_unhealthy_storage_returns_internal_error() {
    let app = app_with(
        MockPredictionService::new(),
        MockHealthService::new().with_unhealthy_storage(),
    );

    let response = app.oneshot(empty_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["components"]["storage"]["message"], "Storage unavailable");
}

#[tokio::test]
async fn test_additional_components_are_reported() {
    let app = app_with(
        MockPredictionService::new(),
        MockHealthService::new().with_component(
            "cache",
            ComponentStatus::Degraded,
            Some("Cache warming up".to_string()),
        ),
    );

    let response = app.oneshot(empty_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["components"]["additional"]["cache"]["status"], "degraded");
    assert_eq!(body["components"]["additional"]["cache"]["message"], "Cache warming up");
}
