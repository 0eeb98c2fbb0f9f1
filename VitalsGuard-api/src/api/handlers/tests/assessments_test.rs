use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use vitals_guard_domain::testing::{MockHealthService, MockPredictionService};

use super::{app_with, body_json, empty_request, json_request};

fn normal_body() -> Value {
    json!({
        "heart_rate": 72,
        "blood_pressure_systolic": 118,
        "blood_pressure_diastolic": 76,
        "spo2": 98,
        "temperature_f": 98.6
    })
}

#[tokio::test]
async fn test_create_assessment_returns_created() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());

    let response = app
        .oneshot(json_request("POST", "/api/v1/assessments", &normal_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["risk_level"], "LOW");
    assert_eq!(body["risk_score"], 0);
    assert_eq!(body["mode"], "ensemble");
    assert!(body["modelContributions"].is_object());
    assert!(body["confidenceIntervals"].is_object());
}

#[tokio::test]
async fn test_low_oxygen_is_critical() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());
    let mut request = normal_body();
    request["spo2"] = json!(88);

    let response = app
        .oneshot(json_request("POST", "/api/v1/assessments", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["risk_level"], "CRITICAL");
    let conditions = body["predicted_conditions"].as_array().unwrap();
    assert!(conditions.iter().any(|c| c == "Severe Hypoxemia"));
}

#[tokio::test]
async fn test_simple_mode_query() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());

    let response = app
        .oneshot(json_request("POST", "/api/v1/assessments?mode=simple", &normal_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["mode"], "simple");
    assert!(body.get("explainability").is_none());
    assert!(body.get("modelContributions").is_none());
}

#[tokio::test]
async fn test_fahrenheit_out_of_range_rejected() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());
    let mut request = normal_body();
    request["temperature_f"] = json!(120.0);

    let response = app
        .oneshot(json_request("POST", "/api/v1/assessments", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"]["temperature_f"].is_array());
}

#[tokio::test]
async fn test_domain_validation_failure_is_bad_request() {
    let app = app_with(
        MockPredictionService::new().with_validation_failure(),
        MockHealthService::new(),
    );

    let response = app
        .oneshot(json_request("POST", "/api/v1/assessments", &normal_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = app_with(
        MockPredictionService::new().with_creation_failure(),
        MockHealthService::new(),
    );

    let response = app
        .oneshot(json_request("POST", "/api/v1/assessments", &normal_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "internal_error");
    assert!(!body["message"].as_str().unwrap().contains("mock"));
}

#[tokio::test]
async fn test_created_assessment_can_be_fetched() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/assessments", &normal_body()))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request(&format!("/api/v1/assessments/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], id.as_str());

    let response = app.oneshot(empty_request("/api/v1/assessments?limit=10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_assessment_is_not_found() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());

    let response = app
        .oneshot(empty_request(&format!("/api/v1/assessments/{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");
}

#[tokio::test]
async fn test_trends_without_readings_is_not_found() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());

    let response = app.oneshot(empty_request("/api/v1/vitals/trends")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "insufficient_data");
}

#[tokio::test]
async fn test_readings_and_trends_after_assessment() {
    let app = app_with(MockPredictionService::new(), MockHealthService::new());

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/assessments", &normal_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(empty_request("/api/v1/vitals")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let readings = body_json(response).await;
    assert_eq!(readings[0]["reading"]["heart_rate"], 72);

    let response = app.oneshot(empty_request("/api/v1/vitals/trends")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let trends = body_json(response).await;
    assert_eq!(trends["reading_count"], 1);
    assert_eq!(trends["latest_risk_level"], "LOW");
}
