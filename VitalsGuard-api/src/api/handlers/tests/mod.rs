mod assessments_test;
mod health_test;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use serde_json::Value;

use vitals_guard_domain::testing::{MockHealthService, MockPredictionService};

use crate::api::routes::create_app_with;

/// Router over the given mocks
pub(super) fn app_with(prediction: MockPredictionService, health: MockHealthService) -> Router {
    create_app_with(Arc::new(prediction), Arc::new(health))
}

/// Build a JSON request
pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body
pub(super) fn empty_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Read a response body as JSON
pub(super) async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
