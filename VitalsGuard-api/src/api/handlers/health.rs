use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use vitals_guard_data::repository::VitalsRepository;
use vitals_guard_domain::health::{
    ComponentStatus as DomainComponentStatus, HealthComponent, HealthService, HealthServiceTrait, SystemStatus,
};

/// Shared handle to the health service
pub type HealthServiceHandle = Arc<dyn HealthServiceTrait + Send + Sync>;

/// Health check response with system information
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Unix timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Details about the components of the system
    pub components: ComponentStatus,
    /// Environment information
    pub environment: String,
}

/// Status of individual system components
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Reading and prediction storage
    pub storage: ComponentHealthStatus,
    /// Scoring pipeline
    pub predictor: ComponentHealthStatus,
    /// Additional components (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<serde_json::Value>,
}

/// Health status for an individual component
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Track the time when the server started using a thread-safe OnceCell
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time for uptime reporting
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let _ = SERVER_START_TIME.set(unix_now());
    });
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(
    Extension(health_service): Extension<HealthServiceHandle>,
) -> Result<impl IntoResponse, axum::response::Response> {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;

    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let mut component_statuses = ComponentStatus {
        storage: map_component(system_health.components.get("storage")),
        predictor: map_component(system_health.components.get("predictor")),
        additional: None,
    };

    let additional: serde_json::Map<String, serde_json::Value> = system_health
        .components
        .iter()
        .filter(|(name, _)| name.as_str() != "storage" && name.as_str() != "predictor")
        .map(|(name, component)| {
            (
                name.clone(),
                serde_json::json!({
                    "status": map_component_status(&component.status),
                    "message": component.details,
                }),
            )
        })
        .collect();
    if !additional.is_empty() {
        component_statuses.additional = Some(additional.into());
    }

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: component_statuses,
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    match system_health.status {
        SystemStatus::Healthy => Ok((StatusCode::OK, Json(response))),
        SystemStatus::Degraded => {
            warn!("System health is degraded");
            Ok((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
        }
        SystemStatus::Unhealthy => {
            warn!("System health is unhealthy");
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(response)))
        }
    }
}

fn map_component(component: Option<&HealthComponent>) -> ComponentHealthStatus {
    match component {
        Some(c) => ComponentHealthStatus {
            status: map_component_status(&c.status),
            message: c.details.clone(),
        },
        None => ComponentHealthStatus {
            status: "error".to_string(),
            message: Some("Component not reported".to_string()),
        },
    }
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}

/// Factory function to create a health service over the given repository
pub fn create_health_service(repository: VitalsRepository) -> HealthServiceHandle {
    Arc::new(HealthService::new(repository))
}
