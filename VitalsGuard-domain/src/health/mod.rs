//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use vitals_guard_data::repository::VitalsRepositoryTrait;

use crate::entities::vitals::VitalsReading;
use crate::services::ensemble::EnsembleAggregator;
use crate::services::jitter::NoJitter;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Derive the overall status from the worst component
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };
        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the storage layer.
    /// Returns the number of stored readings and predictions, or an error if
    /// the storage cannot be read.
    async fn check_storage_status(&self) -> Result<(usize, usize), String>;
}

/// Score a fixed reference reading to confirm the scoring pipeline works
pub fn check_predictor_status() -> Result<(), String> {
    let reference = VitalsReading {
        heart_rate: 75,
        blood_pressure_systolic: 120,
        blood_pressure_diastolic: 80,
        spo2: 98,
        temperature: 36.8,
        timestamp: Utc::now(),
    };
    EnsembleAggregator::new(&NoJitter)
        .predict(&reference, None)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Health service backed by the vitals repository
#[derive(Debug)]
pub struct HealthService<R> {
    repository: R,
}

impl<R: VitalsRepositoryTrait> HealthService<R> {
    /// Create a new health service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> HealthServiceTrait for HealthService<R>
where
    R: VitalsRepositoryTrait + Send + Sync + std::fmt::Debug,
{
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        let storage = match self.check_storage_status().await {
            Ok((readings, predictions)) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("{} readings, {} predictions stored", readings, predictions)),
            },
            Err(e) => {
                warn!("Storage health check failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                }
            }
        };
        components.insert("storage".to_string(), storage);

        let predictor = match check_predictor_status() {
            Ok(()) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };
        components.insert("predictor".to_string(), predictor);

        SystemHealth::from_components(components)
    }

    async fn check_storage_status(&self) -> Result<(usize, usize), String> {
        self.repository
            .record_counts()
            .await
            .map_err(|e| format!("Storage unavailable: {}", e))
    }
}
