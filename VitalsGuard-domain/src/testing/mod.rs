// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use vitals_guard_data::repository::tests::MockVitalsRepository;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::entities::prediction::{HealthPrediction, PredictionMode};
use crate::entities::trends::VitalsTrends;
use crate::entities::vitals::{RecordedVitals, VitalsInput};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth};
use crate::services::ensemble::EnsembleAggregator;
use crate::services::jitter::NoJitter;
use crate::services::prediction::{PredictionServiceError, PredictionServiceTrait};
use crate::services::simple::calculate_risk_score;
use crate::services::trends::calculate_trends;

fn lock_error<T>(_: T) -> PredictionServiceError {
    PredictionServiceError::RepositoryError("mock state lock poisoned".to_string())
}

/// Mock implementation of the PredictionServiceTrait for testing.
///
/// Scores with the real rules and no jitter, and keeps results in memory.
#[derive(Debug, Default)]
pub struct MockPredictionService {
    predictions: RwLock<Vec<HealthPrediction>>,
    readings: RwLock<Vec<RecordedVitals>>,
    mode: PredictionMode,
    should_fail_validation: bool,
    should_fail_creation: bool,
}

impl MockPredictionService {
    /// Create a new mock prediction service
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the default prediction mode
    pub fn with_mode(mut self, mode: PredictionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Configure the mock to fail creation
    pub fn with_creation_failure(mut self) -> Self {
        self.should_fail_creation = true;
        self
    }

    /// Add a pre-defined prediction to the mock
    pub fn with_prediction(self, prediction: HealthPrediction) -> Self {
        if let Ok(mut predictions) = self.predictions.write() {
            predictions.push(prediction);
        }
        self
    }
}

#[async_trait]
impl PredictionServiceTrait for MockPredictionService {
    fn mode(&self) -> PredictionMode {
        self.mode
    }

    fn validate_vitals(&self, _input: &VitalsInput) -> Result<(), PredictionServiceError> {
        if self.should_fail_validation {
            Err(PredictionServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn predict(
        &self,
        input: &VitalsInput,
        mode: Option<PredictionMode>,
    ) -> Result<HealthPrediction, PredictionServiceError> {
        self.validate_vitals(input)?;
        let reading = input.reading();
        let profile = input.profile();
        let prediction = match mode.unwrap_or(self.mode) {
            PredictionMode::Ensemble => EnsembleAggregator::new(&NoJitter).predict(&reading, profile.as_ref())?,
            PredictionMode::Simple => calculate_risk_score(&reading, profile.as_ref(), &NoJitter)?,
        };
        Ok(prediction)
    }

    async fn create_assessment(
        &self,
        input: VitalsInput,
        mode: Option<PredictionMode>,
    ) -> Result<HealthPrediction, PredictionServiceError> {
        let prediction = self.predict(&input, mode)?;

        if self.should_fail_creation {
            return Err(PredictionServiceError::RepositoryError(
                "Repository error - mock is configured to fail creation".to_string(),
            ));
        }

        self.readings.write().map_err(lock_error)?.push(RecordedVitals {
            id: uuid::Uuid::new_v4().to_string(),
            reading: input.reading(),
            profile: input.profile(),
        });
        self.predictions.write().map_err(lock_error)?.push(prediction.clone());

        Ok(prediction)
    }

    async fn recent_predictions(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<HealthPrediction>, PredictionServiceError> {
        let predictions = self.predictions.read().map_err(lock_error)?;
        Ok(predictions
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn get_prediction_by_id(&self, id: &str) -> Result<HealthPrediction, PredictionServiceError> {
        let predictions = self.predictions.read().map_err(lock_error)?;
        predictions
            .iter()
            .find(|p| p.id.to_string() == id)
            .cloned()
            .ok_or_else(|| PredictionServiceError::NotFound(format!("Prediction with ID {} not found", id)))
    }

    async fn recent_readings(&self, limit: Option<usize>) -> Result<Vec<RecordedVitals>, PredictionServiceError> {
        let readings = self.readings.read().map_err(lock_error)?;
        Ok(readings
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn trends(&self, limit: Option<usize>) -> Result<VitalsTrends, PredictionServiceError> {
        let readings: Vec<_> = self.recent_readings(limit).await?.iter().map(|r| r.reading).collect();
        let latest = self.recent_predictions(Some(1)).await?;
        calculate_trends(&readings, &latest)
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    /// Storage component status
    storage_status: ComponentStatus,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            storage_status: ComponentStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with degraded storage
    pub fn with_degraded_storage(mut self) -> Self {
        self.storage_status = ComponentStatus::Degraded;
        self
    }

    /// Configure the mock with unhealthy storage
    pub fn with_unhealthy_storage(mut self) -> Self {
        self.storage_status = ComponentStatus::Unhealthy;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert(
            "storage".to_string(),
            HealthComponent {
                status: self.storage_status.clone(),
                details: match self.storage_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Storage is responding slowly".to_string()),
                    ComponentStatus::Unhealthy => Some("Storage unavailable".to_string()),
                },
            },
        );
        components.insert(
            "predictor".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );

        for (name, component) in &self.components {
            components.insert(name.clone(), component.clone());
        }

        SystemHealth::from_components(components)
    }

    async fn check_storage_status(&self) -> Result<(usize, usize), String> {
        match self.storage_status {
            ComponentStatus::Healthy | ComponentStatus::Degraded => Ok((0, 0)),
            ComponentStatus::Unhealthy => Err("Storage unavailable".to_string()),
        }
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}

