use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::config::{PredictorConfig, MAX_HISTORY_LIMIT};
use crate::entities::conversions;
use crate::entities::prediction::{HealthPrediction, PredictionMode};
use crate::entities::trends::VitalsTrends;
use crate::entities::vitals::{RecordedVitals, VitalsInput};
use crate::services::ensemble::EnsembleAggregator;
use crate::services::jitter::ConfidenceJitter;
use crate::services::scorers::ScoringError;
use crate::services::simple::calculate_risk_score;
use crate::services::trends::calculate_trends;
use vitals_guard_data::repository::{RepositoryError, VitalsRepositoryTrait};

/// Prediction service errors
#[derive(Debug, Error)]
pub enum PredictionServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A sub-scorer could not score the reading
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Not found error
    #[error("Prediction not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Insufficient data error
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// Trait for risk prediction operations
#[async_trait]
pub trait PredictionServiceTrait {
    /// Strategy used when a request does not choose one
    fn mode(&self) -> PredictionMode;

    /// Validate a vitals input against the physiological ranges
    fn validate_vitals(&self, input: &VitalsInput) -> Result<(), PredictionServiceError>;

    /// Validate and score a reading without storing anything
    fn predict(
        &self,
        input: &VitalsInput,
        mode: Option<PredictionMode>,
    ) -> Result<HealthPrediction, PredictionServiceError>;

    /// Validate, score and store a reading together with its prediction
    async fn create_assessment(
        &self,
        input: VitalsInput,
        mode: Option<PredictionMode>,
    ) -> Result<HealthPrediction, PredictionServiceError>;

    /// Most recent predictions, newest first
    async fn recent_predictions(&self, limit: Option<usize>)
        -> Result<Vec<HealthPrediction>, PredictionServiceError>;

    /// Get a prediction by ID
    async fn get_prediction_by_id(&self, id: &str) -> Result<HealthPrediction, PredictionServiceError>;

    /// Most recent readings, newest first
    async fn recent_readings(&self, limit: Option<usize>) -> Result<Vec<RecordedVitals>, PredictionServiceError>;

    /// Trends over the most recent readings
    async fn trends(&self, limit: Option<usize>) -> Result<VitalsTrends, PredictionServiceError>;
}

/// Prediction service for domain logic
pub struct PredictionService<R: VitalsRepositoryTrait> {
    repository: R,
    config: PredictorConfig,
    jitter: Box<dyn ConfidenceJitter>,
}

impl<R: VitalsRepositoryTrait> PredictionService<R> {
    /// Create a new prediction service, building the jitter source from the configuration
    pub fn new(repository: R, config: PredictorConfig) -> Self {
        let jitter = config.jitter.build();
        Self::with_jitter(repository, config, jitter)
    }

    /// Create a prediction service with an explicit jitter source
    pub fn with_jitter(repository: R, config: PredictorConfig, jitter: Box<dyn ConfidenceJitter>) -> Self {
        Self {
            repository,
            config,
            jitter,
        }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> PredictionServiceError {
        match err {
            RepositoryError::NotFound(msg) => PredictionServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => PredictionServiceError::ValidationError(msg),
            _ => PredictionServiceError::RepositoryError(err.to_string()),
        }
    }

    /// Apply the configured default and the upper bound to a requested limit
    fn resolve_limit(&self, limit: Option<usize>) -> Result<usize, PredictionServiceError> {
        match limit {
            Some(0) => Err(PredictionServiceError::ValidationError(
                "limit: must be at least 1".to_string(),
            )),
            Some(limit) => Ok(limit.min(MAX_HISTORY_LIMIT)),
            None => Ok(self.config.history_limit),
        }
    }
}

#[async_trait]
impl<R: VitalsRepositoryTrait + Send + Sync> PredictionServiceTrait for PredictionService<R> {
    fn mode(&self) -> PredictionMode {
        self.config.mode
    }

    fn validate_vitals(&self, input: &VitalsInput) -> Result<(), PredictionServiceError> {
        // NaN passes the range checks, so finiteness is checked first
        if !input.temperature.is_finite() {
            return Err(PredictionServiceError::ValidationError(
                "temperature: Temperature must be a finite number".to_string(),
            ));
        }

        if let Err(validation_errors) = input.validate() {
            let mut fields: Vec<_> = validation_errors.field_errors().into_iter().collect();
            fields.sort_by_key(|(field, _)| *field);

            let error_message = fields
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|err| {
                            if let Some(msg) = &err.message {
                                msg.to_string()
                            } else {
                                format!("Invalid {}", field)
                            }
                        })
                        .collect();
                    format!("{}: {}", field, error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            return Err(PredictionServiceError::ValidationError(error_message));
        }

        Ok(())
    }

    fn predict(
        &self,
        input: &VitalsInput,
        mode: Option<PredictionMode>,
    ) -> Result<HealthPrediction, PredictionServiceError> {
        self.validate_vitals(input)?;

        let reading = input.reading();
        let profile = input.profile();
        let mode = mode.unwrap_or(self.config.mode);

        let prediction = match mode {
            PredictionMode::Ensemble => {
                EnsembleAggregator::new(self.jitter.as_ref()).predict(&reading, profile.as_ref())?
            }
            PredictionMode::Simple => calculate_risk_score(&reading, profile.as_ref(), self.jitter.as_ref())?,
        };

        debug!(
            "Scored reading in {} mode: {} ({})",
            mode, prediction.risk_level, prediction.risk_score
        );
        Ok(prediction)
    }

    async fn create_assessment(
        &self,
        input: VitalsInput,
        mode: Option<PredictionMode>,
    ) -> Result<HealthPrediction, PredictionServiceError> {
        let prediction = self.predict(&input, mode)?;
        let reading = input.reading();
        let profile = input.profile();

        // Encoding must succeed before anything is stored
        let data_record = conversions::convert_to_data_record(&reading, profile.as_ref());
        let data_prediction = conversions::convert_to_data_prediction(&prediction)
            .map_err(|e| PredictionServiceError::RepositoryError(e.to_string()))?;

        let (stored_reading, _) = self
            .repository
            .append_assessment(data_record, data_prediction)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!(
            "Stored assessment {} for reading {} with risk level {}",
            prediction.id, stored_reading.id, prediction.risk_level
        );
        Ok(prediction)
    }

    async fn recent_predictions(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<HealthPrediction>, PredictionServiceError> {
        let limit = self.resolve_limit(limit)?;
        let stored = self
            .repository
            .recent_predictions(limit)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        stored
            .into_iter()
            .map(|p| {
                conversions::convert_to_domain_prediction(p)
                    .map_err(|e| PredictionServiceError::RepositoryError(e.to_string()))
            })
            .collect()
    }

    async fn get_prediction_by_id(&self, id: &str) -> Result<HealthPrediction, PredictionServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id).map_err(PredictionServiceError::ValidationError)?;

        let stored = self
            .repository
            .get_prediction_by_id(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| PredictionServiceError::NotFound(format!("Prediction with ID {} not found", id)))?;

        conversions::convert_to_domain_prediction(stored)
            .map_err(|e| PredictionServiceError::RepositoryError(e.to_string()))
    }

    async fn recent_readings(&self, limit: Option<usize>) -> Result<Vec<RecordedVitals>, PredictionServiceError> {
        let limit = self.resolve_limit(limit)?;
        let stored = self
            .repository
            .recent_readings(limit)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        stored
            .into_iter()
            .map(|r| conversions::convert_to_domain_reading(r).map_err(PredictionServiceError::RepositoryError))
            .collect()
    }

    async fn trends(&self, limit: Option<usize>) -> Result<VitalsTrends, PredictionServiceError> {
        let recorded = self.recent_readings(limit).await?;
        if recorded.is_empty() {
            warn!("Trends requested with no stored readings");
        }
        let readings: Vec<_> = recorded.iter().map(|r| r.reading).collect();
        let latest = self.recent_predictions(Some(1)).await?;

        calculate_trends(&readings, &latest)
    }
}

/// Create a default prediction service using the repository from data layer
pub fn create_default_prediction_service(config: PredictorConfig) -> impl PredictionServiceTrait + Send + Sync {
    let repository = vitals_guard_data::repository::VitalsRepository::new();
    PredictionService::new(repository, config)
}

/// Create a mock prediction service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_prediction_service() -> impl PredictionServiceTrait + Send + Sync {
    crate::testing::MockPredictionService::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::prediction::RiskLevel;
    use crate::entities::vitals::Gender;
    use crate::services::jitter::{JitterStrategy, NoJitter};
    use vitals_guard_data::repository::tests::MockVitalsRepository;
    use vitals_guard_data::repository::VitalsRepository;

    fn valid_input() -> VitalsInput {
        VitalsInput {
            heart_rate: 72,
            blood_pressure_systolic: 118,
            blood_pressure_diastolic: 76,
            spo2: 98,
            temperature: 36.8,
            age: None,
            gender: None,
            timestamp: None,
        }
    }

    fn service_with<R: VitalsRepositoryTrait>(repository: R) -> PredictionService<R> {
        PredictionService::with_jitter(repository, PredictorConfig::default(), Box::new(NoJitter))
    }

    #[test]
    fn test_validate_vitals_valid() {
        let service = service_with(MockVitalsRepository::new());
        assert!(service.validate_vitals(&valid_input()).is_ok());
    }

    #[test]
    fn test_validate_vitals_reports_every_field() {
        let service = service_with(MockVitalsRepository::new());
        let input = VitalsInput {
            heart_rate: 20,
            blood_pressure_diastolic: 160,
            ..valid_input()
        };
        let message = service.validate_vitals(&input).unwrap_err().to_string();
        assert!(message.contains("Heart rate must be between 30 and 250 bpm"));
        assert!(message.contains("Diastolic pressure"));
        assert!(message.starts_with("Validation error: blood_pressure_diastolic"));
    }

    #[test]
    fn test_validate_vitals_rejects_nan_temperature() {
        let service = service_with(MockVitalsRepository::new());
        let input = VitalsInput {
            temperature: f64::NAN,
            ..valid_input()
        };
        let result = service.validate_vitals(&input);
        assert!(matches!(result, Err(PredictionServiceError::ValidationError(_))));
    }

    #[test]
    fn test_predict_uses_configured_mode_and_override() {
        let config = PredictorConfig {
            mode: PredictionMode::Simple,
            jitter: JitterStrategy::None,
            ..PredictorConfig::default()
        };
        let service = PredictionService::new(MockVitalsRepository::new(), config);

        let default_mode = service.predict(&valid_input(), None).unwrap();
        assert_eq!(default_mode.mode, PredictionMode::Simple);
        assert!(default_mode.explainability.is_none());

        let ensemble = service.predict(&valid_input(), Some(PredictionMode::Ensemble)).unwrap();
        assert_eq!(ensemble.mode, PredictionMode::Ensemble);
        assert!(ensemble.explainability.is_some());
        assert!(ensemble.confidence_intervals.is_some());
        assert!(ensemble.model_contributions.is_some());
    }

    #[test]
    fn test_predict_applies_profile() {
        let service = service_with(MockVitalsRepository::new());
        let input = VitalsInput {
            heart_rate: 110,
            age: Some(70),
            gender: Some(Gender::Female),
            ..valid_input()
        };
        let prediction = service.predict(&input, None).unwrap();
        let contributions = prediction.model_contributions.unwrap();
        assert!((contributions.cardiovascular.score - 36.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_create_assessment_persists_reading_and_prediction() {
        let repository = VitalsRepository::new();
        let service = service_with(repository.clone());

        let input = VitalsInput { spo2: 88, ..valid_input() };
        let prediction = service.create_assessment(input, None).await.unwrap();
        assert_eq!(prediction.risk_level, RiskLevel::Critical);

        assert_eq!(repository.record_counts().await.unwrap(), (1, 1));

        let fetched = service.get_prediction_by_id(&prediction.id.to_string()).await.unwrap();
        assert_eq!(fetched.id, prediction.id);
        assert_eq!(fetched.risk_score, prediction.risk_score);
        assert_eq!(fetched.recommendations, prediction.recommendations);
        assert_eq!(fetched.feedback, prediction.feedback);

        let readings = service.recent_readings(None).await.unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].reading.spo2, 88);
    }

    #[tokio::test]
    async fn test_stored_prediction_links_to_stored_reading() {
        let repository = VitalsRepository::new();
        let service = service_with(repository.clone());

        let prediction = service.create_assessment(valid_input(), None).await.unwrap();

        let readings = repository.recent_readings(1).await.unwrap();
        let stored = repository.get_prediction_by_id(prediction.id).await.unwrap().unwrap();
        assert_eq!(stored.reading_id, Some(readings[0].id.clone()));
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_persisted() {
        let repository = VitalsRepository::new();
        let service = service_with(repository.clone());

        let input = VitalsInput { spo2: 50, ..valid_input() };
        let result = service.create_assessment(input, None).await;
        assert!(matches!(result, Err(PredictionServiceError::ValidationError(_))));
        assert_eq!(repository.record_counts().await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_get_prediction_errors() {
        let service = service_with(MockVitalsRepository::new());

        let bad_id = service.get_prediction_by_id("not-a-uuid").await;
        assert!(matches!(bad_id, Err(PredictionServiceError::ValidationError(_))));

        let missing = service
            .get_prediction_by_id("7f1c3a52-9a7e-4d8e-b1a4-3c2f0e9d8b71")
            .await;
        assert!(matches!(missing, Err(PredictionServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_repository_failure_is_mapped() {
        let service = service_with(MockVitalsRepository::failing());
        let result = service.create_assessment(valid_input(), None).await;
        assert!(matches!(result, Err(PredictionServiceError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn test_recent_predictions_newest_first_and_limit() {
        let service = service_with(VitalsRepository::new());
        for heart_rate in [70, 105, 130] {
            let input = VitalsInput { heart_rate, ..valid_input() };
            service.create_assessment(input, None).await.unwrap();
        }

        let recent = service.recent_predictions(Some(2)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].timestamp >= recent[1].timestamp);
        assert!(recent[0].predicted_conditions.contains(&"Tachycardia Risk".to_string()));

        let zero = service.recent_predictions(Some(0)).await;
        assert!(matches!(zero, Err(PredictionServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_trends() {
        let service = service_with(VitalsRepository::new());

        let empty = service.trends(None).await;
        assert!(matches!(empty, Err(PredictionServiceError::InsufficientData(_))));

        for heart_rate in [60, 80] {
            let input = VitalsInput { heart_rate, ..valid_input() };
            service.create_assessment(input, None).await.unwrap();
        }
        let trends = service.trends(None).await.unwrap();
        assert_eq!(trends.reading_count, 2);
        assert_eq!(trends.avg_heart_rate, 70.0);
        assert_eq!(trends.latest_risk_level, Some(RiskLevel::Low));
    }
}
