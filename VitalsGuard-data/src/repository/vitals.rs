use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::models::prediction::StoredPrediction;
use crate::models::vitals::{CreateVitalsRecord, StoredVitalsReading};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;

/// Repository trait for vital-sign readings and the predictions computed from them
#[async_trait]
pub trait VitalsRepositoryTrait {
    /// Append a reading and the prediction computed from it.
    ///
    /// The reading gets a fresh ID and the prediction is linked to it. Either both
    /// records are stored or neither is.
    async fn append_assessment(
        &self,
        request: CreateVitalsRecord,
        prediction: StoredPrediction,
    ) -> Result<(StoredVitalsReading, StoredPrediction), RepositoryError>;

    /// Most recent readings, newest first
    async fn recent_readings(&self, limit: usize) -> Result<Vec<StoredVitalsReading>, RepositoryError>;

    /// Most recent predictions, newest first
    async fn recent_predictions(&self, limit: usize) -> Result<Vec<StoredPrediction>, RepositoryError>;

    /// Get a prediction by ID
    async fn get_prediction_by_id(&self, id: Uuid) -> Result<Option<StoredPrediction>, RepositoryError>;

    /// Number of stored readings and predictions
    async fn record_counts(&self) -> Result<(usize, usize), RepositoryError>;
}

/// Repository for readings and predictions backed by in-memory storage.
#[derive(Debug, Clone, Default)]
pub struct VitalsRepository {
    storage: InMemoryStorage,
}

impl VitalsRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }

    /// Create a repository over existing storage
    pub fn with_storage(storage: InMemoryStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl VitalsRepositoryTrait for VitalsRepository {
    async fn append_assessment(
        &self,
        request: CreateVitalsRecord,
        mut prediction: StoredPrediction,
    ) -> Result<(StoredVitalsReading, StoredPrediction), RepositoryError> {
        if !request.temperature.is_finite() {
            return Err(RepositoryError::Validation("invalid temperature: value is not finite".to_string()));
        }

        let reading = new_reading(request);
        prediction.reading_id = Some(reading.id.clone());

        debug!(
            "Storing reading {} with prediction {} ({})",
            reading.id, prediction.id, prediction.risk_level
        );
        self.storage.store_assessment(&reading, &prediction).await
    }

    async fn recent_readings(&self, limit: usize) -> Result<Vec<StoredVitalsReading>, RepositoryError> {
        self.storage.recent_readings(limit).await
    }

    async fn recent_predictions(&self, limit: usize) -> Result<Vec<StoredPrediction>, RepositoryError> {
        self.storage.recent_predictions(limit).await
    }

    async fn get_prediction_by_id(&self, id: Uuid) -> Result<Option<StoredPrediction>, RepositoryError> {
        debug!("Looking up prediction by ID: {}", id);
        self.storage.get_prediction(&id).await
    }

    async fn record_counts(&self) -> Result<(usize, usize), RepositoryError> {
        self.storage.counts()
    }
}

fn new_reading(request: CreateVitalsRecord) -> StoredVitalsReading {
    StoredVitalsReading {
        id: Uuid::new_v4().to_string(),
        heart_rate: request.heart_rate,
        blood_pressure_systolic: request.blood_pressure_systolic,
        blood_pressure_diastolic: request.blood_pressure_diastolic,
        spo2: request.spo2,
        temperature: request.temperature,
        age: request.age,
        gender: request.gender,
        timestamp: request.timestamp,
    }
}

/// Mock vitals repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Mock implementation of VitalsRepositoryTrait for testing
    #[derive(Debug, Default)]
    pub struct MockVitalsRepository {
        readings: Mutex<Vec<StoredVitalsReading>>,
        predictions: Mutex<Vec<StoredPrediction>>,
        should_fail: bool,
    }

    impl MockVitalsRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined readings
        pub fn with_readings(readings: Vec<StoredVitalsReading>) -> Self {
            Self {
                readings: Mutex::new(readings),
                ..Self::default()
            }
        }

        /// Configure the mock so every call fails
        pub fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.should_fail {
                Err(RepositoryError::MutexLock("mock is configured to fail".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl VitalsRepositoryTrait for MockVitalsRepository {
        async fn append_assessment(
            &self,
            request: CreateVitalsRecord,
            mut prediction: StoredPrediction,
        ) -> Result<(StoredVitalsReading, StoredPrediction), RepositoryError> {
            self.check()?;
            let reading = new_reading(request);
            prediction.reading_id = Some(reading.id.clone());
            self.readings.lock()?.push(reading.clone());
            self.predictions.lock()?.push(prediction.clone());
            Ok((reading, prediction))
        }

        async fn recent_readings(&self, limit: usize) -> Result<Vec<StoredVitalsReading>, RepositoryError> {
            self.check()?;
            Ok(self.readings.lock()?.iter().rev().take(limit).cloned().collect())
        }

        async fn recent_predictions(&self, limit: usize) -> Result<Vec<StoredPrediction>, RepositoryError> {
            self.check()?;
            Ok(self.predictions.lock()?.iter().rev().take(limit).cloned().collect())
        }

        async fn get_prediction_by_id(&self, id: Uuid) -> Result<Option<StoredPrediction>, RepositoryError> {
            self.check()?;
            let id = id.to_string();
            Ok(self.predictions.lock()?.iter().find(|p| p.id == id).cloned())
        }

        async fn record_counts(&self) -> Result<(usize, usize), RepositoryError> {
            self.check()?;
            Ok((self.readings.lock()?.len(), self.predictions.lock()?.len()))
        }
    }

    /// Build a stored reading for tests
    pub fn sample_reading(heart_rate: u16, spo2: u8) -> StoredVitalsReading {
        StoredVitalsReading {
            id: Uuid::new_v4().to_string(),
            heart_rate,
            blood_pressure_systolic: 120,
            blood_pressure_diastolic: 80,
            spo2,
            temperature: 36.8,
            age: None,
            gender: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn record(heart_rate: u16) -> CreateVitalsRecord {
        CreateVitalsRecord {
            heart_rate,
            blood_pressure_systolic: 118,
            blood_pressure_diastolic: 76,
            spo2: 98,
            temperature: 36.8,
            age: Some(40),
            gender: Some("female".to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    fn prediction(id: Uuid, risk_level: &str) -> StoredPrediction {
        StoredPrediction {
            id: id.to_string(),
            reading_id: None,
            mode: "ensemble".to_string(),
            risk_score: 12,
            risk_level: risk_level.to_string(),
            confidence: 88,
            model_version: "ensemble-1.0.0".to_string(),
            payload: json!({ "risk_level": risk_level }),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_recent_readings_newest_first() {
        let repo = VitalsRepository::new();
        for heart_rate in [70, 80, 90] {
            repo.append_assessment(record(heart_rate), prediction(Uuid::new_v4(), "LOW"))
                .await
                .unwrap();
        }

        let recent = repo.recent_readings(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].heart_rate, 90);
        assert_eq!(recent[1].heart_rate, 80);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = VitalsRepository::new();
        let clone = repo.clone();
        clone
            .append_assessment(record(72), prediction(Uuid::new_v4(), "LOW"))
            .await
            .unwrap();

        assert_eq!(repo.record_counts().await.unwrap(), (1, 1));
    }

    #[tokio::test]
    async fn test_prediction_is_linked_to_its_reading() {
        let repo = VitalsRepository::new();
        let id = Uuid::new_v4();

        let (reading, stored) = repo.append_assessment(record(72), prediction(id, "LOW")).await.unwrap();
        assert_eq!(stored.reading_id.as_deref(), Some(reading.id.as_str()));

        let found = repo.get_prediction_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.reading_id, Some(reading.id));
    }

    #[tokio::test]
    async fn test_non_finite_temperature_stores_nothing() {
        let repo = VitalsRepository::new();
        let mut bad = record(72);
        bad.temperature = f64::NAN;

        let result = repo.append_assessment(bad, prediction(Uuid::new_v4(), "LOW")).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(repo.record_counts().await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_prediction_lookup_and_duplicate_id() {
        let repo = VitalsRepository::new();
        let id = Uuid::new_v4();
        repo.append_assessment(record(72), prediction(id, "LOW")).await.unwrap();

        let found = repo.get_prediction_by_id(id).await.unwrap();
        assert_eq!(found.map(|p| p.risk_level), Some("LOW".to_string()));

        let missing = repo.get_prediction_by_id(Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());

        // A rejected prediction must not leave its reading behind
        let duplicate = repo.append_assessment(record(140), prediction(id, "HIGH")).await;
        assert!(matches!(duplicate, Err(RepositoryError::Validation(_))));
        assert_eq!(repo.record_counts().await.unwrap(), (1, 1));
        assert_eq!(repo.recent_readings(10).await.unwrap()[0].heart_rate, 72);
    }

    #[tokio::test]
    async fn test_retention_drops_oldest_records() {
        let repo = VitalsRepository::with_storage(InMemoryStorage::with_capacity(2));
        for heart_rate in [70, 80, 90] {
            repo.append_assessment(record(heart_rate), prediction(Uuid::new_v4(), "LOW"))
                .await
                .unwrap();
        }

        assert_eq!(repo.record_counts().await.unwrap(), (2, 2));
        let heart_rates: Vec<u16> = repo
            .recent_readings(10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.heart_rate)
            .collect();
        assert_eq!(heart_rates, vec![90, 80]);

        let predictions = repo.recent_predictions(10).await.unwrap();
        assert_eq!(predictions.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_still_keeps_latest() {
        let repo = VitalsRepository::with_storage(InMemoryStorage::with_capacity(0));
        for heart_rate in [70, 80] {
            repo.append_assessment(record(heart_rate), prediction(Uuid::new_v4(), "LOW"))
                .await
                .unwrap();
        }

        assert_eq!(repo.record_counts().await.unwrap(), (1, 1));
        assert_eq!(repo.recent_readings(10).await.unwrap()[0].heart_rate, 80);
    }

    #[tokio::test]
    async fn test_mock_repository_failure() {
        let repo = tests::MockVitalsRepository::failing();
        assert!(repo.recent_predictions(10).await.is_err());
    }
}
