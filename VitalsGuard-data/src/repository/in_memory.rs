use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::models::prediction::StoredPrediction;
use crate::models::vitals::StoredVitalsReading;
use super::errors::RepositoryError;

/// Records kept per log before the oldest are evicted
pub const DEFAULT_RETAINED_RECORDS: usize = 5_000;

/// In-memory append log for readings and predictions.
///
/// Each log holds at most `capacity` records; appending past that drops the oldest.
/// Clones share the same underlying storage.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Readings in insertion order
    readings: Arc<Mutex<VecDeque<StoredVitalsReading>>>,
    /// Predictions in insertion order
    predictions: Arc<Mutex<VecDeque<StoredPrediction>>>,
    capacity: usize,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RETAINED_RECORDS)
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage with the default retention
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that keeps at most `capacity` records per log (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            readings: Arc::new(Mutex::new(VecDeque::new())),
            predictions: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    /// Append a reading and the prediction computed from it as one unit.
    ///
    /// Both logs are locked for the whole operation, so either both records are
    /// stored or neither is.
    pub async fn store_assessment(
        &self,
        reading: &StoredVitalsReading,
        prediction: &StoredPrediction,
    ) -> Result<(StoredVitalsReading, StoredPrediction), RepositoryError> {
        // Lock order matches counts()
        let mut readings = self.readings.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        let mut predictions = self.predictions.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;

        if predictions.iter().any(|p| p.id == prediction.id) {
            return Err(RepositoryError::Validation(format!(
                "Prediction {} has already been stored",
                prediction.id
            )));
        }

        push_bounded(&mut readings, reading.clone(), self.capacity);
        push_bounded(&mut predictions, prediction.clone(), self.capacity);
        Ok((reading.clone(), prediction.clone()))
    }

    /// Most recent readings, newest first
    pub async fn recent_readings(&self, limit: usize) -> Result<Vec<StoredVitalsReading>, RepositoryError> {
        let store = self.readings.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        Ok(store.iter().rev().take(limit).cloned().collect())
    }

    /// Most recent predictions, newest first
    pub async fn recent_predictions(&self, limit: usize) -> Result<Vec<StoredPrediction>, RepositoryError> {
        let store = self.predictions.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        Ok(store.iter().rev().take(limit).cloned().collect())
    }

    /// Look up a prediction by ID
    pub async fn get_prediction(&self, id: &Uuid) -> Result<Option<StoredPrediction>, RepositoryError> {
        let store = self.predictions.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        let id = id.to_string();
        Ok(store.iter().find(|p| p.id == id).cloned())
    }

    /// Number of stored readings and predictions
    pub fn counts(&self) -> Result<(usize, usize), RepositoryError> {
        let readings = self.readings.lock()?.len();
        let predictions = self.predictions.lock()?.len();
        Ok((readings, predictions))
    }
}

fn push_bounded<T>(log: &mut VecDeque<T>, item: T, capacity: usize) {
    while log.len() >= capacity {
        log.pop_front();
    }
    log.push_back(item);
}
