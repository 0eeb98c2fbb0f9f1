pub mod confidence;
pub mod ensemble;
pub mod explainability;
pub mod jitter;
pub mod prediction;
pub mod scorers;
pub mod simple;
pub mod trends;

// Domain services
// Scoring rules, the ensemble built on them and the service that stores results.

// Re-export service traits and factory functions
pub use prediction::{
    create_default_prediction_service, PredictionService, PredictionServiceError, PredictionServiceTrait,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use prediction::create_mock_prediction_service;
