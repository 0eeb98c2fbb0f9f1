use serde::{Deserialize, Serialize};

/// Storage model for a persisted risk prediction.
///
/// The searchable headline fields are kept as columns; the full prediction
/// record, including explainability, travels in `payload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredPrediction {
    /// Unique identifier of the prediction
    pub id: String,

    /// Reading the prediction was computed from, if it was stored
    pub reading_id: Option<String>,

    /// Strategy that produced the prediction ("simple" or "ensemble")
    pub mode: String,

    /// Overall risk score, 0-100
    pub risk_score: u8,

    /// Overall risk level as an uppercase string
    pub risk_level: String,

    /// Overall confidence, 0-100
    pub confidence: u8,

    /// Version tag of the scoring rules
    pub model_version: String,

    /// Full serialized prediction
    pub payload: serde_json::Value,

    /// When the prediction was generated (RFC 3339)
    pub timestamp: String,
}
