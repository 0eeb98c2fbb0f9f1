use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::prediction::RiskLevel;

/// Summary statistics over a window of recent readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsTrends {
    /// Number of readings analyzed
    pub reading_count: usize,

    /// Average heart rate over the window
    pub avg_heart_rate: f64,

    /// Lowest heart rate in the window
    pub min_heart_rate: u16,

    /// Highest heart rate in the window
    pub max_heart_rate: u16,

    /// Average systolic pressure over the window
    pub avg_systolic: f64,

    /// Average diastolic pressure over the window
    pub avg_diastolic: f64,

    /// Average oxygen saturation over the window
    pub avg_spo2: f64,

    /// Lowest oxygen saturation in the window
    pub min_spo2: u8,

    /// Average temperature in degrees Celsius
    pub avg_temperature: f64,

    /// Risk level of the most recent prediction, if one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_risk_level: Option<RiskLevel>,

    /// Timestamp of the analysis
    pub generated_at: DateTime<Utc>,
}
