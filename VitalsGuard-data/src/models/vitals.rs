use serde::{Deserialize, Serialize};

/// Storage model for a vital-sign reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredVitalsReading {
    /// Unique identifier for the reading
    pub id: String,

    /// Heart rate in beats per minute
    pub heart_rate: u16,

    /// Systolic blood pressure in mmHg
    pub blood_pressure_systolic: u16,

    /// Diastolic blood pressure in mmHg
    pub blood_pressure_diastolic: u16,

    /// Oxygen saturation percentage
    pub spo2: u8,

    /// Body temperature in degrees Celsius
    pub temperature: f64,

    /// Optional age of the user at the time of the reading
    pub age: Option<u8>,

    /// Optional gender as a lowercase string
    pub gender: Option<String>,

    /// When the reading was taken (RFC 3339)
    pub timestamp: String,
}

/// Input data for appending a new reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVitalsRecord {
    pub heart_rate: u16,
    pub blood_pressure_systolic: u16,
    pub blood_pressure_diastolic: u16,
    pub spo2: u8,
    pub temperature: f64,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub timestamp: String,
}
