use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// A single set of vital signs. Temperature is always in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsReading {
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

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

/// Self-reported gender
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "unknown" | "" => Ok(Gender::Unknown),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Optional user context used to scale some sub-scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UserProfile {
    /// Age in years, if known
    pub age: Option<u8>,

    /// Gender, defaults to unknown
    #[serde(default)]
    pub gender: Gender,
}

impl UserProfile {
    /// Age threshold above which the senior multiplier applies
    pub const SENIOR_AGE: u8 = 65;

    /// Whether the age-based risk multiplier applies
    pub fn is_senior(&self) -> bool {
        self.age.map_or(false, |age| age > Self::SENIOR_AGE)
    }
}

/// Request payload for a risk assessment, temperature in Celsius
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsInput {
    /// Heart rate in beats per minute
    #[validate(range(min = 30, max = 250, message = "Heart rate must be between 30 and 250 bpm"))]
    pub heart_rate: u16,

    /// Systolic blood pressure in mmHg
    #[validate(range(min = 70, max = 250, message = "Systolic pressure must be between 70 and 250 mmHg"))]
    pub blood_pressure_systolic: u16,

    /// Diastolic blood pressure in mmHg
    #[validate(range(min = 40, max = 150, message = "Diastolic pressure must be between 40 and 150 mmHg"))]
    pub blood_pressure_diastolic: u16,

    /// Oxygen saturation percentage
    #[validate(range(min = 70, max = 100, message = "SpO2 must be between 70 and 100%"))]
    pub spo2: u8,

    /// Body temperature in degrees Celsius
    #[validate(range(min = 30.0, max = 45.0, message = "Temperature must be between 30 and 45 °C"))]
    pub temperature: f64,

    /// Optional age in years
    #[validate(range(min = 0, max = 130, message = "Age must be between 0 and 130"))]
    pub age: Option<u8>,

    /// Optional gender
    pub gender: Option<Gender>,

    /// When the reading was taken. Defaults to current time if not provided.
    pub timestamp: Option<DateTime<Utc>>,
}

impl VitalsInput {
    /// Build an input from a reading and optional profile
    pub fn from_reading(reading: &VitalsReading, profile: Option<&UserProfile>) -> Self {
        Self {
            heart_rate: reading.heart_rate,
            blood_pressure_systolic: reading.blood_pressure_systolic,
            blood_pressure_diastolic: reading.blood_pressure_diastolic,
            spo2: reading.spo2,
            temperature: reading.temperature,
            age: profile.and_then(|p| p.age),
            gender: profile.map(|p| p.gender),
            timestamp: Some(reading.timestamp),
        }
    }

    /// The reading part of the input
    pub fn reading(&self) -> VitalsReading {
        VitalsReading {
            heart_rate: self.heart_rate,
            blood_pressure_systolic: self.blood_pressure_systolic,
            blood_pressure_diastolic: self.blood_pressure_diastolic,
            spo2: self.spo2,
            temperature: self.temperature,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }

    /// The profile part of the input, present when age or gender was supplied
    pub fn profile(&self) -> Option<UserProfile> {
        if self.age.is_none() && self.gender.is_none() {
            return None;
        }
        Some(UserProfile {
            age: self.age,
            gender: self.gender.unwrap_or_default(),
        })
    }
}

/// A stored reading together with its identifier and profile context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RecordedVitals {
    /// Storage identifier
    pub id: String,

    /// The reading itself
    pub reading: VitalsReading,

    /// Profile supplied with the reading, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}
