//! Sources for the cosmetic confidence offset added by each sub-scorer.
//!
//! Sub-scorer confidence is `base + jitter` where the jitter lies in `[0, span)`.
//! It carries no statistical meaning; it only varies the displayed value. The
//! source is injected so that tests and reproducible deployments can pin it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::entities::prediction::ModelKind;
use crate::entities::vitals::VitalsReading;

/// Provider of the confidence offset for a given sub-model and reading
pub trait ConfidenceJitter: Send + Sync + std::fmt::Debug {
    /// Return a value in `[0, span)`. A non-positive span yields 0.
    fn jitter(&self, model: ModelKind, reading: &VitalsReading, span: f64) -> f64;
}

/// Always zero: confidence equals the scorer's base value
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl ConfidenceJitter for NoJitter {
    fn jitter(&self, _model: ModelKind, _reading: &VitalsReading, _span: f64) -> f64 {
        0.0
    }
}

/// A fixed fraction of the span for every model
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter {
    fraction: f64,
}

impl FixedJitter {
    /// `fraction` is clamped into `[0, 1)`
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 0.999_999) } else { 0.0 };
        Self { fraction }
    }

    /// Half of every span
    pub fn midpoint() -> Self {
        Self::new(0.5)
    }
}

impl ConfidenceJitter for FixedJitter {
    fn jitter(&self, _model: ModelKind, _reading: &VitalsReading, span: f64) -> f64 {
        if span <= 0.0 {
            return 0.0;
        }
        span * self.fraction
    }
}

/// Deterministic pseudo-random jitter.
///
/// Each call seeds a fresh generator from `seed`, the model and the measured
/// vitals, so the same reading always gets the same confidence while different
/// readings spread across the span. The timestamp is not part of the key and no
/// state is shared between requests.
#[derive(Debug, Clone, Copy)]
pub struct SeededJitter {
    seed: u64,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn model_salt(model: ModelKind) -> u64 {
        match model {
            ModelKind::Cardiovascular => 0x9E37_79B9_7F4A_7C15,
            ModelKind::Respiratory => 0xC2B2_AE3D_27D4_EB4F,
            ModelKind::Metabolic => 0x1656_67B1_9E37_79F9,
            ModelKind::General => 0x85EB_CA77_C2B2_AE63,
        }
    }

    // FNV-1a over the measured values
    fn reading_key(reading: &VitalsReading) -> u64 {
        let fields = [
            u64::from(reading.heart_rate),
            u64::from(reading.blood_pressure_systolic),
            u64::from(reading.blood_pressure_diastolic),
            u64::from(reading.spo2),
            reading.temperature.to_bits(),
        ];
        fields.iter().fold(0xCBF2_9CE4_8422_2325, |hash, field| {
            field
                .to_le_bytes()
                .iter()
                .fold(hash, |h, byte| (h ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01B3))
        })
    }
}

impl ConfidenceJitter for SeededJitter {
    fn jitter(&self, model: ModelKind, reading: &VitalsReading, span: f64) -> f64 {
        if span <= 0.0 {
            return 0.0;
        }
        let key = self.seed ^ Self::model_salt(model) ^ Self::reading_key(reading);
        let mut rng = StdRng::seed_from_u64(key);
        rng.gen_range(0.0..span)
    }
}

/// Uniform jitter from the thread-local generator, different on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl ConfidenceJitter for RandomJitter {
    fn jitter(&self, _model: ModelKind, _reading: &VitalsReading, span: f64) -> f64 {
        if span <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(0.0..span)
    }
}

/// Configured choice of jitter source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum JitterStrategy {
    None,
    Seeded { seed: u64 },
    Random,
}

impl Default for JitterStrategy {
    fn default() -> Self {
        JitterStrategy::Seeded { seed: DEFAULT_SEED }
    }
}

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

impl JitterStrategy {
    /// Build the jitter source for this strategy
    pub fn build(&self) -> Box<dyn ConfidenceJitter> {
        match *self {
            JitterStrategy::None => Box::new(NoJitter),
            JitterStrategy::Seeded { seed } => Box::new(SeededJitter::new(seed)),
            JitterStrategy::Random => Box::new(RandomJitter),
        }
    }
}
