pub mod prediction;
pub mod vitals;
