pub mod conversions;
pub mod prediction;
pub mod trends;
pub mod vitals;
