pub mod assessments;
pub mod health;
pub mod vitals;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use assessments::{create_assessment, get_assessment, list_assessments};
pub use health::health_check;
pub use vitals::{get_vitals_trends, list_vitals};
