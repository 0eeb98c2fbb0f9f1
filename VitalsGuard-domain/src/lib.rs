// VitalsGuard Domain
// This crate contains the risk scoring rules and the services built around them

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Runtime configuration
pub mod config;

// Re-export the repository module from vitals_guard_data for convenience
pub use vitals_guard_data::repository;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
