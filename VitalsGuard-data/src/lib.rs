// VitalsGuard Data
// This crate owns the storage interface for readings and predictions.
// The scoring core never touches it; callers inject a repository into the service layer.

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
