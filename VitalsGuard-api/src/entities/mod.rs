// Public entities for the VitalsGuard API
// Data structures exchanged with clients, kept separate from the domain types

// Assessment request and conversion into the domain input
pub mod assessment;

// Common entities for error handling and queries
pub mod common;
