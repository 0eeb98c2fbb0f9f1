// VitalsGuard API
// HTTP surface over the domain risk scoring services

pub mod api;
pub mod entities;
pub mod openapi;
