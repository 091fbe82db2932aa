#![deny(missing_docs)]

//! Core library for the student registry HTTP API.

/// HTTP routing and REST handlers.
pub mod api;
/// Typed HTTP client for the REST surface.
pub mod client;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters exposed over HTTP.
pub mod metrics;
/// MongoDB document store integration.
pub mod mongo;
/// Student domain types, storage seam, and service.
pub mod students;
