#![deny(missing_docs)]

//! Core library for the medicine catalog HTTP service.

/// HTTP routing and handlers.
pub mod api;
/// Catalog source access, parsing, and the load-once cache.
pub mod catalog;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Search and lookup queries over the cached catalog.
pub mod service;
