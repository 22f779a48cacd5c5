//! HTTP middleware for request processing.
//!
//! Provides cross-origin access and observability middleware.

pub mod cors;
pub mod tracing;
