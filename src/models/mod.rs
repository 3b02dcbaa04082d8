//! Request and Response models for the front-end API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! query strings and JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ApiQuery;
pub use responses::{HealthResponse, StatsResponse};
