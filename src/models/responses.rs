//! Response DTOs for the front-end API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Group the counters belong to
    pub group: String,
    /// Raw counters
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    /// Hit rate (cache_hits / gets)
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a group's counters
    pub fn new(group: impl Into<String>, stats: StatsSnapshot) -> Self {
        Self {
            group: group.into(),
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
