//! Request DTOs for the front-end API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string of the lookup endpoint (GET /api?key=...)
///
/// A missing `key` deserializes to the empty string and is rejected by the
/// group like any other empty key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// The key to look up
    #[serde(default)]
    pub key: String,
}
