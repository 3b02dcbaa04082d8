//! Error types for the cache group
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP boundary.
///
/// Variants carry plain strings so a single result can be handed to every
/// caller that joined the same in-flight load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Caller asked for the empty key
    #[error("key is required")]
    EmptyKey,

    /// The user loader failed; the message is passed through untouched
    #[error("{0}")]
    Load(String),

    /// Talking to a remote peer failed
    #[error("peer request failed: {0}")]
    Peer(String),

    /// No group registered under this name
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Malformed request at the HTTP boundary
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A peer picker was already attached to the group
    #[error("peers already registered for group {0}")]
    PeersAlreadyRegistered(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::EmptyKey
            | CacheError::Load(_)
            | CacheError::Peer(_)
            | CacheError::PeersAlreadyRegistered(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache group.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_message_is_verbatim() {
        let err = CacheError::Load("kkk not exist".to_string());
        assert_eq!(err.to_string(), "kkk not exist");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::GroupNotFound("g".into()), StatusCode::NOT_FOUND),
            (CacheError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::EmptyKey, StatusCode::INTERNAL_SERVER_ERROR),
            (CacheError::Load("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (CacheError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
