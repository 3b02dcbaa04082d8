//! API Module
//!
//! User-facing HTTP front end over one group.
//!
//! # Endpoints
//! - `GET /api?key=K` - Look up a key through the group
//! - `GET /stats` - Group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
