//! Peercache - A distributed read-through byte cache
//!
//! Groups serve key lookups from a local LRU cache, then from the peer that
//! owns the key on a consistent hash ring, and finally from a user loader.
//! Concurrent misses for the same key share one load.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod registry;
pub mod singleflight;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
pub use registry::GroupRegistry;
