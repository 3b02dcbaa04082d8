//! Cache Module
//!
//! Local, byte-bounded LRU caching for a group.

mod byteview;
mod byte_lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use byte_lru::{ByteLru, ByteSize, OnEvicted};
pub use stats::{GroupStats, StatsSnapshot};
pub use store::MainCache;

// == Public Constants ==
/// Default byte budget of a group's local cache
pub const DEFAULT_CACHE_BYTES: usize = 2 << 10; // 2 KB
