//! Peers Module
//!
//! Locating the peer that owns a key and fetching values from it.
//!
//! # Components
//! - [`HashRing`] - consistent hash ring over peer addresses
//! - [`HttpPool`] - HTTP peer picker and the server side of the protocol
//! - [`HttpGetter`] - HTTP client for one remote peer

mod client;
mod pool;
mod ring;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub use client::{peer_client, HttpGetter, PeerClient};
pub use pool::{HttpPool, DEFAULT_BASE_PATH};
pub use ring::{HashFn, HashRing, DEFAULT_REPLICAS};

// == Peer Picker ==
/// Chooses the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the remote owner of `key`.
    ///
    /// None means the key is owned by the local node or no peers are known.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches values from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    /// Fetches `key` from `group` on the peer.
    async fn get(&self, group: &str, key: &str) -> Result<Bytes>;
}
