//! Group Module
//!
//! A named cache namespace: local cache first, then the owning peer, then
//! the user's loader.

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::{ByteView, GroupStats, MainCache, StatsSnapshot};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::Flight;

// == Getter ==
/// Loads the value of a key from the source of truth on a cache miss.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts a plain function or closure into a [`Getter`].
pub struct GetterFn<F>(F);

impl<F> GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

// == Group ==
/// Cache namespace tied to one loader.
///
/// Created through [`crate::GroupRegistry::new_group`].
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: MainCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: Flight<ByteView>,
    stats: Arc<GroupStats>,
}

impl Group {
    pub(crate) fn new(name: impl Into<String>, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        let stats = Arc::new(GroupStats::new());
        Self {
            name: name.into(),
            getter,
            main_cache: MainCache::with_stats(cache_bytes, stats.clone()),
            peers: OnceLock::new(),
            loader: Flight::new(),
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer picker used to route misses to their owner.
    ///
    /// A group accepts a picker only once.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    // == Get ==
    /// Returns the value for `key`.
    ///
    /// Misses are coalesced per key: concurrent callers share one load.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        self.stats.record_get();

        if let Some(value) = self.main_cache.get(key) {
            self.stats.record_hit();
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.loader
            .work(key, || async {
                if let Some(peer) = self.peers.get().and_then(|p| p.pick_peer(key)) {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => return Ok(value),
                        Err(err) => {
                            self.stats.record_peer_error();
                            warn!(group = %self.name, key, error = %err, "failed to get from peer");
                        }
                    }
                }
                self.get_locally(key).await
            })
            .await
    }

    /// Remote values are returned as-is and not stored in the local cache.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        self.stats.record_peer_load();
        Ok(ByteView::from(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.stats.record_local_load_err();
                return Err(CacheError::Load(err.to_string()));
            }
        };
        self.stats.record_local_load();

        let value = ByteView::copy_from_slice(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    /// Current counters of this group.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of entries in the local cache.
    pub fn cached_len(&self) -> usize {
        self.main_cache.len()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
