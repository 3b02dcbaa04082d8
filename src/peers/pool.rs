//! HTTP Peer Pool
//!
//! Picks peers over a consistent hash ring and serves the peer endpoint.
//!
//! # Endpoint
//! - `GET <base_path><group>/<key>` - value bytes as `application/octet-stream`

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use parking_lot::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::peers::client::{peer_client, PeerClient};
use crate::peers::{HashFn, HashRing, HttpGetter, PeerGetter, PeerPicker, DEFAULT_REPLICAS};
use crate::registry::GroupRegistry;

/// Path prefix of the peer endpoint.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";

// == Peer Set ==
/// Ring and clients, always replaced together.
#[derive(Debug)]
struct PeerSet {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Peer pool of one node.
///
/// `self_addr` is this node's own base URL, e.g. `http://localhost:8001`; keys
/// that hash to it are loaded locally.
#[derive(Debug)]
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    replicas: usize,
    hash: HashFn,
    client: PeerClient,
    peers: Mutex<PeerSet>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool for the node reachable at `self_addr` with no peers.
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self {
            self_addr: self_addr.into(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: crc32c::crc32c,
            client: peer_client(),
            peers: Mutex::new(PeerSet {
                ring: HashRing::new(DEFAULT_REPLICAS),
                getters: HashMap::new(),
            }),
        }
    }

    /// Serves and requests under `base_path` instead of the default.
    ///
    /// A missing leading or trailing `/` is added.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        self.base_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        self
    }

    /// Virtual nodes per peer for subsequent `set` calls.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Ring hash for subsequent `set` calls.
    pub fn with_hash(mut self, hash: HashFn) -> Self {
        self.hash = hash;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // == Set ==
    /// Replaces the whole peer list.
    ///
    /// The ring is rebuilt from scratch and every peer gets a getter on the shared connection pool.
    /// `peers` should include this node's own address.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers.into_iter().map(|p| p.as_ref().to_string()).collect();

        let mut ring = HashRing::with_hash(self.replicas, self.hash);
        ring.add(&peers);
        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(format!("{}{}", peer, self.base_path), self.client.clone());
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.peers.lock() = PeerSet { ring, getters };
        info!(server = %self.self_addr, peers = ?peers, "peer set replaced");
    }

    // == Router ==
    /// Builds the peer endpoint, resolving groups through `registry`.
    pub fn router(&self, registry: Arc<GroupRegistry>) -> Router {
        let state = PeerServerState {
            registry,
            self_addr: Arc::from(self.self_addr.as_str()),
        };

        Router::new()
            .route(&format!("{}*path", self.base_path), get(serve_peer_handler))
            .route(&self.base_path, get(missing_path_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let peers = self.peers.lock();
        let peer = peers.ring.get(key)?;
        if peer == self.self_addr {
            return None;
        }
        debug!(server = %self.self_addr, peer, key, "pick peer");
        let getter: Arc<dyn PeerGetter> = peers.getters.get(peer)?.clone();
        Some(getter)
    }
}

// == Server ==
#[derive(Clone)]
struct PeerServerState {
    registry: Arc<GroupRegistry>,
    self_addr: Arc<str>,
}

/// Handler for GET <base_path>*path
///
/// `path` arrives percent-decoded and is split on its first `/`, so a key
/// may itself contain `/`.
async fn serve_peer_handler(
    State(state): State<PeerServerState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse> {
    debug!(server = %state.self_addr, path = %path, "peer request");

    let (group_name, key) = path
        .split_once('/')
        .ok_or_else(|| CacheError::BadRequest(format!("expected <group>/<key>, got {}", path)))?;

    let group = state
        .registry
        .get_group(group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.to_string()))?;

    let view = group.get(key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.to_bytes(),
    ))
}

/// Handler for GET <base_path> with nothing after it
async fn missing_path_handler() -> CacheError {
    CacheError::BadRequest("expected <group>/<key>".to_string())
}
