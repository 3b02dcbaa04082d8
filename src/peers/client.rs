//! HTTP Peer Client
//!
//! Fetches values from a remote node's peer endpoint.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{CacheError, Result};
use crate::peers::PeerGetter;

/// Bytes escaped in a path segment. `.` is included so that `.` and `..`
/// reach the peer as segments instead of being resolved away.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Connection-pooling HTTP/1 client shared by all getters of a pool.
pub type PeerClient = Client<HttpConnector, Empty<Bytes>>;

/// Builds a [`PeerClient`] on the tokio runtime.
pub fn peer_client() -> PeerClient {
    Client::builder(TokioExecutor::new())
        .pool_timer(TokioTimer::new())
        .build_http()
}

// == HTTP Getter ==
/// Client for a single peer.
///
/// Requests go to `<base_url><group>/<key>` with both segments
/// percent-encoded, e.g. `http://10.0.0.2:8008/_geecache/scores/Tom`.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer address joined with the base path, ending in `/`
    base_url: String,
    client: PeerClient,
}

impl HttpGetter {
    /// Creates a getter for `base_url`, sharing `client`'s connection pool.
    pub fn new(base_url: impl Into<String>, client: PeerClient) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Builds the request URI for `group` and `key`.
    pub fn url_for(&self, group: &str, key: &str) -> Result<Uri> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            utf8_percent_encode(group, SEGMENT),
            utf8_percent_encode(key, SEGMENT)
        );
        url.parse()
            .map_err(|e| CacheError::Peer(format!("invalid peer url {}: {}", url, e)))
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes> {
        let uri = self.url_for(group, key)?;

        let res = self
            .client
            .get(uri)
            .await
            .map_err(|e| CacheError::Peer(e.to_string()))?;

        if res.status() != StatusCode::OK {
            return Err(CacheError::Peer(format!("server returned: {}", res.status())));
        }

        let body = res
            .into_body()
            .collect()
            .await
            .map_err(|e| CacheError::Peer(format!("reading response body: {}", e)))?;
        Ok(body.to_bytes())
    }
}
