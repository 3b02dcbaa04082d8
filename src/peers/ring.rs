//! Consistent Hash Ring Module
//!
//! Maps keys onto a set of peers through virtual nodes.

use std::collections::HashMap;

/// Hash function used to place virtual nodes and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Default virtual nodes per peer.
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
/// Consistent hash ring.
///
/// Each peer occupies `replicas` positions, at `hash("{i}{peer}")` for
/// `i in 0..replicas`. A key belongs to the first position at or after its
/// own hash, wrapping around past the largest one. Peers can only be added;
/// membership changes rebuild the ring.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node positions
    ring: Vec<u32>,
    /// Position -> owning peer
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring hashed with CRC-32C.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash(replicas, crc32c::crc32c)
    }

    /// Creates an empty ring with a custom hash, mostly for tests.
    pub fn with_hash(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            ring: Vec::new(),
            owners: HashMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual nodes for every peer and re-sorts the ring.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.ring.push(position);
                self.owners.insert(position, peer.to_string());
            }
        }
        self.ring.sort_unstable();
    }

    // == Get ==
    /// Returns the peer owning `key`, or None on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.ring.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.ring.partition_point(|&position| position < hash);
        let position = self.ring[idx % self.ring.len()];
        self.owners.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.ring.len()
    }
}
