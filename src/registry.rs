//! Group Registry Module
//!
//! Name -> group lookup shared by a process.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::group::{Getter, Group};

// == Group Registry ==
/// Registry of named groups.
///
/// Create one per process (or per test) and share it behind an `Arc` with
/// everything that registers or resolves groups, such as the peer server.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group and registers it under `name`.
    ///
    /// A group previously registered under the same name is replaced.
    ///
    /// # Arguments
    /// * `name` - Unique group name, also used on the peer wire protocol
    /// * `cache_bytes` - Byte budget of the local cache, 0 = unlimited
    /// * `getter` - Loader called on cache misses owned by this node
    pub fn new_group<G>(&self, name: &str, cache_bytes: usize, getter: G) -> Arc<Group>
    where
        G: Getter + 'static,
    {
        let group = Arc::new(Group::new(name, cache_bytes, Arc::new(getter)));
        let previous = self
            .groups
            .write()
            .insert(name.to_string(), group.clone());
        if previous.is_some() {
            info!(group = name, "group replaced");
        } else {
            info!(group = name, cache_bytes, "group created");
        }
        group
    }

    // == Get Group ==
    /// Returns the group registered under `name`.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Names of all registered groups.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GetterFn;

    fn echo() -> GetterFn<impl Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync> {
        GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec()))
    }

    #[test]
    fn test_get_group() {
        let registry = GroupRegistry::new();
        registry.new_group("scores", 2 << 10, echo());

        let group = registry.get_group("scores").unwrap();
        assert_eq!(group.name(), "scores");
        assert!(registry.get_group("scores111").is_none());
    }

    #[test]
    fn test_missing_group() {
        let registry = GroupRegistry::new();
        assert!(registry.get_group("missing").is_none());
    }

    #[tokio::test]
    async fn test_same_name_returns_latest() {
        let registry = GroupRegistry::new();
        registry.new_group("scores", 2 << 10, GetterFn::new(|_: &str| Ok(b"first".to_vec())));
        let latest =
            registry.new_group("scores", 2 << 10, GetterFn::new(|_: &str| Ok(b"second".to_vec())));

        let group = registry.get_group("scores").unwrap();
        assert!(Arc::ptr_eq(&group, &latest));
        assert_eq!(group.get("Tom").await.unwrap().to_string(), "second");
        assert_eq!(registry.names(), vec!["scores"]);
    }

    #[test]
    fn test_registries_are_independent() {
        let a = GroupRegistry::new();
        let b = GroupRegistry::new();
        a.new_group("scores", 0, echo());

        assert!(a.get_group("scores").is_some());
        assert!(b.get_group("scores").is_none());
    }
}
