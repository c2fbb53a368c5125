//! Registry of remote clients, keyed by controller identity.
//!
//! One orchestration cluster may bridge several independent schedulers, so
//! every control operation resolves its client here through the workload's
//! controller reference. Lookups clone the `Arc` out; the lock is never
//! held across remote I/O. Lifecycle is owned by the external reconciler:
//! add when a controller is observed, remove when it is deleted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use gridlink_remote::RemoteClient;

use crate::names::ObjectKey;

/// Concurrency-safe controller → client mapping.
#[derive(Default)]
pub struct ClientMap {
    clients: RwLock<HashMap<ObjectKey, Arc<dyn RemoteClient>>>,
}

impl ClientMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the client for `key`.
    pub async fn add(&self, key: ObjectKey, client: Arc<dyn RemoteClient>) {
        debug!(controller = %key, "registering remote client");
        self.clients.write().await.insert(key, client);
    }

    /// Clone out the client for `key`, if registered.
    pub async fn get(&self, key: &ObjectKey) -> Option<Arc<dyn RemoteClient>> {
        self.clients.read().await.get(key).cloned()
    }

    /// Drop the client for `key`. Returns whether an entry was removed;
    /// in-flight calls holding a clone are unaffected.
    pub async fn remove(&self, key: &ObjectKey) -> bool {
        debug!(controller = %key, "deregistering remote client");
        self.clients.write().await.remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gridlink_remote::{FakeClientBuilder, NodeState, RemoteNode};

    #[tokio::test]
    async fn missing_key_is_none() {
        let map = ClientMap::new();
        assert!(map.get(&ObjectKey::new("hpc", "cluster-a")).await.is_none());
        assert!(map.is_empty().await);
    }

    #[tokio::test]
    async fn add_then_get_then_remove() {
        let map = ClientMap::new();
        let key = ObjectKey::new("hpc", "cluster-a");
        map.add(key.clone(), FakeClientBuilder::new().build()).await;

        assert_eq!(map.len().await, 1);
        assert!(map.get(&key).await.is_some());
        assert!(map.remove(&key).await);
        assert!(map.get(&key).await.is_none());
        assert!(!map.remove(&key).await);
    }

    #[tokio::test]
    async fn add_replaces_existing_entry() {
        let map = ClientMap::new();
        let key = ObjectKey::new("hpc", "cluster-a");
        map.add(key.clone(), FakeClientBuilder::new().build()).await;
        map.add(
            key.clone(),
            FakeClientBuilder::new()
                .with_node(RemoteNode::new("n0", [NodeState::Idle]))
                .build(),
        )
        .await;

        assert_eq!(map.len().await, 1);
        let client = map.get(&key).await.unwrap();
        assert_eq!(client.list_nodes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clone_survives_removal() {
        let map = ClientMap::new();
        let key = ObjectKey::new("hpc", "cluster-a");
        map.add(
            key.clone(),
            FakeClientBuilder::new()
                .with_node(RemoteNode::new("n0", [NodeState::Idle]))
                .build(),
        )
        .await;

        let client = map.get(&key).await.unwrap();
        map.remove(&key).await;
        assert!(client.get_node("n0").await.is_ok());
    }
}
