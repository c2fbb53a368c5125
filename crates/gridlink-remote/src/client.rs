//! The client seam against the remote batch scheduler.

use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::types::{RemoteJob, RemoteNode, UpdateNode};

/// Typed get/list/update operations against the scheduler's node and job
/// collections.
///
/// Implementations must be cheap to share (`Arc<dyn RemoteClient>`) and
/// must not retry internally; retry/backoff belongs to the caller's
/// reconcile loop.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Fetch a single node by name.
    async fn get_node(&self, name: &str) -> RemoteResult<RemoteNode>;

    /// List every node visible to this client.
    async fn list_nodes(&self) -> RemoteResult<Vec<RemoteNode>>;

    /// List every job visible to this client.
    async fn list_jobs(&self) -> RemoteResult<Vec<RemoteJob>>;

    /// Apply a partial update to the named node.
    async fn update_node(&self, name: &str, update: &UpdateNode) -> RemoteResult<()>;
}
