//! Node-lifecycle operations against the remote scheduler.
//!
//! Every operation resolves its client through the registry using the
//! workload's controller reference, performs one logical unit of remote
//! work, and returns plain values. Absence (node or collection not yet
//! known to the scheduler) reads as "not drained / empty status / no
//! deadline", never as failure; all other remote errors propagate
//! untouched. No retries, no internal locking around node mutation: the
//! remote scheduler's last-write-wins semantics govern convergence.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use gridlink_remote::{NodeState, RemoteClient, RemoteNode, UpdateNode};

use crate::clientmap::ClientMap;
use crate::deadlines::{DeadlineMap, job_deadline};
use crate::error::{ControlError, ControlResult};
use crate::names::{Member, WorkloadGroup};
use crate::podinfo::PodInfo;
use crate::status::NodeStatus;

/// Marker prefixed onto every reason string this system writes, so
/// [`NodeControl::is_node_reason_ours`] can tell operator-originated
/// drains from administrator-originated ones without a separate store.
pub const REASON_PREFIX: &str = "gridlink:";

/// The scheduler's standard reason text for a node it lost contact with,
/// matched case-sensitively.
pub const NOT_RESPONDING_REASON: &str = "Not responding";

/// Node-lifecycle operations, client-multiplexed through a [`ClientMap`].
pub struct NodeControl {
    clients: Arc<ClientMap>,
}

impl NodeControl {
    pub fn new(clients: Arc<ClientMap>) -> Self {
        Self { clients }
    }

    /// The registry this control layer resolves clients through.
    pub fn clients(&self) -> &ClientMap {
        &self.clients
    }

    /// Embed the member's pod identity in its node's comment and clear any
    /// DRAIN left over from a previous pod incarnation, in one update.
    pub async fn update_node_with_pod_info(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
    ) -> ControlResult<()> {
        let client = self.client_for(workload).await?;
        let info = PodInfo::new(&workload.key.namespace, &member.pod_name, &member.host);
        let update = UpdateNode {
            state: vec![NodeState::Undrain],
            comment: Some(info.encode()),
            ..Default::default()
        };
        debug!(node = member.node_name(), %info, "writing pod info");
        apply_update(&client, member.node_name(), &update).await
    }

    /// Set DRAIN with a tagged reason. No-op when the node is already
    /// draining, so an existing reason is never clobbered.
    pub async fn make_node_drain(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
        reason: &str,
    ) -> ControlResult<()> {
        let client = self.client_for(workload).await?;
        let node = match fetch_node(&client, member.node_name()).await? {
            Some(node) => node,
            None => return Ok(()),
        };
        if node.has_state(NodeState::Drain) {
            debug!(node = member.node_name(), "already draining");
            return Ok(());
        }
        let update = UpdateNode {
            state: vec![NodeState::Drain],
            reason: Some(tag_reason(reason)),
            ..Default::default()
        };
        debug!(node = member.node_name(), reason, "draining node");
        apply_update(&client, member.node_name(), &update).await
    }

    /// Issue the UNDRAIN directive with a tagged reason. Harmless when the
    /// node is not draining.
    pub async fn make_node_undrain(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
        reason: &str,
    ) -> ControlResult<()> {
        let client = self.client_for(workload).await?;
        let update = UpdateNode {
            state: vec![NodeState::Undrain],
            reason: Some(tag_reason(reason)),
            ..Default::default()
        };
        debug!(node = member.node_name(), reason, "undraining node");
        apply_update(&client, member.node_name(), &update).await
    }

    /// Write the node's topology verbatim, empty string included.
    pub async fn update_node_topology(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
        topology: &str,
    ) -> ControlResult<()> {
        let client = self.client_for(workload).await?;
        let update = UpdateNode {
            topology: Some(topology.to_string()),
            ..Default::default()
        };
        debug!(node = member.node_name(), topology, "updating topology");
        apply_update(&client, member.node_name(), &update).await
    }

    /// Whether the node carries the DRAIN token at all.
    pub async fn is_node_drain(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
    ) -> ControlResult<bool> {
        let client = self.client_for(workload).await?;
        let node = fetch_node(&client, member.node_name()).await?;
        Ok(node.is_some_and(|n| n.has_state(NodeState::Drain)))
    }

    /// Whether the node has fully drained and is safe to disrupt.
    pub async fn is_node_drained(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
    ) -> ControlResult<bool> {
        let client = self.client_for(workload).await?;
        let node = fetch_node(&client, member.node_name()).await?;
        Ok(node.is_some_and(|n| node_is_drained(&n)))
    }

    /// Whether the node went DOWN because the scheduler lost contact with
    /// it, as opposed to an administrator taking it down.
    pub async fn is_node_down_for_unresponsive(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
    ) -> ControlResult<bool> {
        let client = self.client_for(workload).await?;
        let node = fetch_node(&client, member.node_name()).await?;
        Ok(node.is_some_and(|n| node_is_down_for_unresponsive(&n)))
    }

    /// Whether the node's reason is empty or was written by this system.
    /// Callers use this to avoid clobbering administrator intent.
    pub async fn is_node_reason_ours(
        &self,
        workload: &WorkloadGroup,
        member: &Member,
    ) -> ControlResult<bool> {
        let client = self.client_for(workload).await?;
        let node = fetch_node(&client, member.node_name()).await?;
        Ok(node.is_some_and(|n| reason_is_ours(&n.reason)))
    }

    /// Fold the remote state of this workload's nodes into a status
    /// report. Remote nodes belonging to other workloads are ignored even
    /// when visible through the same client.
    pub async fn calculate_node_status(
        &self,
        workload: &WorkloadGroup,
        members: &[Member],
    ) -> ControlResult<NodeStatus> {
        let client = self.client_for(workload).await?;
        let nodes = match client.list_nodes().await {
            Ok(nodes) => nodes,
            Err(err) if err.is_absence() => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let member_names: HashSet<&str> = members.iter().map(Member::node_name).collect();
        let mut status = NodeStatus::default();
        for node in &nodes {
            if member_names.contains(node.name.as_str()) {
                status.observe(node);
            }
        }
        Ok(status)
    }

    /// Compute each member node's earliest safe-disruption deadline from
    /// the jobs currently running on it.
    pub async fn get_node_deadlines(
        &self,
        workload: &WorkloadGroup,
        members: &[Member],
    ) -> ControlResult<DeadlineMap> {
        let client = self.client_for(workload).await?;
        // Both reads are independent; issue them concurrently.
        let (nodes, jobs) = tokio::try_join!(
            list_or_empty(client.list_nodes()),
            list_or_empty(client.list_jobs()),
        )?;

        let member_names: HashSet<&str> = members.iter().map(Member::node_name).collect();
        let listed: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();

        let mut map = DeadlineMap::new();
        for job in &jobs {
            let Some(deadline) = job_deadline(job) else {
                continue;
            };
            for name in gridlink_hostlist::expand(&job.nodes)? {
                if member_names.contains(name.as_str()) && listed.contains(name.as_str()) {
                    map.extend_to(&name, deadline);
                }
            }
        }
        Ok(map)
    }

    async fn client_for(&self, workload: &WorkloadGroup) -> ControlResult<Arc<dyn RemoteClient>> {
        self.clients
            .get(&workload.controller)
            .await
            .ok_or_else(|| ControlError::ClientNotRegistered(workload.controller.clone()))
    }
}

/// Tag a reason string as written by this system.
fn tag_reason(reason: &str) -> String {
    format!("{REASON_PREFIX} {reason}")
}

fn reason_is_ours(reason: &str) -> bool {
    reason.is_empty() || reason.starts_with(REASON_PREFIX)
}

/// DRAIN present and settled: no UNDRAIN in flight, nothing completing,
/// and the base state has come to rest at IDLE or DOWN.
fn node_is_drained(node: &RemoteNode) -> bool {
    node.has_state(NodeState::Drain)
        && !node.has_state(NodeState::Undrain)
        && !node.has_state(NodeState::Completing)
        && (node.has_state(NodeState::Idle) || node.has_state(NodeState::Down))
}

/// A node the scheduler lost contact with carries the bare DOWN base and
/// the standard unresponsive reason text. Any extra token means an
/// administrator or a job got there first.
fn node_is_down_for_unresponsive(node: &RemoteNode) -> bool {
    if node.state.len() != 1 || !node.has_state(NodeState::Down) {
        return false;
    }
    node.has_state(NodeState::NotResponding) || node.reason.contains(NOT_RESPONDING_REASON)
}

async fn fetch_node(
    client: &Arc<dyn RemoteClient>,
    name: &str,
) -> ControlResult<Option<RemoteNode>> {
    match client.get_node(name).await {
        Ok(node) => Ok(Some(node)),
        Err(err) if err.is_absence() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

async fn apply_update(
    client: &Arc<dyn RemoteClient>,
    name: &str,
    update: &UpdateNode,
) -> ControlResult<()> {
    match client.update_node(name, update).await {
        Ok(()) => Ok(()),
        // Not yet registered with the scheduler; the next pass will see it.
        Err(err) if err.is_absence() => Ok(()),
        Err(err) => Err(err.into()),
    }
}

async fn list_or_empty<T>(
    fut: impl Future<Output = gridlink_remote::RemoteResult<Vec<T>>>,
) -> ControlResult<Vec<T>> {
    match fut.await {
        Ok(items) => Ok(items),
        Err(err) if err.is_absence() => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}
