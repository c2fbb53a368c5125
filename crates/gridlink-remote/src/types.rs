//! Domain types for the remote batch scheduler.
//!
//! A remote node carries a *set* of state tokens: exactly one base state
//! (idle, mixed, allocated, ...) plus zero or more flags (drain,
//! completing, ...). Base and flags are orthogonal and combine freely,
//! e.g. `{IDLE, DRAIN}`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One token of a node's state set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeState {
    // Base states — exactly one per node.
    Idle,
    Mixed,
    Allocated,
    Down,
    Future,
    Error,
    Unknown,
    // Flags — zero or more per node.
    Drain,
    Undrain,
    Completing,
    Fail,
    Invalid,
    InvalidReg,
    Maintenance,
    NotResponding,
}

impl NodeState {
    /// Whether this token is a base state.
    pub fn is_base(&self) -> bool {
        matches!(
            self,
            NodeState::Idle
                | NodeState::Mixed
                | NodeState::Allocated
                | NodeState::Down
                | NodeState::Future
                | NodeState::Error
                | NodeState::Unknown
        )
    }

    /// Whether this token is a flag.
    pub fn is_flag(&self) -> bool {
        !self.is_base()
    }

    /// The scheduler's wire spelling of this token.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::Idle => "IDLE",
            NodeState::Mixed => "MIXED",
            NodeState::Allocated => "ALLOCATED",
            NodeState::Down => "DOWN",
            NodeState::Future => "FUTURE",
            NodeState::Error => "ERROR",
            NodeState::Unknown => "UNKNOWN",
            NodeState::Drain => "DRAIN",
            NodeState::Undrain => "UNDRAIN",
            NodeState::Completing => "COMPLETING",
            NodeState::Fail => "FAIL",
            NodeState::Invalid => "INVALID",
            NodeState::InvalidReg => "INVALID_REG",
            NodeState::Maintenance => "MAINTENANCE",
            NodeState::NotResponding => "NOT_RESPONDING",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One token of a job's state set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    Running,
    Suspended,
    Completed,
    Cancelled,
    Failed,
    Timeout,
    NodeFail,
    Preempted,
}

/// The scheduler's record of one compute node.
///
/// Not owned by this system; only `state`, `reason`, `comment`, and
/// `topology` are ever mutated, through [`UpdateNode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteNode {
    pub name: String,
    /// State token set: one base state plus any flags.
    #[serde(default)]
    pub state: HashSet<NodeState>,
    /// Free-text explanation for the current state, operator-supplied.
    #[serde(default)]
    pub reason: String,
    /// Free-text side channel; fully overwritten on write, never merged.
    #[serde(default)]
    pub comment: String,
    /// The node's position in the cluster topology.
    #[serde(default)]
    pub topology: String,
}

impl RemoteNode {
    /// Create a node with the given name and state tokens.
    pub fn new<I: IntoIterator<Item = NodeState>>(name: &str, state: I) -> Self {
        Self {
            name: name.to_string(),
            state: state.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Attach a reason string.
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = reason.to_string();
        self
    }

    /// Attach a comment string.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Whether the state set contains `token`.
    pub fn has_state(&self, token: NodeState) -> bool {
        self.state.contains(&token)
    }
}

/// The scheduler's record of one job. Read-only to this system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteJob {
    pub job_id: u32,
    #[serde(default)]
    pub state: HashSet<JobState>,
    /// Epoch seconds; only meaningful once the job has started.
    #[serde(default)]
    pub start_time: Option<u64>,
    /// Wall-clock limit in seconds.
    #[serde(default)]
    pub time_limit: Option<u64>,
    /// Compressed hostlist of the nodes running this job.
    #[serde(default)]
    pub nodes: String,
}

impl RemoteJob {
    /// Whether the job is currently running.
    pub fn is_running(&self) -> bool {
        self.state.contains(&JobState::Running)
    }
}

/// Partial state-change directive for one node.
///
/// `Some` fields overwrite the remote value (including `Some("")` to
/// clear); `None` fields are left untouched. In `state`,
/// [`NodeState::Undrain`] is the distinguished remove-DRAIN directive —
/// the scheduler models undrain as deleting the DRAIN token, not as a
/// state value — and every other token is added to the set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNode {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<NodeState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_and_flag_partition() {
        let bases = [
            NodeState::Idle,
            NodeState::Mixed,
            NodeState::Allocated,
            NodeState::Down,
            NodeState::Future,
            NodeState::Error,
            NodeState::Unknown,
        ];
        let flags = [
            NodeState::Drain,
            NodeState::Undrain,
            NodeState::Completing,
            NodeState::Fail,
            NodeState::Invalid,
            NodeState::InvalidReg,
            NodeState::Maintenance,
            NodeState::NotResponding,
        ];
        for base in bases {
            assert!(base.is_base(), "{base} should be a base state");
            assert!(!base.is_flag());
        }
        for flag in flags {
            assert!(flag.is_flag(), "{flag} should be a flag");
            assert!(!flag.is_base());
        }
    }

    #[test]
    fn node_state_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&NodeState::InvalidReg).unwrap(),
            "\"INVALID_REG\""
        );
        assert_eq!(
            serde_json::to_string(&NodeState::NotResponding).unwrap(),
            "\"NOT_RESPONDING\""
        );
        let state: NodeState = serde_json::from_str("\"IDLE\"").unwrap();
        assert_eq!(state, NodeState::Idle);
    }

    #[test]
    fn node_defaults_tolerate_sparse_payload() {
        let node: RemoteNode = serde_json::from_str(r#"{"name":"n0"}"#).unwrap();
        assert_eq!(node.name, "n0");
        assert!(node.state.is_empty());
        assert!(node.reason.is_empty());
    }

    #[test]
    fn job_is_running() {
        let mut job = RemoteJob {
            job_id: 1,
            ..Default::default()
        };
        assert!(!job.is_running());
        job.state.insert(JobState::Running);
        assert!(job.is_running());
    }

    #[test]
    fn update_node_skips_unset_fields() {
        let update = UpdateNode {
            reason: Some("maintenance".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"reason":"maintenance"}"#);
    }
}
