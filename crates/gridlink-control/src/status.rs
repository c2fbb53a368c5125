//! Normalized status report over a workload group's remote nodes.
//!
//! Raw remote state is an unordered token set per node; the aggregator
//! folds it into flat counters plus per-node condition lists the
//! orchestration layer can publish. Condition lists are order-free sets
//! keyed by state token.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use gridlink_remote::{NodeState, RemoteNode};

/// One observed state token on one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCondition {
    pub state: NodeState,
    /// Always true; conditions report presence, never absence.
    pub status: bool,
    /// The node's reason text at observation time.
    pub message: String,
}

/// Counters plus per-node conditions for one workload group.
///
/// `total` counts nodes once each; the per-token counters count every
/// token observed, so their sum generally exceeds `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub total: u32,
    pub idle: u32,
    pub mixed: u32,
    pub allocated: u32,
    pub down: u32,
    pub future: u32,
    pub error: u32,
    pub unknown: u32,
    pub drain: u32,
    pub undrain: u32,
    pub completing: u32,
    pub fail: u32,
    pub invalid: u32,
    pub invalid_reg: u32,
    pub maintenance: u32,
    pub not_responding: u32,
    pub node_states: HashMap<String, Vec<NodeCondition>>,
}

impl NodeStatus {
    /// Fold one node's full token set into the report.
    pub fn observe(&mut self, node: &RemoteNode) {
        self.total += 1;
        self.node_states.entry(node.name.clone()).or_default();
        for token in &node.state {
            *self.counter_mut(*token) += 1;
            self.node_states
                .get_mut(&node.name)
                .expect("entry inserted above")
                .push(NodeCondition {
                    state: *token,
                    status: true,
                    message: node.reason.clone(),
                });
        }
    }

    /// Current counter value for `token`.
    pub fn count(&self, token: NodeState) -> u32 {
        match token {
            NodeState::Idle => self.idle,
            NodeState::Mixed => self.mixed,
            NodeState::Allocated => self.allocated,
            NodeState::Down => self.down,
            NodeState::Future => self.future,
            NodeState::Error => self.error,
            NodeState::Unknown => self.unknown,
            NodeState::Drain => self.drain,
            NodeState::Undrain => self.undrain,
            NodeState::Completing => self.completing,
            NodeState::Fail => self.fail,
            NodeState::Invalid => self.invalid,
            NodeState::InvalidReg => self.invalid_reg,
            NodeState::Maintenance => self.maintenance,
            NodeState::NotResponding => self.not_responding,
        }
    }

    /// The condition recorded for `token` on `node`, if any.
    pub fn condition(&self, node: &str, token: NodeState) -> Option<&NodeCondition> {
        self.node_states
            .get(node)?
            .iter()
            .find(|c| c.state == token)
    }

    fn counter_mut(&mut self, token: NodeState) -> &mut u32 {
        match token {
            NodeState::Idle => &mut self.idle,
            NodeState::Mixed => &mut self.mixed,
            NodeState::Allocated => &mut self.allocated,
            NodeState::Down => &mut self.down,
            NodeState::Future => &mut self.future,
            NodeState::Error => &mut self.error,
            NodeState::Unknown => &mut self.unknown,
            NodeState::Drain => &mut self.drain,
            NodeState::Undrain => &mut self.undrain,
            NodeState::Completing => &mut self.completing,
            NodeState::Fail => &mut self.fail,
            NodeState::Invalid => &mut self.invalid,
            NodeState::InvalidReg => &mut self.invalid_reg,
            NodeState::Maintenance => &mut self.maintenance,
            NodeState::NotResponding => &mut self.not_responding,
        }
    }
}
