//! gridlink-control — the node-lifecycle control plane.
//!
//! Bridges the orchestration platform's declarative workload objects and
//! the remote batch scheduler's live node state: maps pod identities to
//! node names, drives drain/undrain/topology/pod-info mutations through
//! [`NodeControl`], folds raw node state into a [`NodeStatus`] report,
//! and computes per-node safe-disruption deadlines from running jobs.
//!
//! Clients are multiplexed per controller through a [`ClientMap`]; a
//! missing registration surfaces as
//! [`ControlError::ClientNotRegistered`], distinct from remote failures,
//! so reconcilers can tell "not registered yet" from "unreachable".

pub mod clientmap;
pub mod control;
pub mod deadlines;
pub mod error;
pub mod names;
pub mod podinfo;
pub mod status;

pub use clientmap::ClientMap;
pub use control::{NOT_RESPONDING_REASON, NodeControl, REASON_PREFIX};
pub use deadlines::DeadlineMap;
pub use error::{ControlError, ControlResult};
pub use names::{Member, ObjectKey, WorkloadGroup, member_ordinal, node_name};
pub use podinfo::PodInfo;
pub use status::{NodeCondition, NodeStatus};
