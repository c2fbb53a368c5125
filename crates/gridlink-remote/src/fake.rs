//! In-memory fake of the remote scheduler, for tests.
//!
//! Applies the scheduler's own update semantics so control-flow tests
//! observe realistic state transitions: an UNDRAIN directive deletes the
//! DRAIN token (it is never stored as a state value), every other token
//! is added to the set, and `Some` fields overwrite — including
//! `Some("")`, which clears.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::RemoteClient;
use crate::error::{RemoteError, RemoteResult};
use crate::types::{NodeState, RemoteJob, RemoteNode, UpdateNode};

#[derive(Default)]
struct Inner {
    nodes: HashMap<String, RemoteNode>,
    jobs: Vec<RemoteJob>,
    fail_next: Option<RemoteError>,
}

/// An in-memory [`RemoteClient`].
#[derive(Default)]
pub struct FakeClient {
    inner: Mutex<Inner>,
}

/// Builder for [`FakeClient`].
#[derive(Default)]
pub struct FakeClientBuilder {
    nodes: Vec<RemoteNode>,
    jobs: Vec<RemoteJob>,
}

impl FakeClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one node.
    pub fn with_node(mut self, node: RemoteNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Seed several nodes.
    pub fn with_nodes<I: IntoIterator<Item = RemoteNode>>(mut self, nodes: I) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Seed several jobs.
    pub fn with_jobs<I: IntoIterator<Item = RemoteJob>>(mut self, jobs: I) -> Self {
        self.jobs.extend(jobs);
        self
    }

    pub fn build(self) -> Arc<FakeClient> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|n| (n.name.clone(), n))
            .collect();
        Arc::new(FakeClient {
            inner: Mutex::new(Inner {
                nodes,
                jobs: self.jobs,
                fail_next: None,
            }),
        })
    }
}

impl FakeClient {
    /// Make the next client call fail with `err`.
    pub fn fail_next(&self, err: RemoteError) {
        self.inner.lock().unwrap().fail_next = Some(err);
    }

    /// Inspect a node's current state without going through the trait.
    pub fn node(&self, name: &str) -> Option<RemoteNode> {
        self.inner.lock().unwrap().nodes.get(name).cloned()
    }

    fn take_failure(&self) -> Option<RemoteError> {
        self.inner.lock().unwrap().fail_next.take()
    }
}

#[async_trait]
impl RemoteClient for FakeClient {
    async fn get_node(&self, name: &str) -> RemoteResult<RemoteNode> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let inner = self.inner.lock().unwrap();
        inner
            .nodes
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(name.to_string()))
    }

    async fn list_nodes(&self) -> RemoteResult<Vec<RemoteNode>> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let inner = self.inner.lock().unwrap();
        let mut nodes: Vec<RemoteNode> = inner.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(nodes)
    }

    async fn list_jobs(&self) -> RemoteResult<Vec<RemoteJob>> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.inner.lock().unwrap().jobs.clone())
    }

    async fn update_node(&self, name: &str, update: &UpdateNode) -> RemoteResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut inner = self.inner.lock().unwrap();
        let node = inner
            .nodes
            .get_mut(name)
            .ok_or_else(|| RemoteError::NotFound(name.to_string()))?;

        for token in &update.state {
            match token {
                NodeState::Undrain => {
                    node.state.remove(&NodeState::Drain);
                }
                other => {
                    node.state.insert(*other);
                }
            }
        }
        if let Some(reason) = &update.reason {
            node.reason = reason.clone();
        }
        if let Some(comment) = &update.comment {
            node.comment = comment.clone();
        }
        if let Some(topology) = &update.topology {
            node.topology = topology.clone();
        }
        Ok(())
    }
}
