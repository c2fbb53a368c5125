//! End-to-end drain lifecycle against the in-memory fake scheduler.
//!
//! Walks a workload group's node through the full reconciliation story:
//! pod registration, drain for scale-down, observing the drained state,
//! undrain on scale-up, status aggregation, and deadline computation —
//! all through the same registry-resolved control surface a reconciler
//! would use.

use std::sync::Arc;

use gridlink_control::{
    ClientMap, ControlError, Member, NodeControl, ObjectKey, PodInfo, WorkloadGroup,
};
use gridlink_remote::{
    FakeClient, FakeClientBuilder, JobState, NodeState, RemoteError, RemoteJob, RemoteNode,
};

fn workload() -> WorkloadGroup {
    WorkloadGroup::new(
        ObjectKey::new("hpc", "compute"),
        ObjectKey::new("hpc", "cluster-a"),
    )
}

fn member(ordinal: u32) -> Member {
    Member::new(&format!("compute-{ordinal}"), &format!("k8s-worker-{ordinal}"))
}

async fn control_backed_by(fake: Arc<FakeClient>) -> NodeControl {
    let clients = Arc::new(ClientMap::new());
    clients.add(workload().controller.clone(), fake).await;
    NodeControl::new(clients)
}

fn running_job(id: u32, nodes: &str, start: u64, limit: u64) -> RemoteJob {
    RemoteJob {
        job_id: id,
        state: [JobState::Running].into_iter().collect(),
        start_time: Some(start),
        time_limit: Some(limit),
        nodes: nodes.to_string(),
    }
}

#[tokio::test]
async fn drain_lifecycle_round_trip() {
    let fake = FakeClientBuilder::new()
        .with_nodes([
            RemoteNode::new("compute-0", [NodeState::Idle]),
            RemoteNode::new("compute-1", [NodeState::Allocated]),
        ])
        .build();
    let control = control_backed_by(fake.clone()).await;
    let w = workload();
    let members = [member(0), member(1)];

    // Pod registration stamps the comment with the pod's identity.
    for m in &members {
        control.update_node_with_pod_info(&w, m).await.unwrap();
    }
    let info = PodInfo::decode(&fake.node("compute-0").unwrap().comment);
    assert_eq!(info, PodInfo::new("hpc", "compute-0", "k8s-worker-0"));

    // Scale-down decision: drain compute-0.
    control.make_node_drain(&w, &member(0), "scale down").await.unwrap();
    assert!(control.is_node_drain(&w, &member(0)).await.unwrap());
    assert!(control.is_node_reason_ours(&w, &member(0)).await.unwrap());

    // IDLE base with DRAIN and nothing completing: fully drained.
    assert!(control.is_node_drained(&w, &member(0)).await.unwrap());
    assert!(!control.is_node_drained(&w, &member(1)).await.unwrap());

    // Status reflects both the base states and the drain flag.
    let status = control.calculate_node_status(&w, &members).await.unwrap();
    assert_eq!(status.total, 2);
    assert_eq!(status.idle, 1);
    assert_eq!(status.allocated, 1);
    assert_eq!(status.drain, 1);
    assert_eq!(status.node_states["compute-0"].len(), 2);

    // Operator changes its mind: undrain and the token disappears.
    control.make_node_undrain(&w, &member(0), "scale up").await.unwrap();
    assert!(!control.is_node_drain(&w, &member(0)).await.unwrap());
    assert!(!control.is_node_drained(&w, &member(0)).await.unwrap());

    let status = control.calculate_node_status(&w, &members).await.unwrap();
    assert_eq!(status.drain, 0);
    assert_eq!(status.total, 2);
}

#[tokio::test]
async fn deadlines_follow_running_jobs_only() {
    let fake = FakeClientBuilder::new()
        .with_nodes([
            RemoteNode::new("compute-0", [NodeState::Mixed]),
            RemoteNode::new("compute-1", [NodeState::Allocated]),
        ])
        .with_jobs([
            running_job(1, "compute-[0-1]", 10_000, 3_600),
            running_job(2, "compute-1", 12_000, 3_600),
            RemoteJob {
                job_id: 3,
                state: [JobState::Completed].into_iter().collect(),
                start_time: Some(50_000),
                time_limit: Some(3_600),
                nodes: "compute-0".to_string(),
            },
        ])
        .build();
    let control = control_backed_by(fake).await;
    let members = [member(0), member(1)];

    let deadlines = control
        .get_node_deadlines(&workload(), &members)
        .await
        .unwrap();

    assert_eq!(deadlines.peek("compute-0"), 13_600);
    assert_eq!(deadlines.peek("compute-1"), 15_600);
    // The completed job on compute-0 never extends its deadline.
    assert!(deadlines.peek("compute-0") < 50_000);
}

#[tokio::test]
async fn registry_lifecycle_gates_every_operation() {
    let clients = Arc::new(ClientMap::new());
    let control = NodeControl::new(clients.clone());
    let w = workload();

    let err = control.is_node_drain(&w, &member(0)).await.unwrap_err();
    assert!(matches!(err, ControlError::ClientNotRegistered(_)));

    let fake = FakeClientBuilder::new()
        .with_node(RemoteNode::new("compute-0", [NodeState::Idle]))
        .build();
    clients.add(w.controller.clone(), fake).await;
    assert!(!control.is_node_drain(&w, &member(0)).await.unwrap());

    clients.remove(&w.controller).await;
    let err = control.is_node_drain(&w, &member(0)).await.unwrap_err();
    assert_eq!(err, ControlError::ClientNotRegistered(w.controller.clone()));
}

#[tokio::test]
async fn remote_outage_is_not_swallowed() {
    let fake = FakeClientBuilder::new()
        .with_node(RemoteNode::new("compute-0", [NodeState::Idle]))
        .build();
    let control = control_backed_by(fake.clone()).await;

    fake.fail_next(RemoteError::Http("connection refused".into()));
    let err = control
        .calculate_node_status(&workload(), &[member(0)])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ControlError::Remote(RemoteError::Http("connection refused".into()))
    );

    // The outage was transient; the next pass succeeds.
    let status = control
        .calculate_node_status(&workload(), &[member(0)])
        .await
        .unwrap();
    assert_eq!(status.total, 1);
}
