//! Per-node safe-disruption deadlines derived from running jobs.
//!
//! A node hosting fragments of several concurrent jobs is unsafe to
//! disrupt until the last of them is expected to finish, so the map keeps
//! the maximum deadline per node. Advisory only: jobs can run past their
//! limit or finish early, and callers must re-check live state before
//! acting.

use std::collections::HashMap;

use gridlink_remote::RemoteJob;

/// Node name → latest expected-finish time, epoch seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlineMap {
    deadlines: HashMap<String, u64>,
}

impl DeadlineMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node's deadline, or `0` (the zero time) when no running job is
    /// tracked for it.
    pub fn peek(&self, name: &str) -> u64 {
        self.deadlines.get(name).copied().unwrap_or(0)
    }

    /// Fold `deadline` in, keeping the per-node maximum.
    pub fn extend_to(&mut self, name: &str, deadline: u64) {
        let entry = self.deadlines.entry(name.to_string()).or_insert(0);
        *entry = deadline.max(*entry);
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

/// Expected finish time of `job`: start time plus wall-clock limit.
/// `None` unless the job is RUNNING with a resolvable start time.
pub(crate) fn job_deadline(job: &RemoteJob) -> Option<u64> {
    if !job.is_running() {
        return None;
    }
    let start = job.start_time.filter(|s| *s > 0)?;
    Some(start + job.time_limit.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    use gridlink_remote::JobState;

    fn job(states: &[JobState], start_time: Option<u64>, time_limit: Option<u64>) -> RemoteJob {
        RemoteJob {
            job_id: 1,
            state: states.iter().copied().collect(),
            start_time,
            time_limit,
            nodes: String::new(),
        }
    }

    #[test]
    fn peek_absent_is_zero_time() {
        let map = DeadlineMap::new();
        assert_eq!(map.peek("n0"), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn extend_to_keeps_the_maximum() {
        let mut map = DeadlineMap::new();
        map.extend_to("n0", 1_000);
        map.extend_to("n0", 3_000);
        map.extend_to("n0", 2_000);
        assert_eq!(map.peek("n0"), 3_000);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn running_job_deadline_is_start_plus_limit() {
        let j = job(&[JobState::Running], Some(1_000), Some(600));
        assert_eq!(job_deadline(&j), Some(1_600));
    }

    #[test]
    fn completed_job_has_no_deadline() {
        let j = job(&[JobState::Completed], Some(1_000), Some(600));
        assert_eq!(job_deadline(&j), None);
    }

    #[test]
    fn unstarted_job_has_no_deadline() {
        assert_eq!(job_deadline(&job(&[JobState::Running], None, Some(600))), None);
        assert_eq!(job_deadline(&job(&[JobState::Running], Some(0), Some(600))), None);
    }

    #[test]
    fn missing_limit_falls_back_to_start_time() {
        let j = job(&[JobState::Running], Some(1_000), None);
        assert_eq!(job_deadline(&j), Some(1_000));
    }
}
