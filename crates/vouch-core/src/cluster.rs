use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use vouch_model::{ClusterSnapshot, ClusterTask};

use crate::error::VerificationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterStateError {
    #[error("cluster state unavailable: {0}")]
    Unavailable(String),
}

/// Whole-cluster state document provider (secondary identity source).
#[async_trait]
pub trait ClusterStateSource: Send + Sync + 'static {
    async fn snapshot(&self) -> Result<ClusterSnapshot, ClusterStateError>;

    fn endpoint(&self) -> &str;
}

/// First task across all frameworks with `task_id` in the running state.
pub fn find_running<'a>(snapshot: &'a ClusterSnapshot, task_id: &str) -> Option<&'a ClusterTask> {
    snapshot
        .frameworks
        .iter()
        .flat_map(|framework| framework.tasks.iter())
        .find(|task| task.id == task_id && task.is_running())
}

/// Confirm `task_id` is running anywhere in the cluster.
///
/// Fetches a fresh snapshot on every call; the snapshot is dropped afterwards.
pub async fn is_running(
    source: &dyn ClusterStateSource,
    task_id: &str,
) -> Result<bool, VerificationError> {
    let snapshot = source
        .snapshot()
        .await
        .map_err(|e| VerificationError::UpstreamUnavailable(e.to_string()))?;

    match find_running(&snapshot, task_id) {
        Some(task) => {
            debug!(task_id, slave_id = %task.slave_id, "task confirmed running");
            Ok(true)
        }
        None => Err(VerificationError::TaskNotRunning(task_id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticClusterState, snapshot};

    #[tokio::test]
    async fn running_task_is_confirmed() {
        let source = StaticClusterState::new(snapshot(&[&[("web.1", "TASK_RUNNING")]]));
        assert_eq!(is_running(&source, "web.1").await, Ok(true));
    }

    #[tokio::test]
    async fn killed_task_is_not_running() {
        let source = StaticClusterState::new(snapshot(&[&[("web.1", "TASK_KILLED")]]));
        assert_eq!(
            is_running(&source, "web.1").await,
            Err(VerificationError::TaskNotRunning("web.1".into()))
        );
    }

    #[tokio::test]
    async fn scans_every_framework() {
        let source = StaticClusterState::new(snapshot(&[
            &[("other.1", "TASK_RUNNING")],
            &[],
            &[("web.1", "TASK_STAGING"), ("web.1", "TASK_RUNNING")],
        ]));
        assert_eq!(is_running(&source, "web.1").await, Ok(true));
    }

    #[tokio::test]
    async fn unknown_task_is_not_running() {
        let source = StaticClusterState::new(snapshot(&[&[("other.1", "TASK_RUNNING")]]));
        assert!(matches!(
            is_running(&source, "web.1").await,
            Err(VerificationError::TaskNotRunning(_))
        ));
    }

    #[tokio::test]
    async fn fetch_failure_is_upstream_unavailable() {
        let source = StaticClusterState::unavailable();
        assert!(matches!(
            is_running(&source, "web.1").await,
            Err(VerificationError::UpstreamUnavailable(_))
        ));
    }
}
