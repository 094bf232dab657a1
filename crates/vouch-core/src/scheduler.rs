use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use vouch_model::Application;

/// Outcome of a failed scheduler read.
///
/// `NotFound` is a normal negative answer; everything else is `Unavailable`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("application not found: {0}")]
    NotFound(String),

    #[error("scheduler unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the scheduler used by the verifier.
///
/// Implementations must bound every call with a timeout and must never cache
/// results across calls.
#[async_trait]
pub trait SchedulerClient: Send + Sync + 'static {
    /// Fetch the current state of one application, including its running tasks.
    async fn read_application(&self, app_id: &str) -> Result<Application, SchedulerError>;

    /// Base URL of the scheduler, for logs.
    fn endpoint(&self) -> &str;
}

/// Tries several scheduler URLs in order until one answers.
///
/// `NotFound` from any candidate is authoritative and returned at once.
pub struct FailoverScheduler {
    candidates: Vec<Arc<dyn SchedulerClient>>,
    label: String,
}

impl FailoverScheduler {
    pub fn new(candidates: Vec<Arc<dyn SchedulerClient>>) -> Self {
        let label = candidates
            .iter()
            .map(|c| c.endpoint())
            .collect::<Vec<_>>()
            .join(",");
        Self { candidates, label }
    }
}

#[async_trait]
impl SchedulerClient for FailoverScheduler {
    async fn read_application(&self, app_id: &str) -> Result<Application, SchedulerError> {
        let mut last = SchedulerError::Unavailable("no scheduler candidates".into());

        for candidate in &self.candidates {
            match candidate.read_application(app_id).await {
                Err(SchedulerError::Unavailable(reason)) => {
                    warn!(endpoint = candidate.endpoint(), %reason, "scheduler candidate failed");
                    last = SchedulerError::Unavailable(reason);
                }
                other => {
                    debug!(endpoint = candidate.endpoint(), "scheduler candidate answered");
                    return other;
                }
            }
        }
        Err(last)
    }

    fn endpoint(&self) -> &str {
        &self.label
    }
}
