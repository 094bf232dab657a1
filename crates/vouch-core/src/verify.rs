//! Identity verification protocol.
//!
//! A claim `(app, version, task)` is accepted only when the scheduler
//! currently reports a task of `app` at `version` that started within the
//! freshness window. Nothing is cached: every call reads upstream state again.

use std::sync::Arc;

use tracing::{debug, warn};
use vouch_model::{Application, TaskRecord, VerificationClaim, canonical_app_id};

use crate::clock::Clock;
use crate::cluster::is_running;
use crate::config::VerifierSettings;
use crate::endpoints::Endpoints;
use crate::error::VerificationError;
use crate::freshness::FreshnessPolicy;
use crate::scheduler::SchedulerError;

/// A claim the scheduler has vouched for, with the task that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTask {
    pub claim: VerificationClaim,
    pub task: TaskRecord,
}

pub struct Verifier {
    settings: VerifierSettings,
    freshness: FreshnessPolicy,
    clock: Arc<dyn Clock>,
}

impl Verifier {
    pub fn new(settings: VerifierSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            freshness: FreshnessPolicy::new(settings.startup_threshold),
            settings,
            clock,
        }
    }

    pub fn settings(&self) -> &VerifierSettings {
        &self.settings
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Full check used at login: locate the task, then require a fresh start.
    pub async fn verify(
        &self,
        endpoints: &Endpoints,
        claim: &VerificationClaim,
    ) -> Result<VerifiedTask, VerificationError> {
        let app = self.read_application(endpoints, &claim.app_id).await?;
        let task = self.match_task(app.tasks(), claim)?.clone();

        self.freshness.check(&task, self.clock.now())?;
        self.cross_check(endpoints, &claim.task_id).await?;

        debug!(
            app_id = %claim.app_id,
            version = %claim.version,
            task_id = %task.task_id,
            "claim verified"
        );
        Ok(VerifiedTask {
            claim: claim.clone(),
            task,
        })
    }

    /// Liveness check used at renewal: the task must still be reported, freshness is not re-applied.
    ///
    /// Returns `Ok(None)` when the scheduler answers without any task list.
    pub async fn locate(
        &self,
        endpoints: &Endpoints,
        claim: &VerificationClaim,
    ) -> Result<Option<TaskRecord>, VerificationError> {
        let app = self.read_application(endpoints, &claim.app_id).await?;
        let Some(tasks) = app.tasks.as_deref() else {
            debug!(app_id = %claim.app_id, "scheduler returned no task list");
            return Ok(None);
        };
        let task = self.match_task(tasks, claim)?.clone();

        self.cross_check(endpoints, &claim.task_id).await?;
        Ok(Some(task))
    }

    async fn read_application(
        &self,
        endpoints: &Endpoints,
        app_id: &str,
    ) -> Result<Application, VerificationError> {
        let scheduler = endpoints
            .scheduler
            .as_ref()
            .ok_or(VerificationError::ConfigurationMissing("scheduler url"))?;

        let app = scheduler
            .read_application(app_id)
            .await
            .map_err(|e| match e {
                SchedulerError::NotFound(id) => VerificationError::IdentityNotFound(id),
                SchedulerError::Unavailable(reason) => VerificationError::UpstreamUnavailable(
                    format!("{}: {reason}", scheduler.endpoint()),
                ),
            })?;

        // The scheduler must answer for the claimed app, not one it resolved to.
        if canonical_app_id(&app.id) != canonical_app_id(app_id) {
            warn!(
                app_id,
                answered_for = %app.id,
                endpoint = scheduler.endpoint(),
                "scheduler answered for another application"
            );
            return Err(VerificationError::IdentityNotFound(format!(
                "{app_id} (scheduler answered for {})",
                app.id
            )));
        }
        Ok(app)
    }

    /// First task whose version equals the claimed one.
    ///
    /// With `strict_task_match` the task id must match as well; a version hit
    /// carrying another task id is then reported as an unknown identity.
    fn match_task<'a>(
        &self,
        tasks: &'a [TaskRecord],
        claim: &VerificationClaim,
    ) -> Result<&'a TaskRecord, VerificationError> {
        let first = tasks
            .iter()
            .find(|t| t.version == claim.version)
            .ok_or_else(|| VerificationError::VersionNotFound {
                app_id: claim.app_id.clone(),
                version: claim.version.clone(),
            })?;
        if !self.settings.strict_task_match {
            return Ok(first);
        }

        tasks
            .iter()
            .find(|t| t.version == claim.version && t.task_id == claim.task_id)
            .ok_or_else(|| {
                VerificationError::IdentityNotFound(format!(
                    "{} has no task {} at version {}",
                    claim.app_id, claim.task_id, claim.version
                ))
            })
    }

    async fn cross_check(
        &self,
        endpoints: &Endpoints,
        task_id: &str,
    ) -> Result<(), VerificationError> {
        if !self.settings.require_cluster_check {
            return Ok(());
        }
        let source = endpoints
            .cluster_state
            .as_ref()
            .ok_or(VerificationError::ConfigurationMissing("cluster state url"))?;

        is_running(source.as_ref(), task_id).await.map(|_| ())
    }
}
