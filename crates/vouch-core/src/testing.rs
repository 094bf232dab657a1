use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::datetime};
use vouch_model::{Application, ClusterSnapshot, ClusterTask, Framework, TaskRecord};

use crate::cluster::{ClusterStateError, ClusterStateSource};
use crate::endpoints::Endpoints;
use crate::scheduler::{SchedulerClient, SchedulerError};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 10:00:00 UTC);

/// Task of version `version` that started `age_secs` before [`NOW`].
pub fn task(task_id: &str, version: &str, age_secs: u64) -> TaskRecord {
    let started_at = (NOW - Duration::from_secs(age_secs))
        .format(&Rfc3339)
        .unwrap();
    TaskRecord {
        task_id: task_id.into(),
        version: version.into(),
        started_at: Some(started_at),
        host: "agent-1".into(),
        ..Default::default()
    }
}

pub fn endpoints(scheduler: StaticScheduler) -> Endpoints {
    Endpoints::default().with_scheduler(Arc::new(scheduler))
}

/// One framework per outer slice, each holding `(task_id, state)` pairs.
pub fn snapshot(frameworks: &[&[(&str, &str)]]) -> ClusterSnapshot {
    ClusterSnapshot {
        frameworks: frameworks
            .iter()
            .map(|tasks| Framework {
                tasks: tasks
                    .iter()
                    .map(|(id, state)| ClusterTask {
                        id: id.to_string(),
                        state: state.to_string(),
                        slave_id: "slave-1".into(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub struct StaticScheduler {
    endpoint: String,
    apps: HashMap<String, Application>,
    down: bool,
    calls: AtomicUsize,
}

impl StaticScheduler {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.into(),
            apps: HashMap::new(),
            down: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable(endpoint: &str) -> Self {
        Self {
            down: true,
            ..Self::new(endpoint)
        }
    }

    pub fn with_app(mut self, app_id: &str, tasks: Vec<TaskRecord>) -> Self {
        let tasks = tasks
            .into_iter()
            .map(|t| TaskRecord {
                app_id: app_id.into(),
                ..t
            })
            .collect();
        self.apps.insert(
            app_id.into(),
            Application {
                id: app_id.into(),
                version: None,
                tasks: Some(tasks),
            },
        );
        self
    }

    pub fn with_app_without_tasks(mut self, app_id: &str) -> Self {
        self.apps.insert(
            app_id.into(),
            Application {
                id: app_id.into(),
                version: None,
                tasks: None,
            },
        );
        self
    }

    /// Answer lookups of `requested` with the application stored under `served`.
    pub fn serving(mut self, requested: &str, served: &str) -> Self {
        if let Some(app) = self.apps.get(served).cloned() {
            self.apps.insert(requested.into(), app);
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchedulerClient for StaticScheduler {
    async fn read_application(&self, app_id: &str) -> Result<Application, SchedulerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(SchedulerError::Unavailable(format!("{} is down", self.endpoint)));
        }
        self.apps
            .get(app_id)
            .cloned()
            .ok_or_else(|| SchedulerError::NotFound(app_id.to_string()))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub struct StaticClusterState {
    snapshot: Option<ClusterSnapshot>,
}

impl StaticClusterState {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    pub fn unavailable() -> Self {
        Self { snapshot: None }
    }
}

#[async_trait]
impl ClusterStateSource for StaticClusterState {
    async fn snapshot(&self) -> Result<ClusterSnapshot, ClusterStateError> {
        self.snapshot
            .clone()
            .ok_or_else(|| ClusterStateError::Unavailable("connection refused".into()))
    }

    fn endpoint(&self) -> &str {
        "http://master:5050"
    }
}
