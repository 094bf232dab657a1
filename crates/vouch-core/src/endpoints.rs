use std::sync::Arc;

use crate::cluster::ClusterStateSource;
use crate::config::{BackendConfig, ConfigError};
use crate::scheduler::SchedulerClient;

/// Upstreams resolved from configuration for a single verification.
///
/// `None` means the corresponding URL is not configured.
#[derive(Clone, Default)]
pub struct Endpoints {
    pub scheduler: Option<Arc<dyn SchedulerClient>>,
    pub cluster_state: Option<Arc<dyn ClusterStateSource>>,
}

impl Endpoints {
    pub fn with_scheduler(mut self, scheduler: Arc<dyn SchedulerClient>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_cluster_state(mut self, cluster_state: Arc<dyn ClusterStateSource>) -> Self {
        self.cluster_state = Some(cluster_state);
        self
    }
}

/// Builds [`Endpoints`] from the latest stored configuration.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self, config: &BackendConfig) -> Result<Endpoints, ConfigError>;
}
