use std::sync::Arc;

use tracing::debug;
use vouch_core::{
    BackendConfig, ConfigError, Connector, Endpoints, FailoverScheduler, SchedulerClient,
};

use crate::config::HttpConfig;
use crate::marathon::MarathonClient;
use crate::mesos::MesosStateClient;

/// Builds HTTP-backed [`Endpoints`] from stored configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    http: HttpConfig,
}

impl HttpConnector {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }
}

impl Connector for HttpConnector {
    fn connect(&self, config: &BackendConfig) -> Result<Endpoints, ConfigError> {
        let mut candidates: Vec<Arc<dyn SchedulerClient>> = Vec::new();
        for url in config.scheduler_urls() {
            let client =
                MarathonClient::new(url, &self.http).map_err(|e| e.into_config_error(url))?;
            candidates.push(Arc::new(client));
        }

        let scheduler: Option<Arc<dyn SchedulerClient>> = match candidates.len() {
            0 => None,
            1 => candidates.pop(),
            n => {
                debug!(candidates = n, "using scheduler failover");
                Some(Arc::new(FailoverScheduler::new(candidates)))
            }
        };

        let mut endpoints = Endpoints {
            scheduler,
            cluster_state: None,
        };
        if let Some(url) = config.cluster_state_url() {
            let client =
                MesosStateClient::new(url, &self.http).map_err(|e| e.into_config_error(url))?;
            endpoints = endpoints.with_cluster_state(Arc::new(client));
        }
        Ok(endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(scheduler_url: &str, cluster_state_url: Option<&str>) -> BackendConfig {
        BackendConfig {
            scheduler_url: scheduler_url.into(),
            cluster_state_url: cluster_state_url.map(str::to_string),
        }
    }

    #[test]
    fn unconfigured_yields_no_endpoints() {
        let endpoints = HttpConnector::default().connect(&config("", None)).unwrap();
        assert!(endpoints.scheduler.is_none());
        assert!(endpoints.cluster_state.is_none());
    }

    #[test]
    fn several_urls_become_failover() {
        let endpoints = HttpConnector::default()
            .connect(&config(
                "http://a:8080,http://b:8080",
                Some("http://master:5050"),
            ))
            .unwrap();

        let scheduler = endpoints.scheduler.unwrap();
        assert_eq!(scheduler.endpoint(), "http://a:8080,http://b:8080");
        assert_eq!(
            endpoints.cluster_state.unwrap().endpoint(),
            "http://master:5050"
        );
    }

    #[test]
    fn bad_url_is_invalid_endpoint() {
        let err = HttpConnector::default()
            .connect(&config("http://a:8080,ftp://b", None))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::InvalidEndpoint { ref url, .. } if url == "ftp://b"));
    }
}
