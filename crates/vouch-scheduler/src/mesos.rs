use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;
use vouch_core::{ClusterStateError, ClusterStateSource};
use vouch_model::ClusterSnapshot;

use crate::config::HttpConfig;
use crate::errors::{ClientError, describe, parse_base_url};

/// Cluster manager client fetching the full `/state.json` document.
pub struct MesosStateClient {
    base_url: String,
    http: reqwest::Client,
}

impl MesosStateClient {
    pub fn new(base_url: &str, config: &HttpConfig) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            http: config.client()?,
        })
    }
}

#[async_trait]
impl ClusterStateSource for MesosStateClient {
    async fn snapshot(&self) -> Result<ClusterSnapshot, ClusterStateError> {
        let url = format!("{}/state.json", self.base_url);
        debug!(%url, "fetching cluster state");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClusterStateError::Unavailable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClusterStateError::Unavailable(format!(
                "unexpected status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClusterStateError::Unavailable(describe(&e)))?;
        serde_json::from_str(&body)
            .map_err(|e| ClusterStateError::Unavailable(format!("failed to parse state: {e}")))
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
