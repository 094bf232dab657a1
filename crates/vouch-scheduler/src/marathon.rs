use async_trait::async_trait;
use reqwest::{StatusCode, header::ACCEPT};
use serde::Deserialize;
use tracing::debug;
use vouch_core::{SchedulerClient, SchedulerError};
use vouch_model::{Application, is_valid_app_id};

use crate::config::HttpConfig;
use crate::errors::{ClientError, describe, parse_base_url};

/// Body of `GET /v2/apps/{id}`.
#[derive(Debug, Deserialize)]
struct AppEnvelope {
    #[serde(default)]
    app: Option<Application>,
    #[serde(default)]
    message: Option<String>,
}

/// Scheduler REST client reading applications from `/v2/apps/{id}`.
pub struct MarathonClient {
    base_url: String,
    http: reqwest::Client,
}

impl MarathonClient {
    pub fn new(base_url: &str, config: &HttpConfig) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            http: config.client()?,
        })
    }

    fn app_url(&self, app_id: &str) -> String {
        format!("{}/v2/apps/{}", self.base_url, app_id.trim_start_matches('/'))
    }
}

#[async_trait]
impl SchedulerClient for MarathonClient {
    async fn read_application(&self, app_id: &str) -> Result<Application, SchedulerError> {
        if !is_valid_app_id(app_id) {
            return Err(SchedulerError::NotFound(app_id.to_string()));
        }
        let url = self.app_url(app_id);
        debug!(%url, "reading application");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SchedulerError::Unavailable(describe(&e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SchedulerError::NotFound(app_id.to_string()));
        }
        if !status.is_success() {
            return Err(SchedulerError::Unavailable(format!(
                "unexpected status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SchedulerError::Unavailable(describe(&e)))?;
        let envelope: AppEnvelope = serde_json::from_str(&body).map_err(|e| {
            SchedulerError::Unavailable(format!("failed to parse response: {e}"))
        })?;

        if let Some(message) = envelope.message.filter(|m| !m.is_empty()) {
            return Err(SchedulerError::Unavailable(format!(
                "scheduler returned message: {message}"
            )));
        }
        envelope
            .app
            .ok_or_else(|| SchedulerError::Unavailable("response has no app".into()))
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_url_drops_leading_separator() {
        let client = MarathonClient::new("http://marathon:8080/", &HttpConfig::default()).unwrap();
        assert_eq!(
            client.app_url("/group/web"),
            "http://marathon:8080/v2/apps/group/web"
        );
        assert_eq!(client.app_url("web"), "http://marathon:8080/v2/apps/web");
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            MarathonClient::new("zk://zookeeper:2181/marathon", &HttpConfig::default()),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(MarathonClient::new("not a url", &HttpConfig::default()).is_err());
    }
}
