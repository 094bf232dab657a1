use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vouch_model::{ClaimRequest, Lease, LeaseId, VerificationClaim};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request rejected ({status}): {kind}: {message}")]
    Denied {
        status: u16,
        kind: String,
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct RenewRequest<'a> {
    lease_id: &'a str,
}

/// Thin HTTP client for the auth API, used by tasks to log in and renew.
#[derive(Clone)]
pub struct VouchClient {
    base: String,
    http: Client,
}

impl VouchClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(base, Client::new())
    }

    pub fn with_client(base: impl Into<String>, http: Client) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, http }
    }

    pub async fn login(&self, claim: &VerificationClaim) -> Result<Lease, ClientError> {
        let resp = self
            .http
            .post(format!("{}/v1/auth/login", self.base))
            .json(&ClaimRequest::from(claim.clone()))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(denied(resp).await);
        }
        Ok(resp.json().await?)
    }

    /// `Ok(None)` when the server declined renewal.
    pub async fn renew(&self, lease_id: &LeaseId) -> Result<Option<Lease>, ClientError> {
        let resp = self
            .http
            .post(format!("{}/v1/auth/renew", self.base))
            .json(&RenewRequest {
                lease_id: lease_id.as_str(),
            })
            .send()
            .await?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(None),
            s if s.is_success() => Ok(Some(resp.json().await?)),
            _ => Err(denied(resp).await),
        }
    }
}

async fn denied(resp: reqwest::Response) -> ClientError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ClientError::Denied {
            status,
            kind: body.error,
            message: body.message,
        },
        Err(_) => ClientError::Denied {
            status,
            kind: "unknown".into(),
            message: text,
        },
    }
}
