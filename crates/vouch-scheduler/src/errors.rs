use thiserror::Error;
use vouch_core::ConfigError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

impl ClientError {
    pub(crate) fn into_config_error(self, url: &str) -> ConfigError {
        ConfigError::InvalidEndpoint {
            url: url.to_string(),
            reason: self.to_string(),
        }
    }
}

/// Human-readable cause for a failed outbound call.
pub(crate) fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else if e.is_decode() {
        format!("invalid response body: {e}")
    } else {
        e.to_string()
    }
}

pub(crate) fn parse_base_url(url: &str) -> Result<String, ClientError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ClientError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(url.trim_end_matches('/').to_string())
}
