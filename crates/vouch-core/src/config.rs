use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::freshness::DEFAULT_STARTUP_THRESHOLD;

/// Storage key holding the serialized [`BackendConfig`].
pub const CONFIG_KEY: &str = "config";

/// Default lease lifetime; minutes, not hours.
pub const DEFAULT_LEASE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config storage failed: {0}")]
    Storage(String),
    #[error("stored config is invalid: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Key-value storage for persisted backend configuration.
pub trait ConfigStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;
    fn put(&self, key: &str, value: String) -> Result<(), ConfigError>;
}

/// In-memory [`ConfigStore`].
#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), ConfigError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.insert(key.to_string(), value);
        Ok(())
    }
}

/// Upstream locations, as persisted in the config store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// One scheduler base URL, or several separated by commas (tried in order).
    #[serde(default)]
    pub scheduler_url: String,
    /// Base URL of the cluster manager whose state document backs the cross-check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_state_url: Option<String>,
}

impl BackendConfig {
    /// Scheduler candidates in failover order, blanks dropped.
    pub fn scheduler_urls(&self) -> Vec<&str> {
        self.scheduler_url
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .collect()
    }

    pub fn cluster_state_url(&self) -> Option<&str> {
        self.cluster_state_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Read the current config; an empty store yields the default (unconfigured) value.
    pub fn load(store: &dyn ConfigStore) -> Result<Self, ConfigError> {
        match store.get(CONFIG_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, store: &dyn ConfigStore) -> Result<(), ConfigError> {
        store.put(CONFIG_KEY, serde_json::to_string(self)?)
    }
}

/// Tunables of the verifier and the lease lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierSettings {
    pub startup_threshold: Duration,
    pub lease_ttl: Duration,
    /// Match on `(app, version, task)` instead of `(app, version)`.
    pub strict_task_match: bool,
    /// Also require the cluster state to report the claimed task as running.
    pub require_cluster_check: bool,
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            startup_threshold: DEFAULT_STARTUP_THRESHOLD,
            lease_ttl: DEFAULT_LEASE_TTL,
            strict_task_match: false,
            require_cluster_check: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_scheduler_candidates() {
        let cfg = BackendConfig {
            scheduler_url: " http://a:8080 ,, http://b:8080,".into(),
            cluster_state_url: Some("  ".into()),
        };
        assert_eq!(cfg.scheduler_urls(), vec!["http://a:8080", "http://b:8080"]);
        assert_eq!(cfg.cluster_state_url(), None);
    }

    #[test]
    fn empty_store_is_unconfigured() {
        let store = MemoryConfigStore::new();
        let cfg = BackendConfig::load(&store).unwrap();
        assert!(cfg.scheduler_urls().is_empty());
    }

    #[test]
    fn save_then_load_sees_latest_value() {
        let store = MemoryConfigStore::new();

        BackendConfig {
            scheduler_url: "http://a:8080".into(),
            cluster_state_url: None,
        }
        .save(&store)
        .unwrap();

        let updated = BackendConfig {
            scheduler_url: "http://b:8080".into(),
            cluster_state_url: Some("http://master:5050".into()),
        };
        updated.save(&store).unwrap();

        assert_eq!(BackendConfig::load(&store).unwrap(), updated);
    }

    #[test]
    fn corrupt_value_is_decode_error() {
        let store = MemoryConfigStore::new();
        store.put(CONFIG_KEY, "not json".into()).unwrap();
        assert!(matches!(
            BackendConfig::load(&store),
            Err(ConfigError::Decode(_))
        ));
    }
}
