use std::{net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;
use vouch_core::{BackendConfig, VerifierSettings};
use vouch_observe::{LoggerFormat, LoggerLevel};
use vouch_scheduler::DEFAULT_REQUEST_TIMEOUT;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8200";
pub const DEFAULT_ADMIN_ADDR: &str = "127.0.0.1:8201";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("VOUCH_ADMIN_ADDR must differ from VOUCH_LISTEN_ADDR ({0})")]
    SharedAdminAddr(SocketAddr),
}

/// Daemon settings, read from `VOUCH_*` environment variables.
#[derive(Debug, Clone)]
pub struct DaemonSettings {
    /// Workload-facing login listener.
    pub listen_addr: SocketAddr,
    /// Operator listener for the config endpoints.
    pub admin_addr: SocketAddr,
    pub log_level: LoggerLevel,
    pub log_format: LoggerFormat,
    pub request_timeout: Duration,
    pub verifier: VerifierSettings,
    /// Initial backend config; the store may be rewritten later over the API.
    pub backend: BackendConfig,
}

impl DaemonSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let defaults = VerifierSettings::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let verifier = VerifierSettings {
            startup_threshold: parse(&get, "VOUCH_STARTUP_THRESHOLD_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.startup_threshold),
            lease_ttl: parse(&get, "VOUCH_LEASE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.lease_ttl),
            strict_task_match: parse_bool(&get, "VOUCH_STRICT_TASK_MATCH")?
                .unwrap_or(defaults.strict_task_match),
            require_cluster_check: parse_bool(&get, "VOUCH_REQUIRE_CLUSTER_CHECK")?
                .unwrap_or(defaults.require_cluster_check),
        };

        let listen_addr = match parse(&get, "VOUCH_LISTEN_ADDR")? {
            Some(addr) => addr,
            None => parse_value("VOUCH_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)?,
        };
        let admin_addr = match parse(&get, "VOUCH_ADMIN_ADDR")? {
            Some(addr) => addr,
            None => parse_value("VOUCH_ADMIN_ADDR", DEFAULT_ADMIN_ADDR)?,
        };
        if admin_addr == listen_addr {
            return Err(SettingsError::SharedAdminAddr(admin_addr));
        }

        Ok(Self {
            listen_addr,
            admin_addr,
            log_level: parse(&get, "VOUCH_LOG_LEVEL")?.unwrap_or_default(),
            log_format: parse(&get, "VOUCH_LOG_FORMAT")?.unwrap_or_default(),
            request_timeout: parse(&get, "VOUCH_REQUEST_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            verifier,
            backend: BackendConfig {
                scheduler_url: get("VOUCH_SCHEDULER_URL").unwrap_or_default(),
                cluster_state_url: get("VOUCH_CLUSTER_STATE_URL"),
            },
        })
    }
}

fn parse<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(var).map(|raw| parse_value(var, &raw)).transpose()
}

fn parse_value<T>(var: &'static str, raw: &str) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| SettingsError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<bool>, SettingsError> {
    let Some(raw) = get(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(SettingsError::Invalid {
            var,
            value: raw,
            reason: "expected a boolean".into(),
        }),
    }
}
