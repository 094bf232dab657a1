use std::time::Duration;

use thiserror::Error;
use vouch_model::{ClaimError, LeaseId};

/// Why a verification attempt was denied.
///
/// Every variant is terminal for the attempt and is reported to the caller
/// as an authentication denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed claim: {0}")]
    MalformedClaim(#[from] ClaimError),

    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    #[error("identity not found: {0}")]
    IdentityNotFound(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("no task of {app_id} runs version {version}")]
    VersionNotFound { app_id: String, version: String },

    #[error("failed to validate task startup time: {0}")]
    StartupTimeUnverifiable(String),

    #[error("task did not start within threshold ({age:?} > {threshold:?})")]
    StaleStartup { age: Duration, threshold: Duration },

    #[error("task is not running in the cluster: {0}")]
    TaskNotRunning(String),
}

impl VerificationError {
    /// Stable snake_case code used in API responses and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationError::MalformedClaim(_) => "malformed_claim",
            VerificationError::ConfigurationMissing(_) => "configuration_missing",
            VerificationError::IdentityNotFound(_) => "identity_not_found",
            VerificationError::UpstreamUnavailable(_) => "upstream_unavailable",
            VerificationError::VersionNotFound { .. } => "version_not_found",
            VerificationError::StartupTimeUnverifiable(_) => "startup_time_unverifiable",
            VerificationError::StaleStartup { .. } => "stale_startup",
            VerificationError::TaskNotRunning(_) => "task_not_running",
        }
    }

    /// Returns `true` for conditions an operator can fix (missing config, broken upstream),
    /// as opposed to an identity that is simply not valid right now.
    pub fn is_operator_fixable(&self) -> bool {
        matches!(
            self,
            VerificationError::ConfigurationMissing(_) | VerificationError::UpstreamUnavailable(_)
        )
    }
}

/// Failures of the lease lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("lease {0} is not renewable")]
    NotRenewable(LeaseId),

    #[error("lease {0} has expired")]
    Expired(LeaseId),
}

impl LifecycleError {
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleError::Verification(e) => e.kind(),
            LifecycleError::NotRenewable(_) => "lease_not_renewable",
            LifecycleError::Expired(_) => "lease_expired",
        }
    }
}
