use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AppId, AppVersion, is_valid_app_id};

/// Reasons a login request cannot be turned into a claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("field must not be blank: {0}")]
    BlankField(&'static str),
    #[error("invalid application id: {0:?}")]
    InvalidAppId(String),
}

/// Identity asserted by a workload: "I am task `task_id` of `app_id` at `version`".
///
/// A claim carries no trust on its own. It is only the key used to look the
/// workload up in the scheduler. The same triple is kept verbatim as lease
/// metadata so renewal can replay the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationClaim {
    #[serde(rename = "marathon_app_id")]
    pub app_id: AppId,
    #[serde(rename = "marathon_app_version")]
    pub version: AppVersion,
    #[serde(rename = "mesos_task_id")]
    pub task_id: String,
}

impl VerificationClaim {
    pub fn new(
        app_id: impl Into<AppId>,
        version: impl Into<AppVersion>,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            version: version.into(),
            task_id: task_id.into(),
        }
    }
}

/// Login request body as it arrives over the wire.
///
/// Field names follow the environment variables the scheduler injects into
/// every task (`MARATHON_APP_ID`, `MARATHON_APP_VERSION`, `MESOS_TASK_ID`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marathon_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marathon_app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesos_task_id: Option<String>,
}

impl ClaimRequest {
    /// Validate every field once and produce a typed claim.
    pub fn into_claim(self) -> Result<VerificationClaim, ClaimError> {
        let app_id = required("marathon_app_id", self.marathon_app_id)?;
        let version = required("marathon_app_version", self.marathon_app_version)?;
        let task_id = required("mesos_task_id", self.mesos_task_id)?;
        if !is_valid_app_id(&app_id) {
            return Err(ClaimError::InvalidAppId(app_id));
        }
        Ok(VerificationClaim {
            app_id,
            version,
            task_id,
        })
    }
}

impl From<VerificationClaim> for ClaimRequest {
    fn from(claim: VerificationClaim) -> Self {
        Self {
            marathon_app_id: Some(claim.app_id),
            marathon_app_version: Some(claim.version),
            mesos_task_id: Some(claim.task_id),
        }
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ClaimError> {
    let value = value.ok_or(ClaimError::MissingField(name))?;
    if value.trim().is_empty() {
        return Err(ClaimError::BlankField(name));
    }
    Ok(value)
}
