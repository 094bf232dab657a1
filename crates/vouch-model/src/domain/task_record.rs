use serde::{Deserialize, Serialize};

use crate::{AppId, AppVersion};

/// One running unit of an application, as reported by the scheduler.
///
/// `started_at` stays a raw string: a missing or unparseable start time is a
/// distinct verification failure and must never collapse into a default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default)]
    pub app_id: AppId,
    #[serde(rename = "id", default)]
    pub task_id: String,
    #[serde(default)]
    pub version: AppVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_at: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
}
