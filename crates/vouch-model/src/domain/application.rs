use serde::{Deserialize, Serialize};

use crate::{AppId, TaskRecord};

/// Scheduler view of a single application.
///
/// `tasks` is `None` when the scheduler answered without a task list at all,
/// which is not the same as an application with zero running tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub id: AppId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskRecord>>,
}

impl Application {
    /// Tasks reported by the scheduler, empty when no list was returned.
    pub fn tasks(&self) -> &[TaskRecord] {
        self.tasks.as_deref().unwrap_or_default()
    }
}
