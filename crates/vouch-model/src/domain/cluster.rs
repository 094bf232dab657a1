use serde::{Deserialize, Serialize};

/// Task state token the cluster manager reports for live tasks.
pub const TASK_RUNNING: &str = "TASK_RUNNING";

/// Whole-cluster state document returned by the cluster manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub frameworks: Vec<Framework>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Framework {
    #[serde(default)]
    pub tasks: Vec<ClusterTask>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterTask {
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub slave_id: String,
}

impl ClusterTask {
    pub fn is_running(&self) -> bool {
        self.state == TASK_RUNNING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_state_document_ignoring_unknown_fields() {
        let json = r#"{
            "version": "0.28.0",
            "cluster": "uat",
            "frameworks": [
                {"name": "marathon", "tasks": [
                    {"id": "web.1", "state": "TASK_RUNNING", "slave_id": "s-1", "name": "web"},
                    {"id": "web.2", "state": "TASK_KILLED", "slave_id": "s-2"}
                ]},
                {"name": "chronos"}
            ]
        }"#;

        let snapshot: ClusterSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.frameworks.len(), 2);
        assert!(snapshot.frameworks[0].tasks[0].is_running());
        assert!(!snapshot.frameworks[0].tasks[1].is_running());
        assert!(snapshot.frameworks[1].tasks.is_empty());
    }
}
