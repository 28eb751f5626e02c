use crate::model::task::TaskStatus;
use serde::{Deserialize, Serialize};

/// Response to a job submission: the server accepted the job and assigned it an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskAccepted {
    pub task_id: String,
}

/// Response of the export status endpoint.
///
/// `status` is kept as the raw server text so the dashboard can show exactly
/// what the server said; use [`ExportStatusResponse::kind`] to branch on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportStatusResponse {
    #[serde(default)]
    pub task_id: Option<String>,
    pub status: String,
    /// Percentage in `0..=100`, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    /// Location of the finished file, present once `status` is terminal-successful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportStatusResponse {
    pub fn kind(&self) -> TaskStatus {
        TaskStatus::parse(&self.status)
    }
}
