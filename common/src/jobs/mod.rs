use crate::model::export::ExportStatusResponse;
use crate::model::task::TaskStatus;
use serde::Serialize;

/// Server-side state of a background job.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub enum JobStatus {
    Pending,
    /// Percentage of work done.
    InProgress(u32),
    /// Download location of the produced file.
    Completed(String),
    Failed(String),
    Cancelled,
}

impl JobStatus {
    pub fn task_status(&self) -> TaskStatus {
        match self {
            JobStatus::Pending => TaskStatus::Pending,
            JobStatus::InProgress(_) => TaskStatus::Processing,
            JobStatus::Completed(_) => TaskStatus::Completed,
            JobStatus::Failed(_) => TaskStatus::Failed,
            JobStatus::Cancelled => TaskStatus::Cancelled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.task_status().is_terminal()
    }

    /// Renders the job as the body of the export status endpoint.
    pub fn to_export_status(&self, task_id: &str) -> ExportStatusResponse {
        let (progress, download_url, error) = match self {
            JobStatus::Pending => (Some(0), None, None),
            JobStatus::InProgress(p) => (Some(*p), None, None),
            JobStatus::Completed(url) => (Some(100), Some(url.clone()), None),
            JobStatus::Failed(e) => (None, None, Some(e.clone())),
            JobStatus::Cancelled => (None, None, Some("export cancelled".to_string())),
        };
        ExportStatusResponse {
            task_id: Some(task_id.to_string()),
            status: self.task_status().as_str().to_string(),
            progress,
            download_url,
            error,
        }
    }
}
