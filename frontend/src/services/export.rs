use common::model::export::{ExportStatusResponse, TaskAccepted};

use crate::error::GatewayError;
use crate::gateway::{Gateway, Params};

/// Where an export job is submitted and where its status is polled.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEndpoints {
    pub submit: String,
    /// The task id is appended as the last path segment.
    pub status_prefix: String,
}

impl Default for ExportEndpoints {
    /// The reservation history CSV export.
    fn default() -> Self {
        Self {
            submit: "/user/export-csv".to_string(),
            status_prefix: "/user/export-status".to_string(),
        }
    }
}

impl ExportEndpoints {
    pub fn status_path(&self, task_id: &str) -> String {
        format!(
            "{}/{}",
            self.status_prefix.trim_end_matches('/'),
            urlencoding::encode(task_id)
        )
    }
}

pub async fn submit_csv_export(
    gateway: &Gateway,
    endpoints: &ExportEndpoints,
    data: Params,
) -> Result<TaskAccepted, GatewayError> {
    gateway.post_json(&endpoints.submit, data).await
}

pub async fn fetch_export_status(
    gateway: &Gateway,
    endpoints: &ExportEndpoints,
    task_id: &str,
) -> Result<ExportStatusResponse, GatewayError> {
    gateway
        .get_json(&endpoints.status_path(task_id), Params::new())
        .await
}
