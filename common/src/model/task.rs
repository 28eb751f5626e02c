use serde::{Deserialize, Serialize};

/// Lifecycle of a server-side task as reported on the wire.
///
/// Servers in front of different job runners spell these differently
/// (`completed` vs `SUCCESS`, `failed` vs `FAILURE`), so the client never
/// matches on raw strings: it goes through [`TaskStatus::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// Canonical lowercase spelling used by the export server.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Case-insensitive parse. Anything unrecognised counts as still running.
    pub fn parse(raw: &str) -> TaskStatus {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" => TaskStatus::Pending,
            "completed" | "complete" | "success" | "done" => TaskStatus::Completed,
            "failed" | "failure" | "error" => TaskStatus::Failed,
            "cancelled" | "canceled" | "revoked" => TaskStatus::Cancelled,
            _ => TaskStatus::Processing,
        }
    }

    /// `true` once no further status change will happen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

/// One row of the `GET /api/tasks` listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSummary {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
