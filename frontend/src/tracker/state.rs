use crate::error::GatewayError;

/// Where one export cycle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    Idle,
    Starting,
    Processing,
    Completed,
    Failed,
}

impl TrackerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TrackerState::Completed | TrackerState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RequestFailed { status: u16 },
    Transport,
    Decode,
    InvalidRequest,
    /// Polling gave up before the job reached a terminal state.
    Timeout,
    /// The server reported the job itself as failed or cancelled.
    Job,
}

impl From<&GatewayError> for FailureKind {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::RequestFailed { status, .. } => FailureKind::RequestFailed { status: *status },
            GatewayError::Transport(_) => FailureKind::Transport,
            GatewayError::Decode(_) => FailureKind::Decode,
            GatewayError::InvalidParams(_) => FailureKind::InvalidRequest,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub kind: FailureKind,
    /// Human-readable, shown as-is by the dashboard.
    pub message: String,
}

/// Observable state of the tracked job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRecord {
    pub state: TrackerState,
    pub task_id: Option<String>,
    /// Latest status line: our own while starting, the server's afterwards.
    pub status_text: Option<String>,
    pub progress: Option<u32>,
    pub download_url: Option<String>,
    pub failure: Option<TaskFailure>,
    /// Status polls answered so far.
    pub polls: u32,
}

impl TaskRecord {
    pub(crate) fn starting() -> Self {
        Self {
            state: TrackerState::Starting,
            status_text: Some("Starting export...".to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn accept(&mut self, task_id: String) {
        self.state = TrackerState::Processing;
        self.task_id = Some(task_id);
        self.status_text = Some("Processing…".to_string());
    }

    pub(crate) fn complete(&mut self, download_url: Option<String>) {
        self.state = TrackerState::Completed;
        self.status_text = Some("completed".to_string());
        self.progress = Some(100);
        self.download_url = download_url;
    }

    pub(crate) fn fail(&mut self, kind: FailureKind, message: impl Into<String>) {
        self.state = TrackerState::Failed;
        self.failure = Some(TaskFailure {
            kind,
            message: message.into(),
        });
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, TrackerState::Starting | TrackerState::Processing)
    }
}
