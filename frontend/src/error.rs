use thiserror::Error;

/// Failure of a single gateway call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The server answered with a non-2xx status.
    #[error("API error: {status}")]
    RequestFailed { status: u16, body: String },

    /// The request never produced a response (DNS, connection reset, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The body did not match its declared content type, or the expected model.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Caller-supplied parameters could not be turned into a JSON object.
    #[error("invalid request parameters: {0}")]
    InvalidParams(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `401` or `403`: the session is missing, expired or not allowed.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Failure returned to the caller of [`crate::tracker::ExportTracker::start_export`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// `clear()` or a newer export ran while the submission was in flight.
    #[error("export was superseded before the server accepted it")]
    Superseded,
}

/// Failure reading or writing the browser session store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("session storage is unavailable")]
    Unavailable,

    #[error("session storage error: {0}")]
    Storage(String),
}
