//! Client core of the parking admin dashboard.
//!
//! - [`gateway`]: builds every outgoing API request (bearer token, common
//!   search parameters) and decodes responses by content type.
//! - [`tracker`]: drives a server-side CSV export from submission to a
//!   terminal state by polling its status endpoint.
//! - [`session`]: the auth and search state the gateway reads on each call.
//! - [`services`]: typed wrappers over the endpoints the dashboard calls.
//!
//! UI components own a [`tracker::ExportTracker`] and a
//! [`gateway::Gateway`]; neither ever navigates. Redirecting to the login view
//! on `401`/`403` is done by registering an [`gateway::ErrorInterceptor`].

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod platform;
pub mod services;
pub mod session;
pub mod tracker;

pub use config::ClientConfig;
pub use error::{GatewayError, TrackerError};
pub use gateway::{Gateway, Params, Payload, RequestOptions};
pub use session::{MemorySession, SessionContext};
pub use tracker::{ExportTracker, PollPolicy, TaskRecord, TrackerState};
