//! Client configuration.
//!
//! The API origin is fixed when the bundle is built (`API_BASE_URL`), the
//! same way the dashboard has always been deployed next to its API.

use crate::tracker::PollPolicy;

/// Origin used when `API_BASE_URL` is not set at build time.
pub const DEFAULT_API_ORIGIN: &str = "http://localhost:5000";

/// Prefix every API route lives under.
pub const API_PREFIX: &str = "/api";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Origin plus [`API_PREFIX`], without a trailing slash.
    pub api_base_url: String,
    pub poll_policy: PollPolicy,
}

impl ClientConfig {
    /// Builds the config from the build-time `API_BASE_URL` variable.
    pub fn from_build_env() -> Self {
        Self::with_origin(option_env!("API_BASE_URL").unwrap_or(DEFAULT_API_ORIGIN))
    }

    pub fn with_origin(origin: &str) -> Self {
        let origin = origin.trim().trim_end_matches('/');
        let origin = if origin.is_empty() {
            DEFAULT_API_ORIGIN
        } else {
            origin
        };
        Self {
            api_base_url: format!("{}{}", origin, API_PREFIX),
            poll_policy: PollPolicy::default(),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
