//! Session context read by the gateway on every call.
//!
//! The gateway never looks up global state: it receives a [`SessionContext`]
//! when it is constructed. [`MemorySession`] keeps everything in memory;
//! in the browser [`LocalStorageSession`] keeps the auth fields in
//! `localStorage` so a reload keeps the user logged in.

mod memory;
mod params;
mod search;

#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use memory::{AuthState, MemorySession};
pub use params::CommonParams;
pub use search::SearchState;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageSession;

use std::fmt::Debug;

use crate::error::SessionError;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const IS_ADMIN_KEY: &str = "is_admin";
pub const USER_NAME_KEY: &str = "user_name";
pub const USER_ID_KEY: &str = "user_id";

/// Every key a persisted login writes.
pub const AUTH_KEYS: [&str; 4] = [ACCESS_TOKEN_KEY, IS_ADMIN_KEY, USER_NAME_KEY, USER_ID_KEY];

/// Runs `remove` for every auth key, even after a failure, and reports the first failure.
pub fn remove_auth_keys<E: Debug>(
    mut remove: impl FnMut(&str) -> Result<(), E>,
) -> Result<(), SessionError> {
    let mut first_error = None;
    for key in AUTH_KEYS {
        if let Err(e) = remove(key) {
            log::warn!("could not remove {} from session storage: {:?}", key, e);
            first_error.get_or_insert_with(|| SessionError::Storage(format!("{}: {:?}", key, e)));
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Read-only view of the session used while building requests.
pub trait SessionContext {
    /// Bearer token, if the user is logged in. Empty tokens count as absent.
    fn access_token(&self) -> Option<String>;

    /// Snapshot of the search filters merged into every request.
    fn common_params(&self) -> CommonParams;

    fn is_admin(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_continues_past_a_failing_key() {
        let mut removed = Vec::new();
        let result = remove_auth_keys(|key| {
            removed.push(key.to_string());
            if key == IS_ADMIN_KEY {
                Err("quota")
            } else {
                Ok(())
            }
        });

        assert_eq!(removed, AUTH_KEYS.to_vec());
        match result {
            Err(SessionError::Storage(message)) => assert!(message.starts_with("is_admin")),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn removal_succeeds_when_every_key_goes() {
        assert!(remove_auth_keys(|_| Ok::<(), String>(())).is_ok());
    }
}
