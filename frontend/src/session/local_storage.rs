//! `localStorage`-backed session for the browser build.

use std::cell::RefCell;

use common::model::auth::LoginResponse;
use web_sys::Storage;

use super::{
    remove_auth_keys, AuthState, CommonParams, SearchState, SessionContext, ACCESS_TOKEN_KEY,
    IS_ADMIN_KEY, USER_ID_KEY, USER_NAME_KEY,
};
use crate::error::SessionError;

/// Auth fields live in `localStorage`; search state is per page load.
pub struct LocalStorageSession {
    storage: Storage,
    search: RefCell<SearchState>,
}

impl LocalStorageSession {
    pub fn open() -> Result<Self, SessionError> {
        let storage = web_sys::window()
            .ok_or(SessionError::Unavailable)?
            .local_storage()
            .map_err(|e| SessionError::Storage(format!("{:?}", e)))?
            .ok_or(SessionError::Unavailable)?;
        Ok(Self {
            storage,
            search: RefCell::new(SearchState::default()),
        })
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| SessionError::Storage(format!("{:?}", e)))
    }

    pub fn auth(&self) -> AuthState {
        AuthState {
            token: self.access_token(),
            is_admin: self.is_admin(),
            user_name: self.read(USER_NAME_KEY).unwrap_or_default(),
            user_id: self.read(USER_ID_KEY).unwrap_or_default(),
        }
    }

    pub fn login(&self, response: &LoginResponse) -> Result<(), SessionError> {
        let mut auth = AuthState::default();
        auth.login(response);
        self.write(ACCESS_TOKEN_KEY, &response.access_token)?;
        self.write(IS_ADMIN_KEY, if auth.is_admin { "true" } else { "false" })?;
        self.write(USER_NAME_KEY, &auth.user_name)?;
        self.write(USER_ID_KEY, &auth.user_id)?;
        log::info!("logged in as {}", auth.user_name);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        remove_auth_keys(|key| self.storage.remove_item(key))
    }

    pub fn update_search(&self, f: impl FnOnce(&mut SearchState)) {
        f(&mut self.search.borrow_mut());
    }
}

impl SessionContext for LocalStorageSession {
    fn access_token(&self) -> Option<String> {
        // Never send "Bearer null".
        self.read(ACCESS_TOKEN_KEY)
            .filter(|t| !t.is_empty() && t != "null")
    }

    fn common_params(&self) -> CommonParams {
        self.search.borrow().common_params()
    }

    fn is_admin(&self) -> bool {
        self.read(IS_ADMIN_KEY).as_deref() == Some("true")
    }
}
