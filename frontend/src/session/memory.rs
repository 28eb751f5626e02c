use std::cell::RefCell;

use common::model::auth::LoginResponse;

use super::{CommonParams, SearchState, SessionContext};

/// Who is logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub is_admin: bool,
    pub user_name: String,
    pub user_id: String,
}

impl AuthState {
    pub fn login(&mut self, response: &LoginResponse) {
        self.token = Some(response.access_token.clone());
        self.is_admin = response.user.is_admin;
        self.user_name = response.user.name.clone();
        self.user_id = response.user.id.to_string();
    }

    pub fn logout(&mut self) {
        *self = AuthState::default();
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// In-memory session. Writers go through `&self` so a single
/// `Rc<MemorySession>` can be shared between the gateway and the UI.
#[derive(Debug, Default)]
pub struct MemorySession {
    auth: RefCell<AuthState>,
    search: RefCell<SearchState>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.auth.borrow_mut().token = Some(token.into());
        session
    }

    pub fn login(&self, response: &LoginResponse) {
        self.auth.borrow_mut().login(response);
    }

    pub fn logout(&self) {
        self.auth.borrow_mut().logout();
    }

    pub fn auth(&self) -> AuthState {
        self.auth.borrow().clone()
    }

    pub fn update_search(&self, f: impl FnOnce(&mut SearchState)) {
        f(&mut self.search.borrow_mut());
    }

    pub fn search(&self) -> SearchState {
        self.search.borrow().clone()
    }
}

impl SessionContext for MemorySession {
    fn access_token(&self) -> Option<String> {
        self.auth.borrow().token.clone().filter(|t| !t.is_empty())
    }

    fn common_params(&self) -> CommonParams {
        self.search.borrow().common_params()
    }

    fn is_admin(&self) -> bool {
        self.auth.borrow().is_admin
    }
}
