use serde::{Deserialize, Serialize};

/// Payload returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginUser {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}
