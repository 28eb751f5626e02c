//! Admin search across users, reservations, lots and reminder logs.

use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::{Gateway, Params};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    User,
    Reservation,
    Lot,
    Reminder,
}

impl SearchKind {
    /// Parses the search bar's type selector (`user`, `reservation`, `lot`, `reminder`).
    pub fn from_name(name: &str) -> Option<SearchKind> {
        match name {
            "user" => Some(SearchKind::User),
            "reservation" => Some(SearchKind::Reservation),
            "lot" => Some(SearchKind::Lot),
            "reminder" => Some(SearchKind::Reminder),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            SearchKind::User => "/admin/users",
            SearchKind::Reservation => "/admin/search?type=bookings",
            SearchKind::Lot => "/admin/search?type=lots",
            SearchKind::Reminder => "/admin/reminders/logs",
        }
    }
}

/// Runs a search and returns the server's JSON as-is; each kind has its own row shape.
pub async fn search(
    gateway: &Gateway,
    kind: SearchKind,
    by: &str,
    value: &str,
) -> Result<Value, GatewayError> {
    let mut params = Params::new();
    params.insert("search_by".to_string(), Value::String(by.to_string()));
    params.insert("value".to_string(), Value::String(value.to_string()));
    gateway.get_json(kind.endpoint(), params).await
}
