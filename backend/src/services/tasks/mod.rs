//! Task listing and cancellation for every job the server tracks.
//!
//! - `GET /api/tasks`
//! - `GET /api/tasks/{id}/cancel`

use actix_web::web::{get, scope};
use actix_web::Scope;

mod cancel;
mod list;

const API_PATH: &str = "/api/tasks";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/{id}/cancel", get().to(cancel::process))
}
