//! Reservation history export.
//!
//! - `POST /api/user/export-csv` schedules a job and answers `{ task_id }`.
//! - `GET /api/user/export-status/{task_id}` reports its progress.
//!
//! Finished files are served by [`crate::services::files`].

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod get_status;
pub(crate) mod history;
mod start;

const API_PATH: &str = "/api/user";

/// Job name shown in the task listing.
pub const EXPORT_JOB_NAME: &str = "export_csv";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/export-csv", post().to(start::process))
        .route("/export-status/{task_id}", get().to(get_status::process))
}
