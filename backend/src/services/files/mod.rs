//! `GET /api/files/{name}`: downloads of generated reports.

use actix_web::web::{get, scope};
use actix_web::Scope;

mod download;

const API_PATH: &str = "/api/files";

/// Public location of a file in the reports directory.
pub fn download_url(file_name: &str) -> String {
    format!("{}/{}", API_PATH, file_name)
}

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{name}", get().to(download::process))
}
