use crate::config::ServerConfig;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use regex::Regex;

/// Only bare `.csv` names are served; anything with a path component is refused.
pub fn is_report_name(name: &str) -> Result<bool, String> {
    let re = Regex::new(r"^[A-Za-z0-9_-]+\.csv$").map_err(|e| e.to_string())?;
    Ok(re.is_match(name))
}

pub(crate) async fn process(
    req: HttpRequest,
    name: web::Path<String>,
    config: web::Data<ServerConfig>,
) -> HttpResponse {
    let name = name.into_inner();
    match is_report_name(&name) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "msg": "Invalid file name" }))
        }
        Err(e) => return HttpResponse::InternalServerError().body(e),
    }

    match NamedFile::open(config.reports_dir.join(&name)) {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(name)],
            })
            .into_response(&req),
        Err(e) => {
            debug!("report {} not served: {}", name, e);
            HttpResponse::NotFound().json(serde_json::json!({ "msg": "File not found" }))
        }
    }
}
