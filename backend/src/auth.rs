//! Bearer token extraction. Tokens are issued elsewhere; this server only
//! refuses requests that carry none.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

/// Returns the bearer token, or the `401` response to send back.
pub fn require_bearer(req: &HttpRequest) -> Result<String, HttpResponse> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != "null");

    match token {
        Some(token) => Ok(token.to_string()),
        None => Err(HttpResponse::Unauthorized()
            .json(serde_json::json!({ "msg": "Missing or invalid bearer token" }))),
    }
}
